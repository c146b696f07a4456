//! Event dispatch core.
//!
//! Key principles:
//! - Closed event vocabulary ([`EventType`]) registered per dispatcher
//! - At most one handler per event type; re-attaching replaces it
//! - Synchronous dispatch: the handler runs to completion before
//!   `dispatch` returns
//! - Using an event type that was never registered is a contract
//!   violation ([`ConfigurationError`]); dispatching a registered event
//!   with no attached handler is a silent no-op

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::input::{Key, Modifiers, MouseButton};

/// The fixed vocabulary of window lifecycle and input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A unicode character was entered.
    Character,
    /// A key on the keyboard was pressed.
    KeyPress,
    /// A key on the keyboard was released.
    KeyRelease,
    /// The mouse moved with no button held down.
    MouseMotion,
    /// The mouse moved with a button held down.
    MouseDrag,
    /// A mouse button was pressed.
    MousePress,
    /// A mouse button was released.
    MouseRelease,
    /// The mouse wheel was scrolled.
    MouseScroll,
    /// The cursor entered the window.
    Enter,
    /// The cursor left the window.
    Leave,
    /// The window finished initializing. Fired exactly once per window,
    /// after its timers are armed and before the first `process` call.
    Init,
    /// The window was shown.
    Show,
    /// The window was hidden.
    Hide,
    /// The window was closed.
    Close,
    /// The window was resized.
    Resize,
    /// The window contents must be redrawn.
    Draw,
    /// The window is idle; carries the frame delta time.
    Idle,
}

impl EventType {
    /// The full event vocabulary a [`crate::window::Window`] registers.
    pub const WINDOW_EVENTS: [Self; 17] = [
        Self::Character,
        Self::KeyPress,
        Self::KeyRelease,
        Self::MouseMotion,
        Self::MouseDrag,
        Self::MousePress,
        Self::MouseRelease,
        Self::MouseScroll,
        Self::Enter,
        Self::Leave,
        Self::Init,
        Self::Show,
        Self::Hide,
        Self::Close,
        Self::Resize,
        Self::Draw,
        Self::Idle,
    ];

    /// Conventional `on_*` name of the event.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Character => "on_character",
            Self::KeyPress => "on_key_press",
            Self::KeyRelease => "on_key_release",
            Self::MouseMotion => "on_mouse_motion",
            Self::MouseDrag => "on_mouse_drag",
            Self::MousePress => "on_mouse_press",
            Self::MouseRelease => "on_mouse_release",
            Self::MouseScroll => "on_mouse_scroll",
            Self::Enter => "on_enter",
            Self::Leave => "on_leave",
            Self::Init => "on_init",
            Self::Show => "on_show",
            Self::Hide => "on_hide",
            Self::Close => "on_close",
            Self::Resize => "on_resize",
            Self::Draw => "on_draw",
            Self::Idle => "on_idle",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Positional arguments carried by a dispatched event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventArgs {
    /// No payload (`on_init`, `on_show`, `on_hide`, `on_close`,
    /// `on_draw`, `on_enter`, `on_leave`).
    None,
    /// `on_character(character)`.
    Character(char),
    /// `on_key_press(symbol, modifiers)` / `on_key_release(...)`.
    Key {
        /// Translated key symbol.
        symbol: Key,
        /// Modifier state at the time of the event.
        modifiers: Modifiers,
    },
    /// `on_mouse_motion(x, y, dx, dy)`.
    MouseMotion {
        /// Cursor x position.
        x: f64,
        /// Cursor y position.
        y: f64,
        /// Motion since the last known position.
        dx: f64,
        /// Motion since the last known position.
        dy: f64,
    },
    /// `on_mouse_drag(x, y, dx, dy, button)`.
    MouseDrag {
        /// Cursor x position.
        x: f64,
        /// Cursor y position.
        y: f64,
        /// Motion since the last known position.
        dx: f64,
        /// Motion since the last known position.
        dy: f64,
        /// Button held during the drag.
        button: MouseButton,
    },
    /// `on_mouse_press(x, y, button)` / `on_mouse_release(...)`.
    MouseButton {
        /// Cursor x position.
        x: f64,
        /// Cursor y position.
        y: f64,
        /// Translated button.
        button: MouseButton,
    },
    /// `on_mouse_scroll(x, y, dx, dy)`.
    MouseScroll {
        /// Cursor x position.
        x: f64,
        /// Cursor y position.
        y: f64,
        /// Horizontal scroll offset.
        dx: f64,
        /// Vertical scroll offset.
        dy: f64,
    },
    /// `on_resize(width, height)`.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// `on_idle(dt)`.
    Idle {
        /// Seconds elapsed since the previous frame.
        dt: f64,
    },
}

/// Contract violations in event registration and dispatch.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The event type was never registered on this dispatcher.
    #[error("event type `{0}` is not registered")]
    UnknownEvent(EventType),
}

/// Handler attached to one event type of one dispatcher.
pub type EventHandler = Box<dyn FnMut(&EventArgs)>;

/// Publish/subscribe core: a set of valid event types and at most one
/// attached handler per type.
#[derive(Default)]
pub struct EventDispatcher {
    registered: HashSet<EventType>,
    handlers: HashMap<EventType, EventHandler>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no registered event types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher with the full window event vocabulary
    /// registered.
    #[must_use]
    pub fn with_window_events() -> Self {
        let mut dispatcher = Self::new();
        for event in EventType::WINDOW_EVENTS {
            dispatcher.register_event_type(event);
        }
        dispatcher
    }

    /// Adds `event` to the set of valid event types. Registering an
    /// already-registered type is a no-op.
    pub fn register_event_type(&mut self, event: EventType) {
        self.registered.insert(event);
    }

    /// Whether `event` has been registered on this dispatcher.
    #[must_use]
    pub fn is_registered(&self, event: EventType) -> bool {
        self.registered.contains(&event)
    }

    /// Attaches `handler` to `event`, replacing any previous handler.
    ///
    /// # Errors
    /// Fails with [`ConfigurationError::UnknownEvent`] if `event` was
    /// never registered.
    pub fn attach<F>(&mut self, event: EventType, handler: F) -> Result<(), ConfigurationError>
    where
        F: FnMut(&EventArgs) + 'static,
    {
        if !self.is_registered(event) {
            return Err(ConfigurationError::UnknownEvent(event));
        }
        self.handlers.insert(event, Box::new(handler));
        Ok(())
    }

    /// Detaches the handler attached to `event`, if any.
    ///
    /// # Errors
    /// Fails with [`ConfigurationError::UnknownEvent`] if `event` was
    /// never registered.
    pub fn detach(&mut self, event: EventType) -> Result<(), ConfigurationError> {
        if !self.is_registered(event) {
            return Err(ConfigurationError::UnknownEvent(event));
        }
        self.handlers.remove(&event);
        Ok(())
    }

    /// Invokes the handler attached to `event` with `args`. Returns
    /// without effect when no handler is attached; the handler runs to
    /// completion before this returns.
    ///
    /// # Errors
    /// Fails with [`ConfigurationError::UnknownEvent`] if `event` was
    /// never registered.
    pub fn dispatch(
        &mut self,
        event: EventType,
        args: &EventArgs,
    ) -> Result<(), ConfigurationError> {
        if !self.is_registered(event) {
            return Err(ConfigurationError::UnknownEvent(event));
        }
        if let Some(handler) = self.handlers.get_mut(&event) {
            handler(args);
        }
        Ok(())
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("registered", &self.registered)
            .field("attached", &self.handlers.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dispatch_invokes_handler_with_exact_args_once() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register_event_type(EventType::Resize);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        dispatcher
            .attach(EventType::Resize, move |args| {
                sink.borrow_mut().push(args.clone());
            })
            .unwrap();

        let args = EventArgs::Resize {
            width: 640,
            height: 480,
        };
        dispatcher.dispatch(EventType::Resize, &args).unwrap();

        assert_eq!(seen.borrow().as_slice(), &[args]);
    }

    #[test]
    fn unregistered_event_is_a_configuration_error() {
        let mut dispatcher = EventDispatcher::new();
        assert_eq!(
            dispatcher.attach(EventType::Draw, |_| {}),
            Err(ConfigurationError::UnknownEvent(EventType::Draw))
        );
        assert_eq!(
            dispatcher.dispatch(EventType::Draw, &EventArgs::None),
            Err(ConfigurationError::UnknownEvent(EventType::Draw))
        );
    }

    #[test]
    fn dispatch_without_handler_is_a_no_op() {
        let mut dispatcher = EventDispatcher::with_window_events();
        dispatcher.dispatch(EventType::Draw, &EventArgs::None).unwrap();
    }

    #[test]
    fn reattach_replaces_previous_handler() {
        let mut dispatcher = EventDispatcher::with_window_events();
        let count = Rc::new(RefCell::new((0u32, 0u32)));

        let first = Rc::clone(&count);
        dispatcher
            .attach(EventType::Draw, move |_| first.borrow_mut().0 += 1)
            .unwrap();
        let second = Rc::clone(&count);
        dispatcher
            .attach(EventType::Draw, move |_| second.borrow_mut().1 += 1)
            .unwrap();

        dispatcher.dispatch(EventType::Draw, &EventArgs::None).unwrap();
        assert_eq!(*count.borrow(), (0, 1));
    }

    #[test]
    fn detach_silences_the_event() {
        let mut dispatcher = EventDispatcher::with_window_events();
        let fired = Rc::new(RefCell::new(false));
        let sink = Rc::clone(&fired);
        dispatcher
            .attach(EventType::Close, move |_| *sink.borrow_mut() = true)
            .unwrap();
        dispatcher.detach(EventType::Close).unwrap();
        dispatcher.dispatch(EventType::Close, &EventArgs::None).unwrap();
        assert!(!*fired.borrow());
    }
}
