//! Platform-independent window.
//!
//! The content area of a window is filled entirely with an OpenGL
//! viewport; all rendering is done by the caller through GL. A
//! [`Window`] is one concrete struct composed of logical state, an
//! [`EventDispatcher`] and an opaque [`NativeHandle`] trait object
//! supplied by the owning backend adapter — there is no per-toolkit
//! window subclass.
//!
//! Operations a toolkit does not support are not errors: the default
//! [`NativeHandle`] methods log a warning and no-op, and callers may
//! consult the adapter's capability table beforehand.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::clock::{Clock, TimerHandler};
use crate::event::{ConfigurationError, EventArgs, EventDispatcher, EventType};
use crate::input::MouseButton;

slotmap::new_key_type! {
    /// Identifier of a window inside its owning adapter's registry.
    pub struct WindowId;
}

/// Lifecycle of a window.
///
/// `Created → Shown ⇄ Hidden → Closing → Destroyed`; the transition to
/// `Destroyed` is irreversible and runs the timer-unschedule and
/// registry-removal sequence exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Native resources exist but the window has not been presented.
    Created,
    /// The window is visible.
    Shown,
    /// The window is hidden.
    Hidden,
    /// Close was requested; the adapter finalizes it on the next sweep.
    Closing,
    /// Native resources are released and the registry entry is gone.
    Destroyed,
}

/// Requested properties for a new window.
#[derive(Debug, Clone)]
pub struct WindowSettings {
    /// Client area width in pixels.
    pub width: u32,
    /// Client area height in pixels.
    pub height: u32,
    /// Title; defaults to the program name when `None`.
    pub title: Option<String>,
    /// Whether the window is initially visible.
    pub visible: bool,
    /// Whether the window has a platform frame (title bar, borders).
    pub decoration: bool,
    /// Whether the window covers an entire screen.
    pub fullscreen: bool,
    /// Window whose GL context the new context should share objects
    /// with, on adapters whose capability table reports context sharing.
    pub share: Option<WindowId>,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            title: None,
            visible: true,
            decoration: true,
            fullscreen: false,
            share: None,
        }
    }
}

impl WindowSettings {
    /// Sets the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the client area size.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets initial visibility.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Enables or disables the platform frame.
    #[must_use]
    pub fn with_decoration(mut self, decoration: bool) -> Self {
        self.decoration = decoration;
        self
    }

    /// Requests a fullscreen window.
    #[must_use]
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    /// Requests GL object sharing with an existing window's context.
    #[must_use]
    pub fn with_shared_context(mut self, share: WindowId) -> Self {
        self.share = Some(share);
        self
    }

    /// The title to use: the explicit one, or the program name.
    #[must_use]
    pub fn resolved_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            std::env::args()
                .next()
                .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
        })
    }
}

/// Toolkit-specific side of a window, populated by the owning adapter.
///
/// Every method has a default implementation that logs a warning and
/// no-ops, giving each adapter the original "backend cannot ..."
/// behavior for the operations it does not override. Getters return
/// `None` when unsupported so the [`Window`] can fall back to its cached
/// logical state.
pub trait NativeHandle {
    /// Name of the owning backend, used in unsupported-operation
    /// warnings.
    fn backend(&self) -> &'static str;

    /// Access to the concrete handle type for adapter-internal
    /// downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable access to the concrete handle type.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Makes the window visible.
    fn show(&mut self) {
        log::warn!("{} backend cannot show window", self.backend());
    }

    /// Hides the window.
    fn hide(&mut self) {
        log::warn!("{} backend cannot hide window", self.backend());
    }

    /// Sets the title bar text.
    fn set_title(&mut self, _title: &str) {
        log::warn!("{} backend cannot set window title", self.backend());
    }

    /// Resizes the client area.
    fn set_size(&mut self, _width: u32, _height: u32) {
        log::warn!("{} backend cannot set window size", self.backend());
    }

    /// Current client area size, or `None` when the toolkit cannot
    /// report it.
    fn size(&self) -> Option<(u32, u32)> {
        log::warn!("{} backend cannot get window size", self.backend());
        None
    }

    /// Moves the window on screen.
    fn set_position(&mut self, _x: i32, _y: i32) {
        log::warn!("{} backend cannot set window position", self.backend());
    }

    /// Current window position, or `None` when the toolkit cannot
    /// report it.
    fn position(&self) -> Option<(i32, i32)> {
        log::warn!("{} backend cannot get window position", self.backend());
        None
    }

    /// Presents the back buffer.
    fn swap(&mut self) {
        log::warn!("{} backend cannot swap buffers", self.backend());
    }

    /// Makes the window's GL context current on the calling thread.
    fn activate(&mut self) {
        log::warn!("{} backend cannot make window active", self.backend());
    }

    /// Releases the native window and GL context. Called exactly once,
    /// before `on_close` is dispatched.
    fn destroy(&mut self) {}
}

/// Cloneable close-request flag.
///
/// Event and timer handlers do not borrow their window, so a handler
/// that wants to close it (the usual Escape binding) captures one of
/// these instead. The owning adapter honors the request at the next
/// frame, exactly like [`Window::close`].
#[derive(Clone, Default)]
pub struct CloseHandle(Rc<Cell<bool>>);

impl CloseHandle {
    /// Asks the owning adapter to close the window at the next frame.
    pub fn request(&self) {
        self.0.set(true);
    }

    /// Whether a close has been requested through this handle.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.0.get()
    }
}

/// Platform-independent window handle.
pub struct Window {
    native: Box<dyn NativeHandle>,
    dispatcher: EventDispatcher,
    state: WindowState,
    close_requested: CloseHandle,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    title: String,
    visible: bool,
    fullscreen: bool,
    decoration: bool,
    mouse_x: f64,
    mouse_y: f64,
    button: MouseButton,
    timers: Vec<(TimerHandler, f64)>,
    clock: Option<Clock>,
}

impl Window {
    /// Builds a window around an adapter-supplied native handle. The
    /// full window event vocabulary is registered; the title defaults to
    /// the program name when the settings carry none.
    #[must_use]
    pub fn new(native: Box<dyn NativeHandle>, settings: &WindowSettings) -> Self {
        let title = settings.resolved_title();
        Self {
            native,
            dispatcher: EventDispatcher::with_window_events(),
            state: if settings.visible {
                WindowState::Shown
            } else {
                WindowState::Created
            },
            close_requested: CloseHandle::default(),
            x: 0,
            y: 0,
            width: settings.width,
            height: settings.height,
            title,
            visible: settings.visible,
            fullscreen: settings.fullscreen,
            decoration: settings.decoration,
            mouse_x: 0.0,
            mouse_y: 0.0,
            button: MouseButton::None,
            timers: Vec::new(),
            clock: None,
        }
    }

    // ----------------------------------------------------- event surface ---

    /// Attaches `handler` to `event`, replacing any previous handler.
    pub fn attach<F>(&mut self, event: EventType, handler: F) -> Result<(), ConfigurationError>
    where
        F: FnMut(&EventArgs) + 'static,
    {
        self.dispatcher.attach(event, handler)
    }

    /// Detaches the handler attached to `event`, if any.
    pub fn detach(&mut self, event: EventType) -> Result<(), ConfigurationError> {
        self.dispatcher.detach(event)
    }

    /// Dispatches `event` with `args` to the attached handler, if any.
    pub fn dispatch(
        &mut self,
        event: EventType,
        args: &EventArgs,
    ) -> Result<(), ConfigurationError> {
        self.dispatcher.dispatch(event, args)
    }

    /// Internal dispatch for the fixed vocabulary, which is always
    /// registered; a failure here indicates a bug and is only logged.
    pub(crate) fn emit(&mut self, event: EventType, args: &EventArgs) {
        if let Err(err) = self.dispatcher.dispatch(event, args) {
            log::error!("window event dispatch failed: {err}");
        }
    }

    // --------------------------------------------------------- operations ---

    /// Makes the window visible and dispatches `on_show`.
    pub fn show(&mut self) {
        self.native.show();
        self.visible = true;
        if matches!(self.state, WindowState::Created | WindowState::Hidden) {
            self.state = WindowState::Shown;
        }
        self.emit(EventType::Show, &EventArgs::None);
    }

    /// Hides the window and dispatches `on_hide`.
    pub fn hide(&mut self) {
        self.native.hide();
        self.visible = false;
        if self.state == WindowState::Shown {
            self.state = WindowState::Hidden;
        }
        self.emit(EventType::Hide, &EventArgs::None);
    }

    /// Requests that the window be closed. The owning adapter finalizes
    /// the close on its next `process` sweep: timers are unscheduled,
    /// the registry entry is removed, native resources are released and
    /// `on_close` is dispatched. Requesting close twice is a no-op.
    pub fn close(&mut self) {
        if matches!(self.state, WindowState::Closing | WindowState::Destroyed) {
            return;
        }
        self.state = WindowState::Closing;
    }

    /// Sets the title bar text.
    pub fn set_title(&mut self, title: &str) {
        self.native.set_title(title);
        self.title = title.to_string();
    }

    /// Current title.
    #[must_use]
    pub fn get_title(&self) -> &str {
        &self.title
    }

    /// Resizes the client area.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.native.set_size(width, height);
        if let Some((w, h)) = self.native.size() {
            self.width = w;
            self.height = h;
        }
    }

    /// Current client area size (native when available, cached logical
    /// size otherwise).
    #[must_use]
    pub fn get_size(&self) -> (u32, u32) {
        self.native.size().unwrap_or((self.width, self.height))
    }

    /// Moves the window on screen.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.native.set_position(x, y);
        if let Some((nx, ny)) = self.native.position() {
            self.x = nx;
            self.y = ny;
        }
    }

    /// Current window position (native when available, cached
    /// otherwise).
    #[must_use]
    pub fn get_position(&self) -> (i32, i32) {
        self.native.position().unwrap_or((self.x, self.y))
    }

    /// Presents the back buffer.
    pub fn swap(&mut self) {
        self.native.swap();
    }

    /// Makes the window's GL context current on the calling thread.
    /// Must only be called from the loop thread, immediately before
    /// issuing draw calls for this window.
    pub fn activate(&mut self) {
        self.native.activate();
    }

    // ------------------------------------------------------------- timers ---

    /// Schedules `handler` to run at approximately `fps` invocations per
    /// second once the run loop binds a clock. The stored unit is an
    /// interval in seconds (`1/fps`; an fps of 0 fires every frame).
    /// Returns the shared handler so call sites can keep it for
    /// unscheduling.
    pub fn timer<F>(&mut self, fps: f64, handler: F) -> TimerHandler
    where
        F: FnMut(f64) + 'static,
    {
        let interval = if fps > 0.0 { 1.0 / fps } else { fps };
        let handler: TimerHandler = Rc::new(RefCell::new(handler));
        self.timers.push((Rc::clone(&handler), interval));
        if let Some(clock) = &self.clock {
            clock.schedule_interval(Rc::clone(&handler), interval);
        }
        handler
    }

    /// Binds `clock` to this window and arms the timer stack against it.
    pub fn bind_clock(&mut self, clock: Clock) {
        for (handler, interval) in &self.timers {
            clock.schedule_interval(Rc::clone(handler), *interval);
        }
        self.clock = Some(clock);
    }

    /// The timer stack as `(handler, interval-in-seconds)` pairs.
    #[must_use]
    pub fn timers(&self) -> &[(TimerHandler, f64)] {
        &self.timers
    }

    // ---------------------------------------------------------- lifecycle ---

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Whether a close has been requested but not yet finalized.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        match self.state {
            WindowState::Closing => true,
            WindowState::Destroyed => false,
            _ => self.close_requested.is_requested(),
        }
    }

    /// A handle that event and timer handlers can capture to request a
    /// close from inside a dispatch.
    #[must_use]
    pub fn close_handle(&self) -> CloseHandle {
        self.close_requested.clone()
    }

    /// Whether the window is visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the window was created fullscreen.
    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Whether the window has a platform frame.
    #[must_use]
    pub fn has_decoration(&self) -> bool {
        self.decoration
    }

    /// Last known mouse position in window coordinates.
    #[must_use]
    pub fn mouse_position(&self) -> (f64, f64) {
        (self.mouse_x, self.mouse_y)
    }

    /// Currently pressed mouse button ([`MouseButton::None`] when no
    /// button is down).
    #[must_use]
    pub fn pressed_button(&self) -> MouseButton {
        self.button
    }

    pub(crate) fn native(&self) -> &dyn NativeHandle {
        self.native.as_ref()
    }

    pub(crate) fn native_mut(&mut self) -> &mut dyn NativeHandle {
        self.native.as_mut()
    }

    /// Re-reads size and position from the native handle into the local
    /// cache. Adapters call this once after creation, since the toolkit
    /// may not honor the requested geometry exactly.
    pub(crate) fn refresh_geometry(&mut self) {
        if let Some((w, h)) = self.native.size() {
            self.width = w;
            self.height = h;
        }
        if let Some((x, y)) = self.native.position() {
            self.x = x;
            self.y = y;
        }
    }

    /// Runs the destruction sequence: unschedule every timer, release
    /// native resources, then dispatch `on_close`. Idempotent; the
    /// owning adapter calls this exactly once, after removing the window
    /// from its registry.
    pub(crate) fn finalize_close(&mut self) {
        if self.state == WindowState::Destroyed {
            return;
        }
        if let Some(clock) = &self.clock {
            for (handler, _interval) in &self.timers {
                clock.unschedule(handler);
            }
        }
        self.native.destroy();
        self.state = WindowState::Destroyed;
        self.emit(EventType::Close, &EventArgs::None);
    }

    // --------------------------------------- native event entry points ---
    // Called by the owning adapter while draining its toolkit's event
    // queue, after translating native codes into the common vocabulary.

    /// Records a button press and dispatches `on_mouse_press`.
    pub fn notify_mouse_press(&mut self, x: f64, y: f64, button: MouseButton) {
        self.button = button;
        self.mouse_x = x;
        self.mouse_y = y;
        self.emit(EventType::MousePress, &EventArgs::MouseButton { x, y, button });
    }

    /// Records a button release and dispatches `on_mouse_release`.
    pub fn notify_mouse_release(&mut self, x: f64, y: f64, button: MouseButton) {
        self.button = MouseButton::None;
        self.mouse_x = x;
        self.mouse_y = y;
        self.emit(EventType::MouseRelease, &EventArgs::MouseButton { x, y, button });
    }

    /// Dispatches `on_mouse_drag` while a button is held, otherwise
    /// `on_mouse_motion`, with deltas from the last known position.
    pub fn notify_mouse_motion(&mut self, x: f64, y: f64) {
        let dx = x - self.mouse_x;
        let dy = y - self.mouse_y;
        self.mouse_x = x;
        self.mouse_y = y;
        if self.button.is_pressed() {
            let button = self.button;
            self.emit(
                EventType::MouseDrag,
                &EventArgs::MouseDrag { x, y, dx, dy, button },
            );
        } else {
            self.emit(EventType::MouseMotion, &EventArgs::MouseMotion { x, y, dx, dy });
        }
    }

    /// Dispatches `on_mouse_scroll` at the last known cursor position.
    pub fn notify_scroll(&mut self, dx: f64, dy: f64) {
        let (x, y) = (self.mouse_x, self.mouse_y);
        self.emit(EventType::MouseScroll, &EventArgs::MouseScroll { x, y, dx, dy });
    }

    /// Dispatches `on_key_press`.
    pub fn notify_key_press(&mut self, symbol: crate::input::Key, modifiers: crate::input::Modifiers) {
        self.emit(EventType::KeyPress, &EventArgs::Key { symbol, modifiers });
    }

    /// Dispatches `on_key_release`.
    pub fn notify_key_release(
        &mut self,
        symbol: crate::input::Key,
        modifiers: crate::input::Modifiers,
    ) {
        self.emit(EventType::KeyRelease, &EventArgs::Key { symbol, modifiers });
    }

    /// Dispatches `on_character`.
    pub fn notify_character(&mut self, character: char) {
        self.emit(EventType::Character, &EventArgs::Character(character));
    }

    /// Dispatches `on_enter` or `on_leave`.
    pub fn notify_cursor_enter(&mut self, entered: bool) {
        if entered {
            self.emit(EventType::Enter, &EventArgs::None);
        } else {
            self.emit(EventType::Leave, &EventArgs::None);
        }
    }

    /// Updates the cached size and dispatches `on_resize`.
    pub fn notify_resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.emit(EventType::Resize, &EventArgs::Resize { width, height });
    }

    /// Records native visibility and dispatches `on_show`.
    pub fn notify_shown(&mut self) {
        self.visible = true;
        if matches!(self.state, WindowState::Created | WindowState::Hidden) {
            self.state = WindowState::Shown;
        }
        self.emit(EventType::Show, &EventArgs::None);
    }

    /// Records native visibility and dispatches `on_hide`.
    pub fn notify_hidden(&mut self) {
        self.visible = false;
        if self.state == WindowState::Shown {
            self.state = WindowState::Hidden;
        }
        self.emit(EventType::Hide, &EventArgs::None);
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("backend", &self.native.backend())
            .field("title", &self.title)
            .field("size", &(self.width, self.height))
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::template::TemplateHandle;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn bare_window() -> Window {
        Window::new(
            Box::new(TemplateHandle::new()),
            &WindowSettings::default().with_title("test"),
        )
    }

    #[test]
    fn timer_stores_interval_as_reciprocal_fps() {
        let mut window = bare_window();
        window.timer(2.0, |_| {});
        window.timer(0.0, |_| {});
        let intervals: Vec<f64> = window.timers().iter().map(|(_, i)| *i).collect();
        assert_eq!(intervals, vec![0.5, 0.0]);
    }

    #[test]
    fn bind_clock_arms_timer_stack() {
        let mut window = bare_window();
        window.timer(60.0, |_| {});
        window.timer(1.0, |_| {});
        let clock = Clock::new();
        window.bind_clock(clock.clone());
        assert_eq!(clock.scheduled_count(), 2);
    }

    #[test]
    fn timer_added_after_binding_is_armed_immediately() {
        let mut window = bare_window();
        let clock = Clock::new();
        window.bind_clock(clock.clone());
        window.timer(0.0, |_| {});
        assert_eq!(clock.scheduled_count(), 1);
    }

    #[test]
    fn unsupported_operations_leave_state_unchanged() {
        // The template handle supports nothing; every operation must
        // warn and no-op without touching the logical state.
        let mut window = bare_window();
        let size = window.get_size();
        let position = window.get_position();
        window.set_size(1024, 768);
        window.set_position(42, 24);
        assert_eq!(window.get_size(), size);
        assert_eq!(window.get_position(), position);
    }

    #[test]
    fn finalize_close_unschedules_timers_once() {
        let mut window = bare_window();
        window.timer(10.0, |_| {});
        let clock = Clock::new();
        window.bind_clock(clock.clone());
        assert_eq!(clock.scheduled_count(), 1);

        let closes = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&closes);
        window
            .attach(EventType::Close, move |_| *sink.borrow_mut() += 1)
            .unwrap();

        window.finalize_close();
        window.finalize_close();
        assert_eq!(clock.scheduled_count(), 0);
        assert_eq!(*closes.borrow(), 1);
        assert_eq!(window.state(), WindowState::Destroyed);
    }

    #[test]
    fn motion_becomes_drag_while_button_held() {
        let mut window = bare_window();
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let motion = Rc::clone(&kinds);
        window
            .attach(EventType::MouseMotion, move |_| motion.borrow_mut().push("motion"))
            .unwrap();
        let drag = Rc::clone(&kinds);
        window
            .attach(EventType::MouseDrag, move |_| drag.borrow_mut().push("drag"))
            .unwrap();

        window.notify_mouse_motion(10.0, 10.0);
        window.notify_mouse_press(10.0, 10.0, MouseButton::Left);
        window.notify_mouse_motion(20.0, 20.0);
        window.notify_mouse_release(20.0, 20.0, MouseButton::Left);
        window.notify_mouse_motion(30.0, 30.0);

        assert_eq!(kinds.borrow().as_slice(), &["motion", "drag", "motion"]);
    }

    #[test]
    fn close_handle_marks_window_closing() {
        let window = bare_window();
        let handle = window.close_handle();
        assert!(!window.is_closing());
        handle.request();
        assert!(window.is_closing());
    }

    #[test]
    fn resize_updates_cached_size_before_dispatch() {
        let mut window = bare_window();
        window.notify_resize(800, 600);
        assert_eq!(window.get_size(), (800, 600));
    }
}
