//! In-memory adapter with no native toolkit.
//!
//! Windows exist purely as logical state: geometry and visibility are
//! tracked, `activate` and `swap` are counted but touch no GL. The
//! adapter implements the full backend contract, which makes it the
//! reference implementation for the frame protocol and the vehicle for
//! exercising multi-window lifecycle behavior on machines without a
//! display server.

use slotmap::SlotMap;

use crate::config::Config;
use crate::event::{EventArgs, EventType};
use crate::window::{NativeHandle, Window, WindowId, WindowSettings};

use super::{Backend, Capabilities, WindowCreationError};

const CAPABILITIES: Capabilities = Capabilities {
    window_position: true,
    window_size: true,
    multiple_windows: true,
    mouse_scroll: false,
    non_decorated: true,
    non_sizeable: true,
    fullscreen: true,
    unicode: false,
    gl_version: false,
    gl_profile: false,
    context_sharing: false,
};

/// Logical stand-in for a native window.
#[derive(Debug)]
pub struct HeadlessHandle {
    title: String,
    size: (u32, u32),
    position: (i32, i32),
    visible: bool,
    destroyed: bool,
    swaps: u64,
    activations: u64,
}

impl HeadlessHandle {
    fn new(settings: &WindowSettings) -> Self {
        Self {
            title: String::new(),
            size: (settings.width, settings.height),
            position: (0, 0),
            visible: settings.visible,
            destroyed: false,
            swaps: 0,
            activations: 0,
        }
    }

    /// How many times the back buffer was "presented".
    #[must_use]
    pub fn swap_count(&self) -> u64 {
        self.swaps
    }

    /// How many times the context was made current.
    #[must_use]
    pub fn activation_count(&self) -> u64 {
        self.activations
    }

    /// Whether `destroy` has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl NativeHandle for HeadlessHandle {
    fn backend(&self) -> &'static str {
        "headless"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn size(&self) -> Option<(u32, u32)> {
        Some(self.size)
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn position(&self) -> Option<(i32, i32)> {
        Some(self.position)
    }

    fn swap(&mut self) {
        self.swaps += 1;
    }

    fn activate(&mut self) {
        self.activations += 1;
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}

/// Adapter whose "toolkit" is process memory.
#[derive(Default)]
pub struct HeadlessBackend {
    windows: SlotMap<WindowId, Window>,
}

impl HeadlessBackend {
    /// Creates the adapter; never fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instrumentation access to a live window's logical handle.
    #[must_use]
    pub fn handle(&self, id: WindowId) -> Option<&HeadlessHandle> {
        self.windows
            .get(id)
            .and_then(|window| window.native().as_any().downcast_ref())
    }
}

impl Backend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn version(&self) -> Option<String> {
        Some(env!("CARGO_PKG_VERSION").to_string())
    }

    fn capabilities(&self) -> Capabilities {
        CAPABILITIES
    }

    fn create_window(
        &mut self,
        settings: &WindowSettings,
        _config: &Config,
    ) -> Result<WindowId, WindowCreationError> {
        // No pixel format to negotiate; the config is accepted as-is.
        let window = Window::new(Box::new(HeadlessHandle::new(settings)), settings);
        Ok(self.windows.insert(window))
    }

    fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().collect()
    }

    fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn close_window(&mut self, id: WindowId) -> bool {
        match self.windows.remove(id) {
            Some(mut window) => {
                window.finalize_close();
                true
            }
            None => false,
        }
    }

    fn process(&mut self, dt: f64) -> usize {
        for id in self.window_ids() {
            if self.windows.get(id).is_some_and(Window::is_closing) {
                self.close_window(id);
                continue;
            }
            if let Some(window) = self.windows.get_mut(id) {
                window.activate();
                window.emit(EventType::Draw, &EventArgs::None);
                window.emit(EventType::Idle, &EventArgs::Idle { dt });
                window.swap();
            }
        }
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(
        backend: &mut HeadlessBackend,
        id: WindowId,
        log: &Rc<RefCell<Vec<String>>>,
        tag: &str,
    ) {
        let window = backend.window_mut(id).unwrap();
        let draw_log = Rc::clone(log);
        let draw_tag = format!("{tag}:draw");
        window
            .attach(EventType::Draw, move |_| {
                draw_log.borrow_mut().push(draw_tag.clone());
            })
            .unwrap();
        let idle_log = Rc::clone(log);
        let idle_tag = format!("{tag}:idle");
        window
            .attach(EventType::Idle, move |args| {
                assert!(matches!(args, EventArgs::Idle { .. }));
                idle_log.borrow_mut().push(idle_tag.clone());
            })
            .unwrap();
    }

    #[test]
    fn process_draws_idles_and_swaps_every_window_in_order() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.capabilities().multiple_windows);

        let settings = WindowSettings::default();
        let config = Config::default();
        let first = backend.create_window(&settings, &config).unwrap();
        let second = backend.create_window(&settings, &config).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut backend, first, &log, "a");
        record(&mut backend, second, &log, "b");

        assert_eq!(backend.process(0.016), 2);
        assert_eq!(
            log.borrow().as_slice(),
            &["a:draw", "a:idle", "b:draw", "b:idle"]
        );
        assert_eq!(backend.handle(first).unwrap().swap_count(), 1);
        assert_eq!(backend.handle(second).unwrap().swap_count(), 1);
        assert_eq!(backend.handle(first).unwrap().activation_count(), 1);
    }

    #[test]
    fn closed_window_is_not_touched_by_the_next_process() {
        let mut backend = HeadlessBackend::new();
        let settings = WindowSettings::default();
        let config = Config::default();
        let doomed = backend.create_window(&settings, &config).unwrap();
        let survivor = backend.create_window(&settings, &config).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut backend, doomed, &log, "doomed");
        record(&mut backend, survivor, &log, "survivor");

        assert!(backend.close_window(doomed));
        assert_eq!(backend.process(0.016), 1);
        assert_eq!(
            log.borrow().as_slice(),
            &["survivor:draw", "survivor:idle"]
        );
        assert!(backend.window(doomed).is_none());
        assert_eq!(backend.handle(survivor).unwrap().swap_count(), 1);
    }

    #[test]
    fn close_is_idempotent() {
        let mut backend = HeadlessBackend::new();
        let id = backend
            .create_window(&WindowSettings::default(), &Config::default())
            .unwrap();
        assert!(backend.close_window(id));
        assert!(!backend.close_window(id));
        assert_eq!(backend.window_count(), 0);
    }

    #[test]
    fn close_requested_on_the_window_is_finalized_by_process() {
        let mut backend = HeadlessBackend::new();
        let id = backend
            .create_window(&WindowSettings::default(), &Config::default())
            .unwrap();

        let closed = Rc::new(RefCell::new(false));
        let sink = Rc::clone(&closed);
        backend
            .window_mut(id)
            .unwrap()
            .attach(EventType::Close, move |_| *sink.borrow_mut() = true)
            .unwrap();

        backend.window_mut(id).unwrap().close();
        assert_eq!(backend.process(0.016), 0);
        assert!(*closed.borrow());
        assert!(backend.window(id).is_none());
    }

    #[test]
    fn handle_tracks_logical_geometry() {
        let mut backend = HeadlessBackend::new();
        let id = backend
            .create_window(
                &WindowSettings::default().with_size(320, 200),
                &Config::default(),
            )
            .unwrap();
        let window = backend.window_mut(id).unwrap();
        assert_eq!(window.get_size(), (320, 200));
        window.set_size(640, 400);
        window.set_position(15, 25);
        assert_eq!(window.get_size(), (640, 400));
        assert_eq!(window.get_position(), (15, 25));
    }
}
