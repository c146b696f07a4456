//! Skeleton adapter for bringing up a new toolkit.
//!
//! Copy this module, replace the marked sections with calls into the
//! toolkit, flip the capability flags the toolkit supports, and register
//! the adapter in [`BackendKind`](super::BackendKind). Until overridden,
//! every window operation inherits the default warn/no-op behavior from
//! [`NativeHandle`], so a partially ported adapter degrades gracefully
//! instead of crashing.

use slotmap::SlotMap;

use crate::config::Config;
use crate::event::{EventArgs, EventType};
use crate::window::{NativeHandle, Window, WindowId, WindowSettings};

use super::{Backend, Capabilities, WindowCreationError};

/// Native handle with no toolkit behind it; every operation warns and
/// no-ops.
#[derive(Debug, Default)]
pub struct TemplateHandle;

impl TemplateHandle {
    /// Creates the handle.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NativeHandle for TemplateHandle {
    fn backend(&self) -> &'static str {
        "template"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    // Override show/hide/set_title/... here with toolkit calls.
}

/// Adapter skeleton: owns a window registry and the frame loop shape,
/// with no native toolkit attached.
#[derive(Default)]
pub struct TemplateBackend {
    windows: SlotMap<WindowId, Window>,
}

impl TemplateBackend {
    /// Creates the adapter. A real port would initialize its toolkit
    /// here (idempotently) and fail with
    /// [`BackendError::Unavailable`](super::BackendError::Unavailable)
    /// when the library cannot load.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for TemplateBackend {
    fn name(&self) -> &'static str {
        "template"
    }

    fn version(&self) -> Option<String> {
        // Return the toolkit version once one is attached.
        None
    }

    fn capabilities(&self) -> Capabilities {
        // All false until the toolkit proves otherwise.
        Capabilities::default()
    }

    fn create_window(
        &mut self,
        settings: &WindowSettings,
        _config: &Config,
    ) -> Result<WindowId, WindowCreationError> {
        // Apply `_config` to the toolkit's context creation, create the
        // native window, then wrap it. Creation failures map to
        // WindowCreationError.
        let window = Window::new(Box::new(TemplateHandle::new()), settings);
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
        // Drain and translate pending toolkit events here. Must always
        // return without blocking.

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

    #[test]
    fn skeleton_reports_no_capabilities() {
        let backend = TemplateBackend::new();
        assert_eq!(backend.capabilities(), Capabilities::default());
        assert!(backend.version().is_none());
    }

    #[test]
    fn skeleton_still_runs_the_frame_loop() {
        let mut backend = TemplateBackend::new();
        let id = backend
            .create_window(&WindowSettings::default(), &Config::default())
            .unwrap();
        assert_eq!(backend.process(0.016), 1);
        assert!(backend.close_window(id));
        assert!(!backend.close_window(id));
        assert_eq!(backend.process(0.016), 0);
    }
}
