//! Backend adapters.
//!
//! An adapter binds the common [`Window`](crate::window::Window) /
//! event model to one native windowing + GL toolkit. Each adapter owns
//! the registry of its live windows, translates native input codes into
//! the common vocabulary, and implements the per-frame [`Backend::process`]
//! step the run loop drives.
//!
//! Adapters are ordinary owned objects created through [`BackendKind`]
//! — there is no process-wide adapter singleton, and tests may run
//! several independent adapter instances.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config::Config;
use crate::window::{Window, WindowId, WindowSettings};

#[cfg(feature = "backend-glfw")]
pub mod glfw;
pub mod headless;
#[cfg(feature = "backend-sdl2")]
pub mod sdl;
pub mod template;

/// Per-adapter feature support, used for graceful degradation: an
/// operation whose flag is `false` warns and no-ops instead of raising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Window position can be queried and set.
    pub window_position: bool,
    /// Window size can be queried and set.
    pub window_size: bool,
    /// More than one window may be open at a time.
    pub multiple_windows: bool,
    /// Mouse scroll events are delivered.
    pub mouse_scroll: bool,
    /// Windows can be created without a platform frame.
    pub non_decorated: bool,
    /// Windows can be created non-resizable.
    pub non_sizeable: bool,
    /// Fullscreen windows are supported.
    pub fullscreen: bool,
    /// Unicode character input is delivered.
    pub unicode: bool,
    /// The GL context version can be selected.
    pub gl_version: bool,
    /// The GL profile can be selected.
    pub gl_profile: bool,
    /// GL contexts can share objects between windows.
    pub context_sharing: bool,
}

/// Failure to obtain an adapter from the factory.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The underlying toolkit failed to load or initialize. Not
    /// recoverable within this adapter; pick a different backend.
    #[error("{backend} backend is unavailable: {reason}")]
    Unavailable {
        /// Adapter name.
        backend: &'static str,
        /// Toolkit-reported cause.
        reason: String,
    },
}

/// Failure of a single `create_window` call. Fatal to that call, not to
/// the process.
#[derive(Error, Debug)]
pub enum WindowCreationError {
    /// The native window could not be created.
    #[error("native window creation failed: {0}")]
    Window(String),
    /// The window exists but a GL context could not be created for it.
    #[error("GL context creation failed: {0}")]
    Context(String),
}

/// Contract every backend adapter implements.
///
/// All methods run on the single loop thread; `process` is the only
/// point that touches the OS event queue and must never block past the
/// toolkit's non-blocking poll semantics.
pub trait Backend {
    /// Adapter name (toolkit name).
    fn name(&self) -> &'static str;

    /// Toolkit version string, when the toolkit reports one.
    fn version(&self) -> Option<String>;

    /// The adapter's feature support table.
    fn capabilities(&self) -> Capabilities;

    /// Creates a native window plus GL context configured by `config`,
    /// registers it in the adapter's window registry and returns its id.
    fn create_window(
        &mut self,
        settings: &WindowSettings,
        config: &Config,
    ) -> Result<WindowId, WindowCreationError>;

    /// Shared access to a live window.
    fn window(&self, id: WindowId) -> Option<&Window>;

    /// Exclusive access to a live window.
    fn window_mut(&mut self, id: WindowId) -> Option<&mut Window>;

    /// Ids of all live windows, in registry order.
    fn window_ids(&self) -> Vec<WindowId>;

    /// Number of live windows.
    fn window_count(&self) -> usize;

    /// Closes a window immediately: unschedules its timers, removes it
    /// from the registry, releases native resources, then dispatches
    /// `on_close`. Returns `false` (a no-op) when `id` is not a live
    /// window, so double-close is harmless.
    fn close_window(&mut self, id: WindowId) -> bool;

    /// One frame: drains pending native events into window dispatches,
    /// then for every live window activates its context, dispatches
    /// `on_draw` and `on_idle(dt)` in that order, and swaps buffers.
    /// Returns the number of windows still alive; 0 tells the run loop
    /// to stop.
    fn process(&mut self, dt: f64) -> usize;
}

/// The available adapters, selected explicitly at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// GLFW toolkit adapter.
    Glfw,
    /// SDL2 toolkit adapter.
    Sdl2,
    /// In-memory adapter with no native toolkit; always available.
    Headless,
}

impl BackendKind {
    /// Creates the adapter, initializing its toolkit lazily.
    ///
    /// # Errors
    /// [`BackendError::Unavailable`] when the toolkit cannot initialize
    /// or the crate was built without the adapter's feature.
    pub fn create(self) -> Result<Box<dyn Backend>, BackendError> {
        match self {
            #[cfg(feature = "backend-glfw")]
            Self::Glfw => Ok(Box::new(glfw::GlfwBackend::new()?)),
            #[cfg(not(feature = "backend-glfw"))]
            Self::Glfw => Err(BackendError::Unavailable {
                backend: "GLFW",
                reason: "crate built without the `backend-glfw` feature".to_string(),
            }),
            #[cfg(feature = "backend-sdl2")]
            Self::Sdl2 => Ok(Box::new(sdl::SdlBackend::new()?)),
            #[cfg(not(feature = "backend-sdl2"))]
            Self::Sdl2 => Err(BackendError::Unavailable {
                backend: "SDL2",
                reason: "crate built without the `backend-sdl2` feature".to_string(),
            }),
            Self::Headless => Ok(Box::new(headless::HeadlessBackend::new())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Glfw => "glfw",
            Self::Sdl2 => "sdl2",
            Self::Headless => "headless",
        })
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "glfw" => Ok(Self::Glfw),
            "sdl" | "sdl2" => Ok(Self::Sdl2),
            "headless" => Ok(Self::Headless),
            other => Err(format!(
                "unknown backend `{other}` (expected glfw, sdl2 or headless)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse() {
        assert_eq!("glfw".parse::<BackendKind>(), Ok(BackendKind::Glfw));
        assert_eq!("SDL2".parse::<BackendKind>(), Ok(BackendKind::Sdl2));
        assert_eq!("sdl".parse::<BackendKind>(), Ok(BackendKind::Sdl2));
        assert_eq!("headless".parse::<BackendKind>(), Ok(BackendKind::Headless));
        assert!("gtk".parse::<BackendKind>().is_err());
    }

    #[test]
    fn headless_is_always_available() {
        let backend = BackendKind::Headless.create().unwrap();
        assert_eq!(backend.name(), "headless");
        assert!(backend.capabilities().multiple_windows);
    }
}
