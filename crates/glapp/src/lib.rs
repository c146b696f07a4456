//! # glapp
//!
//! A platform-independent window and event abstraction for OpenGL
//! applications. One common [`window::Window`] type and event
//! vocabulary sit on top of interchangeable backend adapters; the
//! content area of every window is an OpenGL viewport and all rendering
//! is left to the caller.
//!
//! ## Features
//!
//! - **Backend adapters**: GLFW (default), SDL2 (feature-gated) and an
//!   always-available headless adapter
//! - **Common event vocabulary**: one handler per event, dispatched
//!   synchronously on the loop thread
//! - **Graceful degradation**: unsupported operations warn and no-op,
//!   with a per-adapter [`backend::Capabilities`] table for detection
//! - **Interval timers**: per-window timers paced by the loop clock
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glapp::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut backend = BackendKind::Headless.create()?;
//!     let id = backend.create_window(&WindowSettings::default(), &Config::default())?;
//!
//!     let window = backend.window_mut(id).unwrap();
//!     let close = window.close_handle();
//!     window.attach(EventType::KeyPress, move |args| {
//!         if let EventArgs::Key { symbol: Key::Escape, .. } = args {
//!             close.request();
//!         }
//!     })?;
//!
//!     let clock = Clock::new();
//!     glapp::run(&mut *backend, &clock, 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod backend;
pub mod clock;
pub mod config;
pub mod event;
pub mod input;
pub mod window;

mod app;

pub use app::run;

/// Common imports for applications built on the crate.
pub mod prelude {
    pub use crate::backend::{Backend, BackendError, BackendKind, Capabilities};
    pub use crate::clock::Clock;
    pub use crate::config::Config;
    pub use crate::event::{ConfigurationError, EventArgs, EventType};
    pub use crate::input::{Key, Modifiers, MouseButton};
    pub use crate::run;
    pub use crate::window::{CloseHandle, Window, WindowId, WindowSettings};
}
