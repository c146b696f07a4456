//! Event-echo demo.
//!
//! Opens one window on the selected backend, prints every event it
//! receives and reports the measured frame rate once per second.
//! Escape closes the window, which ends the run loop.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use glapp::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "demo_app", about = "Echoes window events on the selected backend")]
struct Args {
    /// Backend adapter to drive (glfw, sdl2 or headless).
    #[arg(long, default_value = "glfw")]
    backend: BackendKind,

    /// Frame rate cap in frames per second; 0 disables the cap.
    #[arg(long, default_value_t = 60.0)]
    framerate: f64,

    /// Window width in pixels.
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Window height in pixels.
    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Optional TOML file with the GL framebuffer configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn attach_echo_handlers(window: &mut Window) -> Result<(), ConfigurationError> {
    window.attach(EventType::Init, |_| println!("on_init"))?;
    window.attach(EventType::Show, |_| println!("on_show"))?;
    window.attach(EventType::Hide, |_| println!("on_hide"))?;
    window.attach(EventType::Close, |_| println!("on_close"))?;
    window.attach(EventType::Enter, |_| println!("on_enter"))?;
    window.attach(EventType::Leave, |_| println!("on_leave"))?;
    window.attach(EventType::Resize, |args| {
        if let EventArgs::Resize { width, height } = args {
            println!("on_resize: {width}x{height}");
        }
    })?;
    window.attach(EventType::Character, |args| {
        if let EventArgs::Character(character) = args {
            println!("on_character: {character:?}");
        }
    })?;
    window.attach(EventType::KeyRelease, |args| {
        if let EventArgs::Key { symbol, modifiers } = args {
            println!("on_key_release: {symbol:?} {modifiers:?}");
        }
    })?;
    window.attach(EventType::MousePress, |args| {
        if let EventArgs::MouseButton { x, y, button } = args {
            println!("on_mouse_press: {button:?} at ({x:.0}, {y:.0})");
        }
    })?;
    window.attach(EventType::MouseRelease, |args| {
        if let EventArgs::MouseButton { x, y, button } = args {
            println!("on_mouse_release: {button:?} at ({x:.0}, {y:.0})");
        }
    })?;
    window.attach(EventType::MouseDrag, |args| {
        if let EventArgs::MouseDrag { x, y, dx, dy, button } = args {
            println!("on_mouse_drag: {button:?} at ({x:.0}, {y:.0}) delta ({dx:.0}, {dy:.0})");
        }
    })?;
    window.attach(EventType::MouseScroll, |args| {
        if let EventArgs::MouseScroll { dx, dy, .. } = args {
            println!("on_mouse_scroll: ({dx:.1}, {dy:.1})");
        }
    })?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("could not load GL configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let mut backend = args
        .backend
        .create()
        .with_context(|| format!("could not initialize the {} backend", args.backend))?;
    log::info!(
        "backend: {} {}",
        backend.name(),
        backend.version().unwrap_or_default()
    );

    let settings = WindowSettings::default()
        .with_title("glapp demo")
        .with_size(args.width, args.height);
    let id = backend
        .create_window(&settings, &config)
        .context("could not create the demo window")?;

    let clock = Clock::new();
    let window = backend.window_mut(id).context("window vanished")?;
    attach_echo_handlers(window)?;

    // Escape closes the window; run ends with the last window.
    let close = window.close_handle();
    window.attach(EventType::KeyPress, move |args| {
        if let EventArgs::Key { symbol, modifiers } = args {
            println!("on_key_press: {symbol:?} {modifiers:?}");
            if *symbol == Key::Escape {
                close.request();
            }
        }
    })?;

    let fps_clock = clock.clone();
    window.timer(1.0, move |_dt| {
        println!("fps: {:.1}", fps_clock.get_fps());
    });

    glapp::run(&mut *backend, &clock, args.framerate);
    Ok(())
}
