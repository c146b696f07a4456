//! SDL2 adapter.
//!
//! SDL delivers all events through one process-wide pump, tagged with a
//! numeric window id, so the adapter keeps a side table from SDL ids to
//! registry keys. SDL keycodes for letters are lowercase; they are
//! canonicalized to their uppercase ASCII codes so handlers see the
//! same symbols every adapter produces.

use std::collections::HashMap;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Mod};
use sdl2::video::{GLProfile, SwapInterval, WindowPos};
use slotmap::SlotMap;

use crate::config::{Config, Profile};
use crate::event::{EventArgs, EventType};
use crate::input::{Key, Modifiers, MouseButton};
use crate::window::{NativeHandle, Window, WindowId, WindowSettings};

use super::{Backend, BackendError, Capabilities, WindowCreationError};

const CAPABILITIES: Capabilities = Capabilities {
    window_position: true,
    window_size: true,
    multiple_windows: true,
    mouse_scroll: true,
    non_decorated: true,
    non_sizeable: true,
    fullscreen: true,
    unicode: true,
    gl_version: true,
    gl_profile: true,
    context_sharing: false,
};

/// Native side of an SDL window: the window plus its GL context. Both
/// are dropped on `destroy`, which tears the native window down.
pub struct SdlHandle {
    window: Option<sdl2::video::Window>,
    context: Option<sdl2::video::GLContext>,
    native_id: u32,
}

impl SdlHandle {
    fn window(&self) -> Option<&sdl2::video::Window> {
        self.window.as_ref()
    }

    fn window_mut(&mut self) -> Option<&mut sdl2::video::Window> {
        self.window.as_mut()
    }
}

impl NativeHandle for SdlHandle {
    fn backend(&self) -> &'static str {
        "sdl2"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn show(&mut self) {
        if let Some(window) = self.window_mut() {
            window.show();
        }
    }

    fn hide(&mut self) {
        if let Some(window) = self.window_mut() {
            window.hide();
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = self.window_mut() {
            if let Err(err) = window.set_title(title) {
                log::warn!("SDL rejected window title: {err}");
            }
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if let Some(window) = self.window_mut() {
            if let Err(err) = window.set_size(width, height) {
                log::warn!("SDL rejected window size {width}x{height}: {err}");
            }
        }
    }

    fn size(&self) -> Option<(u32, u32)> {
        // Drawable size tracks the GL framebuffer on HiDPI displays.
        self.window().map(sdl2::video::Window::drawable_size)
    }

    fn set_position(&mut self, x: i32, y: i32) {
        if let Some(window) = self.window_mut() {
            window.set_position(WindowPos::Positioned(x), WindowPos::Positioned(y));
        }
    }

    fn position(&self) -> Option<(i32, i32)> {
        self.window().map(sdl2::video::Window::position)
    }

    fn swap(&mut self) {
        if let Some(window) = self.window_mut() {
            window.gl_swap_window();
        }
    }

    fn activate(&mut self) {
        if let (Some(window), Some(context)) = (self.window.as_ref(), self.context.as_ref()) {
            if let Err(err) = window.gl_make_current(context) {
                log::warn!("could not make GL context current: {err}");
            }
        }
    }

    fn destroy(&mut self) {
        self.context = None;
        self.window = None;
    }
}

/// Adapter over the SDL2 toolkit.
pub struct SdlBackend {
    video: sdl2::VideoSubsystem,
    event_pump: sdl2::EventPump,
    windows: SlotMap<WindowId, Window>,
    by_native_id: HashMap<u32, WindowId>,
}

impl SdlBackend {
    /// Initializes SDL with its video subsystem and returns the adapter.
    ///
    /// # Errors
    /// [`BackendError::Unavailable`] when SDL or its video subsystem
    /// fails to initialize.
    pub fn new() -> Result<Self, BackendError> {
        let unavailable = |reason: String| BackendError::Unavailable {
            backend: "SDL2",
            reason,
        };
        let sdl = sdl2::init().map_err(unavailable)?;
        let video = sdl.video().map_err(unavailable)?;
        let event_pump = sdl.event_pump().map_err(unavailable)?;
        log::debug!("SDL {} initialized", sdl2::version::version());
        Ok(Self {
            video,
            event_pump,
            windows: SlotMap::with_key(),
            by_native_id: HashMap::new(),
        })
    }

    fn apply_config_attrs(&self, config: &Config) {
        let gl_attr = self.video.gl_attr();
        gl_attr.set_red_size(config.red_size);
        gl_attr.set_green_size(config.green_size);
        gl_attr.set_blue_size(config.blue_size);
        gl_attr.set_alpha_size(config.alpha_size);
        gl_attr.set_depth_size(config.depth_size);
        gl_attr.set_stencil_size(config.stencil_size);
        gl_attr.set_double_buffer(config.double_buffer);
        gl_attr.set_multisample_buffers(u8::from(config.samples > 0));
        gl_attr.set_multisample_samples(config.samples);
        gl_attr.set_stereo(config.stereo);
        gl_attr.set_framebuffer_srgb_compatible(config.srgb);
        gl_attr.set_context_version(config.major_version, config.minor_version);
        gl_attr.set_context_profile(match config.profile {
            Profile::Core => GLProfile::Core,
            Profile::Compatibility => GLProfile::Compatibility,
            Profile::Es => GLProfile::GLES,
        });
    }

    fn dispatch_event(&mut self, event: Event) -> Vec<WindowId> {
        let mut closed = Vec::new();
        match event {
            // A process-level quit request closes every window.
            Event::Quit { .. } => closed.extend(self.windows.keys()),
            Event::Window {
                window_id,
                win_event,
                ..
            } => {
                let Some(&id) = self.by_native_id.get(&window_id) else {
                    return closed;
                };
                let Some(window) = self.windows.get_mut(id) else {
                    return closed;
                };
                match win_event {
                    WindowEvent::Close => closed.push(id),
                    WindowEvent::Resized(width, height) => {
                        window.notify_resize(width.unsigned_abs(), height.unsigned_abs());
                    }
                    WindowEvent::Shown | WindowEvent::Restored => window.notify_shown(),
                    WindowEvent::Hidden | WindowEvent::Minimized => window.notify_hidden(),
                    WindowEvent::Enter => window.notify_cursor_enter(true),
                    WindowEvent::Leave => window.notify_cursor_enter(false),
                    _ => {}
                }
            }
            Event::KeyDown {
                window_id,
                keycode: Some(keycode),
                keymod,
                ..
            } => {
                if let Some(window) = self.window_by_native_mut(window_id) {
                    window.notify_key_press(translate_key(keycode), translate_modifiers(keymod));
                }
            }
            Event::KeyUp {
                window_id,
                keycode: Some(keycode),
                keymod,
                ..
            } => {
                if let Some(window) = self.window_by_native_mut(window_id) {
                    window.notify_key_release(translate_key(keycode), translate_modifiers(keymod));
                }
            }
            Event::TextInput {
                window_id, text, ..
            } => {
                if let Some(window) = self.window_by_native_mut(window_id) {
                    for character in text.chars() {
                        window.notify_character(character);
                    }
                }
            }
            Event::MouseMotion {
                window_id, x, y, ..
            } => {
                if let Some(window) = self.window_by_native_mut(window_id) {
                    window.notify_mouse_motion(f64::from(x), f64::from(y));
                }
            }
            Event::MouseButtonDown {
                window_id,
                mouse_btn,
                x,
                y,
                ..
            } => {
                if let Some(window) = self.window_by_native_mut(window_id) {
                    window.notify_mouse_press(f64::from(x), f64::from(y), translate_button(mouse_btn));
                }
            }
            Event::MouseButtonUp {
                window_id,
                mouse_btn,
                x,
                y,
                ..
            } => {
                if let Some(window) = self.window_by_native_mut(window_id) {
                    window.notify_mouse_release(
                        f64::from(x),
                        f64::from(y),
                        translate_button(mouse_btn),
                    );
                }
            }
            Event::MouseWheel {
                window_id, x, y, ..
            } => {
                if let Some(window) = self.window_by_native_mut(window_id) {
                    window.notify_scroll(f64::from(x), f64::from(y));
                }
            }
            _ => {}
        }
        closed
    }

    fn window_by_native_mut(&mut self, native_id: u32) -> Option<&mut Window> {
        let id = *self.by_native_id.get(&native_id)?;
        self.windows.get_mut(id)
    }
}

impl Backend for SdlBackend {
    fn name(&self) -> &'static str {
        "sdl2"
    }

    fn version(&self) -> Option<String> {
        Some(sdl2::version::version().to_string())
    }

    fn capabilities(&self) -> Capabilities {
        CAPABILITIES
    }

    fn create_window(
        &mut self,
        settings: &WindowSettings,
        config: &Config,
    ) -> Result<WindowId, WindowCreationError> {
        if settings.share.is_some() {
            log::warn!("sdl2 backend cannot share GL contexts between windows; ignoring");
        }
        self.apply_config_attrs(config);

        let title = settings.resolved_title();
        let mut builder = self.video.window(&title, settings.width, settings.height);
        builder.opengl().resizable();
        if settings.fullscreen {
            builder.fullscreen();
        }
        if !settings.visible {
            builder.hidden();
        }
        if !settings.decoration {
            builder.borderless();
        }
        let native = builder
            .build()
            .map_err(|err| WindowCreationError::Window(err.to_string()))?;
        let context = native
            .gl_create_context()
            .map_err(WindowCreationError::Context)?;
        native
            .gl_make_current(&context)
            .map_err(WindowCreationError::Context)?;
        // The clock paces frames; a blocking swap would fight it.
        if let Err(err) = self.video.gl_set_swap_interval(SwapInterval::Immediate) {
            log::warn!("could not disable vsync: {err}");
        }

        let native_id = native.id();
        let handle = SdlHandle {
            window: Some(native),
            context: Some(context),
            native_id,
        };
        let mut window = Window::new(Box::new(handle), settings);
        window.refresh_geometry();
        let id = self.windows.insert(window);
        self.by_native_id.insert(native_id, id);
        log::info!("created SDL window `{title}` ({}x{})", settings.width, settings.height);
        Ok(id)
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
                if let Some(handle) = window.native().as_any().downcast_ref::<SdlHandle>() {
                    self.by_native_id.remove(&handle.native_id);
                }
                window.finalize_close();
                true
            }
            None => false,
        }
    }

    fn process(&mut self, dt: f64) -> usize {
        let events: Vec<Event> = self.event_pump.poll_iter().collect();
        let mut to_close = Vec::new();
        for event in events {
            to_close.extend(self.dispatch_event(event));
        }
        for id in to_close {
            self.close_window(id);
        }

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

/// Maps an SDL keycode to the common key vocabulary. Letter keycodes
/// are lowercase in SDL and come out as their uppercase ASCII codes.
#[allow(clippy::too_many_lines)]
fn translate_key(keycode: Keycode) -> Key {
    match keycode {
        Keycode::Space => Key::Ascii(b' '),
        Keycode::Exclaim => Key::Ascii(b'!'),
        Keycode::Quotedbl => Key::Ascii(b'"'),
        Keycode::Hash => Key::Ascii(b'#'),
        Keycode::Dollar => Key::Ascii(b'$'),
        Keycode::Percent => Key::Ascii(b'%'),
        Keycode::Ampersand => Key::Ascii(b'&'),
        Keycode::Quote => Key::Ascii(b'\''),
        Keycode::LeftParen => Key::Ascii(b'('),
        Keycode::RightParen => Key::Ascii(b')'),
        Keycode::Asterisk => Key::Ascii(b'*'),
        Keycode::Plus => Key::Ascii(b'+'),
        Keycode::Comma => Key::Ascii(b','),
        Keycode::Minus => Key::Ascii(b'-'),
        Keycode::Period => Key::Ascii(b'.'),
        Keycode::Slash => Key::Ascii(b'/'),
        Keycode::Num0 => Key::Ascii(b'0'),
        Keycode::Num1 => Key::Ascii(b'1'),
        Keycode::Num2 => Key::Ascii(b'2'),
        Keycode::Num3 => Key::Ascii(b'3'),
        Keycode::Num4 => Key::Ascii(b'4'),
        Keycode::Num5 => Key::Ascii(b'5'),
        Keycode::Num6 => Key::Ascii(b'6'),
        Keycode::Num7 => Key::Ascii(b'7'),
        Keycode::Num8 => Key::Ascii(b'8'),
        Keycode::Num9 => Key::Ascii(b'9'),
        Keycode::Colon => Key::Ascii(b':'),
        Keycode::Semicolon => Key::Ascii(b';'),
        Keycode::Less => Key::Ascii(b'<'),
        Keycode::Equals => Key::Ascii(b'='),
        Keycode::Greater => Key::Ascii(b'>'),
        Keycode::Question => Key::Ascii(b'?'),
        Keycode::At => Key::Ascii(b'@'),
        Keycode::A => Key::Ascii(b'A'),
        Keycode::B => Key::Ascii(b'B'),
        Keycode::C => Key::Ascii(b'C'),
        Keycode::D => Key::Ascii(b'D'),
        Keycode::E => Key::Ascii(b'E'),
        Keycode::F => Key::Ascii(b'F'),
        Keycode::G => Key::Ascii(b'G'),
        Keycode::H => Key::Ascii(b'H'),
        Keycode::I => Key::Ascii(b'I'),
        Keycode::J => Key::Ascii(b'J'),
        Keycode::K => Key::Ascii(b'K'),
        Keycode::L => Key::Ascii(b'L'),
        Keycode::M => Key::Ascii(b'M'),
        Keycode::N => Key::Ascii(b'N'),
        Keycode::O => Key::Ascii(b'O'),
        Keycode::P => Key::Ascii(b'P'),
        Keycode::Q => Key::Ascii(b'Q'),
        Keycode::R => Key::Ascii(b'R'),
        Keycode::S => Key::Ascii(b'S'),
        Keycode::T => Key::Ascii(b'T'),
        Keycode::U => Key::Ascii(b'U'),
        Keycode::V => Key::Ascii(b'V'),
        Keycode::W => Key::Ascii(b'W'),
        Keycode::X => Key::Ascii(b'X'),
        Keycode::Y => Key::Ascii(b'Y'),
        Keycode::Z => Key::Ascii(b'Z'),
        Keycode::LeftBracket => Key::Ascii(b'['),
        Keycode::Backslash => Key::Ascii(b'\\'),
        Keycode::RightBracket => Key::Ascii(b']'),
        Keycode::Caret => Key::Ascii(b'^'),
        Keycode::Underscore => Key::Ascii(b'_'),
        Keycode::Backquote => Key::Ascii(b'`'),
        Keycode::Escape => Key::Escape,
        Keycode::Return => Key::Enter,
        Keycode::Tab => Key::Tab,
        Keycode::Backspace => Key::Backspace,
        Keycode::Insert => Key::Insert,
        Keycode::Delete => Key::Delete,
        Keycode::Right => Key::Right,
        Keycode::Left => Key::Left,
        Keycode::Down => Key::Down,
        Keycode::Up => Key::Up,
        Keycode::PageUp => Key::PageUp,
        Keycode::PageDown => Key::PageDown,
        Keycode::Home => Key::Home,
        Keycode::End => Key::End,
        Keycode::CapsLock => Key::CapsLock,
        Keycode::PrintScreen => Key::Print,
        Keycode::Pause => Key::Pause,
        Keycode::Clear => Key::Clear,
        Keycode::F1 => Key::F1,
        Keycode::F2 => Key::F2,
        Keycode::F3 => Key::F3,
        Keycode::F4 => Key::F4,
        Keycode::F5 => Key::F5,
        Keycode::F6 => Key::F6,
        Keycode::F7 => Key::F7,
        Keycode::F8 => Key::F8,
        Keycode::F9 => Key::F9,
        Keycode::F10 => Key::F10,
        Keycode::F11 => Key::F11,
        Keycode::F12 => Key::F12,
        _ => Key::Unknown,
    }
}

fn translate_modifiers(keymod: Mod) -> Modifiers {
    let mut out = Modifiers::empty();
    if keymod.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD) {
        out |= Modifiers::SHIFT;
    }
    if keymod.intersects(Mod::LCTRLMOD | Mod::RCTRLMOD) {
        out |= Modifiers::CTRL;
    }
    if keymod.intersects(Mod::LALTMOD | Mod::RALTMOD) {
        out |= Modifiers::ALT;
    }
    if keymod.intersects(Mod::LGUIMOD | Mod::RGUIMOD) {
        out |= Modifiers::COMMAND;
    }
    out
}

fn translate_button(button: sdl2::mouse::MouseButton) -> MouseButton {
    match button {
        sdl2::mouse::MouseButton::Left => MouseButton::Left,
        sdl2::mouse::MouseButton::Middle => MouseButton::Middle,
        sdl2::mouse::MouseButton::Right => MouseButton::Right,
        _ => MouseButton::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_keycodes_canonicalize_to_uppercase_ascii() {
        assert_eq!(translate_key(Keycode::A), Key::Ascii(b'A'));
        assert_eq!(translate_key(Keycode::Z), Key::Ascii(b'Z'));
        assert_eq!(translate_key(Keycode::Num7), Key::Ascii(b'7'));
        assert_eq!(translate_key(Keycode::Backquote), Key::Ascii(b'`'));
    }

    #[test]
    fn named_keys_map_and_unmapped_are_unknown() {
        assert_eq!(translate_key(Keycode::Return), Key::Enter);
        assert_eq!(translate_key(Keycode::PrintScreen), Key::Print);
        assert_eq!(translate_key(Keycode::F12), Key::F12);
        assert_eq!(translate_key(Keycode::LAlt), Key::Unknown);
        assert_eq!(translate_key(Keycode::Kp1), Key::Unknown);
    }

    #[test]
    fn either_side_modifier_translates() {
        assert_eq!(translate_modifiers(Mod::LSHIFTMOD), Modifiers::SHIFT);
        assert_eq!(translate_modifiers(Mod::RSHIFTMOD), Modifiers::SHIFT);
        assert_eq!(
            translate_modifiers(Mod::LCTRLMOD | Mod::RGUIMOD),
            Modifiers::CTRL | Modifiers::COMMAND
        );
        assert!(translate_modifiers(Mod::NOMOD).is_empty());
    }

    #[test]
    fn buttons_translate() {
        assert_eq!(
            translate_button(sdl2::mouse::MouseButton::Left),
            MouseButton::Left
        );
        assert_eq!(
            translate_button(sdl2::mouse::MouseButton::X1),
            MouseButton::Unknown
        );
    }
}
