//! GLFW adapter.
//!
//! The fullest-featured adapter: every capability flag is on. GLFW
//! delivers events through a per-window receiver, so the registry keeps
//! a [`slotmap::SecondaryMap`] of receivers alongside the windows and
//! drains them in [`Backend::process`].

use glfw::Context;
use slotmap::{SecondaryMap, SlotMap};

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
    context_sharing: true,
};

/// Native side of a GLFW window. The handle owns the `PWindow`; it is
/// taken out on `destroy`, which drops the native window immediately.
pub struct GlfwHandle {
    window: Option<glfw::PWindow>,
}

impl GlfwHandle {
    fn window(&self) -> Option<&glfw::PWindow> {
        self.window.as_ref()
    }

    fn window_mut(&mut self) -> Option<&mut glfw::PWindow> {
        self.window.as_mut()
    }
}

impl NativeHandle for GlfwHandle {
    fn backend(&self) -> &'static str {
        "glfw"
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
            window.set_title(title);
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if let Some(window) = self.window_mut() {
            window.set_size(width as i32, height as i32);
        }
    }

    fn size(&self) -> Option<(u32, u32)> {
        // Framebuffer size, not logical size: on HiDPI displays the GL
        // viewport tracks the framebuffer.
        self.window().map(|window| {
            let (width, height) = window.get_framebuffer_size();
            (width.unsigned_abs(), height.unsigned_abs())
        })
    }

    fn set_position(&mut self, x: i32, y: i32) {
        if let Some(window) = self.window_mut() {
            window.set_pos(x, y);
        }
    }

    fn position(&self) -> Option<(i32, i32)> {
        self.window().map(|window| window.get_pos())
    }

    fn swap(&mut self) {
        if let Some(window) = self.window_mut() {
            window.swap_buffers();
        }
    }

    fn activate(&mut self) {
        if let Some(window) = self.window_mut() {
            window.make_current();
        }
    }

    fn destroy(&mut self) {
        // Dropping the PWindow destroys the native window.
        self.window = None;
    }
}

/// Adapter over the GLFW toolkit.
pub struct GlfwBackend {
    glfw: glfw::Glfw,
    windows: SlotMap<WindowId, Window>,
    receivers: SecondaryMap<WindowId, glfw::GlfwReceiver<(f64, glfw::WindowEvent)>>,
}

impl GlfwBackend {
    /// Initializes GLFW and returns the adapter.
    ///
    /// # Errors
    /// [`BackendError::Unavailable`] when the GLFW library fails to
    /// initialize (no display, missing shared library).
    pub fn new() -> Result<Self, BackendError> {
        let glfw = glfw::init(glfw::fail_on_errors).map_err(|err| BackendError::Unavailable {
            backend: "GLFW",
            reason: err.to_string(),
        })?;
        log::debug!("GLFW {} initialized", glfw::get_version_string());
        Ok(Self {
            glfw,
            windows: SlotMap::with_key(),
            receivers: SecondaryMap::new(),
        })
    }

    fn apply_config_hints(&mut self, config: &Config) {
        use glfw::WindowHint;

        self.glfw
            .window_hint(WindowHint::RedBits(Some(u32::from(config.red_size))));
        self.glfw
            .window_hint(WindowHint::GreenBits(Some(u32::from(config.green_size))));
        self.glfw
            .window_hint(WindowHint::BlueBits(Some(u32::from(config.blue_size))));
        self.glfw
            .window_hint(WindowHint::AlphaBits(Some(u32::from(config.alpha_size))));
        self.glfw
            .window_hint(WindowHint::DepthBits(Some(u32::from(config.depth_size))));
        self.glfw
            .window_hint(WindowHint::StencilBits(Some(u32::from(config.stencil_size))));
        self.glfw
            .window_hint(WindowHint::Samples(Some(u32::from(config.samples))));
        self.glfw.window_hint(WindowHint::SRgbCapable(config.srgb));
        self.glfw.window_hint(WindowHint::Stereo(config.stereo));
        self.glfw
            .window_hint(WindowHint::DoubleBuffer(config.double_buffer));
        self.glfw.window_hint(WindowHint::ContextVersion(
            u32::from(config.major_version),
            u32::from(config.minor_version),
        ));
        match config.profile {
            Profile::Es => {
                self.glfw
                    .window_hint(WindowHint::ClientApi(glfw::ClientApiHint::OpenGlEs));
            }
            Profile::Core => {
                self.glfw
                    .window_hint(WindowHint::ClientApi(glfw::ClientApiHint::OpenGl));
                // GLFW rejects a profile hint on contexts below 3.2.
                if (config.major_version, config.minor_version) >= (3, 2) {
                    self.glfw.window_hint(WindowHint::OpenGlProfile(
                        glfw::OpenGlProfileHint::Core,
                    ));
                }
            }
            Profile::Compatibility => {
                self.glfw
                    .window_hint(WindowHint::ClientApi(glfw::ClientApiHint::OpenGl));
            }
        }
    }

    fn create_native(
        &mut self,
        settings: &WindowSettings,
        title: &str,
    ) -> Option<(glfw::PWindow, glfw::GlfwReceiver<(f64, glfw::WindowEvent)>)> {
        if let Some(share) = settings.share {
            if settings.fullscreen {
                log::warn!("context sharing with a fullscreen window is not supported; creating windowed");
            }
            let source = self
                .windows
                .get(share)?
                .native()
                .as_any()
                .downcast_ref::<GlfwHandle>()?
                .window()?;
            return source.create_shared(
                settings.width,
                settings.height,
                title,
                glfw::WindowMode::Windowed,
            );
        }
        if settings.fullscreen {
            return self.glfw.with_primary_monitor(|glfw, monitor| {
                monitor.and_then(|monitor| {
                    glfw.create_window(
                        settings.width,
                        settings.height,
                        title,
                        glfw::WindowMode::FullScreen(monitor),
                    )
                })
            });
        }
        self.glfw.create_window(
            settings.width,
            settings.height,
            title,
            glfw::WindowMode::Windowed,
        )
    }

    /// Drains one window's receiver into common-vocabulary dispatches.
    /// Returns `true` when the window requested close.
    fn drain_window_events(window: &mut Window, events: Vec<glfw::WindowEvent>) -> bool {
        let mut close_requested = false;
        for event in events {
            match event {
                glfw::WindowEvent::Close => close_requested = true,
                glfw::WindowEvent::FramebufferSize(width, height) => {
                    window.notify_resize(width.unsigned_abs(), height.unsigned_abs());
                }
                glfw::WindowEvent::CursorEnter(entered) => window.notify_cursor_enter(entered),
                glfw::WindowEvent::CursorPos(x, y) => window.notify_mouse_motion(x, y),
                glfw::WindowEvent::Scroll(dx, dy) => window.notify_scroll(dx, dy),
                glfw::WindowEvent::MouseButton(button, action, _modifiers) => {
                    let button = translate_button(button);
                    let (x, y) = window
                        .native()
                        .as_any()
                        .downcast_ref::<GlfwHandle>()
                        .and_then(GlfwHandle::window)
                        .map_or((0.0, 0.0), |window| window.get_cursor_pos());
                    match action {
                        glfw::Action::Press => window.notify_mouse_press(x, y, button),
                        glfw::Action::Release | glfw::Action::Repeat => {
                            window.notify_mouse_release(x, y, button);
                        }
                    }
                }
                glfw::WindowEvent::Key(key, _scancode, action, modifiers) => {
                    let symbol = translate_key(key);
                    let modifiers = translate_modifiers(modifiers);
                    match action {
                        glfw::Action::Press | glfw::Action::Repeat => {
                            window.notify_key_press(symbol, modifiers);
                        }
                        glfw::Action::Release => window.notify_key_release(symbol, modifiers),
                    }
                }
                glfw::WindowEvent::Char(character) => window.notify_character(character),
                glfw::WindowEvent::Iconify(true) => window.notify_hidden(),
                glfw::WindowEvent::Iconify(false) => window.notify_shown(),
                _ => {}
            }
        }
        close_requested
    }
}

impl Backend for GlfwBackend {
    fn name(&self) -> &'static str {
        "glfw"
    }

    fn version(&self) -> Option<String> {
        Some(glfw::get_version_string())
    }

    fn capabilities(&self) -> Capabilities {
        CAPABILITIES
    }

    fn create_window(
        &mut self,
        settings: &WindowSettings,
        config: &Config,
    ) -> Result<WindowId, WindowCreationError> {
        use glfw::WindowHint;

        self.glfw.default_window_hints();
        self.apply_config_hints(config);
        self.glfw
            .window_hint(WindowHint::Visible(settings.visible));
        self.glfw
            .window_hint(WindowHint::Decorated(settings.decoration));
        self.glfw.window_hint(WindowHint::Resizable(true));

        let title = settings.resolved_title();
        let (mut native, receiver) = self.create_native(settings, &title).ok_or_else(|| {
            WindowCreationError::Window(format!(
                "GLFW could not create a {}x{} window with the requested pixel format",
                settings.width, settings.height
            ))
        })?;

        native.set_all_polling(true);
        native.make_current();
        // The clock paces frames; a blocking swap would fight it.
        self.glfw.set_swap_interval(glfw::SwapInterval::None);

        let handle = GlfwHandle {
            window: Some(native),
        };
        let mut window = Window::new(Box::new(handle), settings);
        window.refresh_geometry();
        let id = self.windows.insert(window);
        self.receivers.insert(id, receiver);
        log::info!("created GLFW window `{title}` ({}x{})", settings.width, settings.height);
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
        self.receivers.remove(id);
        match self.windows.remove(id) {
            Some(mut window) => {
                window.finalize_close();
                true
            }
            None => false,
        }
    }

    fn process(&mut self, dt: f64) -> usize {
        self.glfw.poll_events();

        for id in self.window_ids() {
            let events: Vec<glfw::WindowEvent> = self
                .receivers
                .get(id)
                .map(|receiver| {
                    glfw::flush_messages(receiver)
                        .map(|(_time, event)| event)
                        .collect()
                })
                .unwrap_or_default();
            let close_requested = match self.windows.get_mut(id) {
                Some(window) => Self::drain_window_events(window, events),
                None => continue,
            };
            if close_requested {
                self.close_window(id);
            }
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

/// Maps a GLFW key to the common key vocabulary. Printable keys in the
/// ASCII range come through with their character code; everything else
/// goes through the named table or falls back to [`Key::Unknown`].
fn translate_key(key: glfw::Key) -> Key {
    let code = key as i32;
    if (32..=96).contains(&code) {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        return Key::Ascii(code as u8);
    }
    match key {
        glfw::Key::Escape => Key::Escape,
        glfw::Key::Enter => Key::Enter,
        glfw::Key::Tab => Key::Tab,
        glfw::Key::Backspace => Key::Backspace,
        glfw::Key::Insert => Key::Insert,
        glfw::Key::Delete => Key::Delete,
        glfw::Key::Right => Key::Right,
        glfw::Key::Left => Key::Left,
        glfw::Key::Down => Key::Down,
        glfw::Key::Up => Key::Up,
        glfw::Key::PageUp => Key::PageUp,
        glfw::Key::PageDown => Key::PageDown,
        glfw::Key::Home => Key::Home,
        glfw::Key::End => Key::End,
        glfw::Key::CapsLock => Key::CapsLock,
        glfw::Key::PrintScreen => Key::Print,
        glfw::Key::Pause => Key::Pause,
        glfw::Key::F1 => Key::F1,
        glfw::Key::F2 => Key::F2,
        glfw::Key::F3 => Key::F3,
        glfw::Key::F4 => Key::F4,
        glfw::Key::F5 => Key::F5,
        glfw::Key::F6 => Key::F6,
        glfw::Key::F7 => Key::F7,
        glfw::Key::F8 => Key::F8,
        glfw::Key::F9 => Key::F9,
        glfw::Key::F10 => Key::F10,
        glfw::Key::F11 => Key::F11,
        glfw::Key::F12 => Key::F12,
        _ => Key::Unknown,
    }
}

fn translate_modifiers(modifiers: glfw::Modifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if modifiers.contains(glfw::Modifiers::Shift) {
        out |= Modifiers::SHIFT;
    }
    if modifiers.contains(glfw::Modifiers::Control) {
        out |= Modifiers::CTRL;
    }
    if modifiers.contains(glfw::Modifiers::Alt) {
        out |= Modifiers::ALT;
    }
    if modifiers.contains(glfw::Modifiers::Super) {
        out |= Modifiers::COMMAND;
    }
    out
}

fn translate_button(button: glfw::MouseButton) -> MouseButton {
    match button {
        glfw::MouseButton::Button1 => MouseButton::Left,
        glfw::MouseButton::Button2 => MouseButton::Right,
        glfw::MouseButton::Button3 => MouseButton::Middle,
        _ => MouseButton::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_keys_pass_through_as_ascii() {
        assert_eq!(translate_key(glfw::Key::A), Key::Ascii(b'A'));
        assert_eq!(translate_key(glfw::Key::Space), Key::Ascii(b' '));
        assert_eq!(translate_key(glfw::Key::Num0), Key::Ascii(b'0'));
        assert_eq!(translate_key(glfw::Key::GraveAccent), Key::Ascii(b'`'));
    }

    #[test]
    fn named_keys_map_and_unmapped_are_unknown() {
        assert_eq!(translate_key(glfw::Key::Escape), Key::Escape);
        assert_eq!(translate_key(glfw::Key::F12), Key::F12);
        assert_eq!(translate_key(glfw::Key::PrintScreen), Key::Print);
        assert_eq!(translate_key(glfw::Key::F25), Key::Unknown);
        assert_eq!(translate_key(glfw::Key::Kp1), Key::Unknown);
    }

    #[test]
    fn modifier_bits_translate() {
        let native = glfw::Modifiers::Shift | glfw::Modifiers::Control;
        assert_eq!(
            translate_modifiers(native),
            Modifiers::SHIFT | Modifiers::CTRL
        );
        assert_eq!(
            translate_modifiers(glfw::Modifiers::Super),
            Modifiers::COMMAND
        );
        assert!(translate_modifiers(glfw::Modifiers::empty()).is_empty());
    }

    #[test]
    fn buttons_translate() {
        assert_eq!(translate_button(glfw::MouseButton::Button1), MouseButton::Left);
        assert_eq!(translate_button(glfw::MouseButton::Button2), MouseButton::Right);
        assert_eq!(translate_button(glfw::MouseButton::Button3), MouseButton::Middle);
        assert_eq!(
            translate_button(glfw::MouseButton::Button4),
            MouseButton::Unknown
        );
    }
}
