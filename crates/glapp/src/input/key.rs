//! Canonical keyboard vocabulary.
//!
//! Printable ASCII codes 32–96 pass through verbatim as [`Key::Ascii`]
//! (letters are canonically uppercase, matching GLFW key codes). Named
//! keys cover the escape/editing/navigation/function block. Anything a
//! backend cannot translate becomes [`Key::Unknown`].

/// A keyboard symbol in the common input vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable ASCII code in `32..=96`, passed through verbatim.
    Ascii(u8),
    /// Escape key.
    Escape,
    /// Enter / Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Insert key.
    Insert,
    /// Delete key.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Page-up key.
    PageUp,
    /// Page-down key.
    PageDown,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Caps-lock key.
    CapsLock,
    /// Print-screen key.
    Print,
    /// Pause key.
    Pause,
    /// Line feed control code.
    Linefeed,
    /// Clear control code.
    Clear,
    /// Cancel control code.
    Cancel,
    /// Function key F1.
    F1,
    /// Function key F2.
    F2,
    /// Function key F3.
    F3,
    /// Function key F4.
    F4,
    /// Function key F5.
    F5,
    /// Function key F6.
    F6,
    /// Function key F7.
    F7,
    /// Function key F8.
    F8,
    /// Function key F9.
    F9,
    /// Function key F10.
    F10,
    /// Function key F11.
    F11,
    /// Function key F12.
    F12,
    /// A key the active adapter could not translate.
    Unknown,
}

impl Key {
    /// The space key, as its ASCII passthrough value.
    pub const SPACE: Self = Self::Ascii(b' ');

    /// Returns the verbatim passthrough key for a printable ASCII code in
    /// `32..=96`, or `None` for codes outside that range.
    #[must_use]
    pub fn from_ascii(code: u32) -> Option<Self> {
        if (32..=96).contains(&code) {
            Some(Self::Ascii(code as u8))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passthrough_range() {
        assert_eq!(Key::from_ascii(32), Some(Key::SPACE));
        assert_eq!(Key::from_ascii(65), Some(Key::Ascii(b'A')));
        assert_eq!(Key::from_ascii(96), Some(Key::Ascii(96)));
        assert_eq!(Key::from_ascii(31), None);
        assert_eq!(Key::from_ascii(97), None);
    }
}
