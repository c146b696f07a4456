//! Canonical mouse button vocabulary.
//!
//! Every backend adapter translates its native button codes into
//! [`MouseButton`]; codes outside an adapter's table degrade to
//! [`MouseButton::Unknown`] rather than erroring.

/// A mouse button in the common input vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left (primary) button.
    Left,
    /// Middle button (often the wheel).
    Middle,
    /// Right (secondary) button.
    Right,
    /// No button is pressed. Used as the window's "currently pressed
    /// button" value between presses; never delivered in a press event.
    None,
    /// A button the active adapter could not translate.
    Unknown,
}

impl MouseButton {
    /// Whether this value represents an actually pressed button.
    #[must_use]
    pub fn is_pressed(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_not_pressed() {
        assert!(!MouseButton::None.is_pressed());
        assert!(MouseButton::Left.is_pressed());
        assert!(MouseButton::Unknown.is_pressed());
    }
}
