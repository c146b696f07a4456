//! Common input vocabulary shared by every backend adapter.
//!
//! Adapters translate their native key, button and modifier codes into
//! these types before dispatching events, so application handlers never
//! see toolkit-specific codes. Unmapped native codes degrade to the
//! `Unknown` members instead of failing.

pub mod key;
pub mod mouse;

pub use key::Key;
pub use mouse::MouseButton;

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier state, composable with bitwise OR.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Either shift key.
        const SHIFT = 0b0001;
        /// Either control key.
        const CTRL = 0b0010;
        /// Either alt key.
        const ALT = 0b0100;
        /// Super / command key.
        const COMMAND = 0b1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_compose() {
        let mods = Modifiers::SHIFT | Modifiers::CTRL;
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::ALT));
    }
}
