// src/keys.rs

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Keyboard modifiers held while an input event fired.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2; // Option on macOS
        const SUPER = 1 << 3; // Meta / Command / Windows key
    }
}

impl Modifiers {
    /// Builds the modifier set from the boolean flags a DOM event carries.
    pub fn from_flags(shift: bool, control: bool, alt: bool, meta: bool) -> Self {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::SHIFT, shift);
        modifiers.set(Modifiers::CONTROL, control);
        modifiers.set(Modifiers::ALT, alt);
        modifiers.set(Modifiers::SUPER, meta);
        modifiers
    }
}

/// Editing and navigation keys the core understands.
///
/// This is a closed set. Anything the host reports outside of it collapses
/// into [`KeyCode::Unknown`]; printable input travels separately as an
/// `InputCharEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeyCode {
    Backspace,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Delete,
    #[default]
    Unknown,
}

/// What happened to the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeyAction {
    #[default]
    Press,
    Release,
    Repeat,
}

/// Maps a DOM virtual-key code (`KeyboardEvent.keyCode`) to a [`KeyCode`].
///
/// Total and pure: every code not in the table is `Unknown`.
pub fn key_code_from_host(code: u32) -> KeyCode {
    match code {
        8 => KeyCode::Backspace,
        37 => KeyCode::Left,
        39 => KeyCode::Right,
        38 => KeyCode::Up,
        40 => KeyCode::Down,
        33 => KeyCode::PageUp,
        34 => KeyCode::PageDown,
        46 => KeyCode::Delete,
        _ => KeyCode::Unknown,
    }
}
