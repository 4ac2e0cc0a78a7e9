// src/events.rs

//! Framework-neutral input events and the functions that build them from raw
//! host input.
//!
//! Each normalization function is pure and builds exactly one event value from
//! one host callback payload. The values are handed to the core's handler
//! synchronously and are not retained by the frame.

use crate::geometry::Point;
use crate::keys::{key_code_from_host, KeyAction, KeyCode, Modifiers};
use crate::platform::{KeyInput, PointerInput, WheelInput};

/// Which pointer button an event refers to.
///
/// Motion events report `Primary`: the host sets no button for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Primary,
    Middle,
    Secondary,
    Back,
    Forward,
    Other(i16),
}

impl MouseButton {
    /// Maps the DOM `MouseEvent.button` index.
    pub fn from_host(button: i16) -> Self {
        match button {
            0 => MouseButton::Primary,
            1 => MouseButton::Middle,
            2 => MouseButton::Secondary,
            3 => MouseButton::Back,
            4 => MouseButton::Forward,
            other => MouseButton::Other(other),
        }
    }
}

/// Pointer press, release or motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub pos: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

/// Wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub pos: Point,
    pub delta_x: f64,
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

/// Text produced by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCharEvent {
    pub text: String,
}

/// A non-text key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputKeyEvent {
    pub key: KeyCode,
    /// The browser exposes no scancode; always 0.
    pub scancode: u32,
    pub action: KeyAction,
    pub modifiers: Modifiers,
}

pub fn mouse_event(input: &PointerInput) -> MouseEvent {
    MouseEvent {
        pos: Point::new(input.x, input.y),
        button: MouseButton::from_host(input.button),
        modifiers: input.modifiers,
    }
}

pub fn wheel_event(input: &WheelInput) -> WheelEvent {
    WheelEvent {
        pos: Point::new(input.x, input.y),
        delta_x: input.delta_x,
        delta_y: input.delta_y,
        modifiers: input.modifiers,
    }
}

pub fn input_char(input: &KeyInput) -> InputCharEvent {
    InputCharEvent {
        text: input.key.clone(),
    }
}

/// Key-down always normalizes to a press. Codes outside the [`KeyCode`] table
/// become `Unknown`.
pub fn input_key(input: &KeyInput) -> InputKeyEvent {
    InputKeyEvent {
        key: key_code_from_host(input.key_code),
        scancode: 0,
        action: KeyAction::Press,
        modifiers: input.modifiers,
    }
}
