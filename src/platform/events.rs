// src/platform/events.rs
//
// Raw input as the host delivers it, before normalization.

use crate::keys::Modifiers;

/// Host input channels the frame subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    PointerDown,
    PointerUp,
    Wheel,
    PointerMove,
    KeyPress,
    KeyDown,
    Resize,
    Load,
}

/// Where a channel's listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerTarget {
    /// `document.body`
    Body,
    /// `window`
    Window,
}

impl Channel {
    /// The DOM event type name.
    pub fn event_name(self) -> &'static str {
        match self {
            Channel::PointerDown => "mousedown",
            Channel::PointerUp => "mouseup",
            Channel::Wheel => "wheel",
            Channel::PointerMove => "mousemove",
            Channel::KeyPress => "keypress",
            Channel::KeyDown => "keydown",
            Channel::Resize => "resize",
            Channel::Load => "load",
        }
    }

    pub fn target(self) -> ListenerTarget {
        match self {
            Channel::Resize | Channel::Load => ListenerTarget::Window,
            _ => ListenerTarget::Body,
        }
    }
}

/// Pointer payload of a mouse event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    pub button: i16,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub x: f64,
    pub y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

/// Keyboard payload: the `key` string and the legacy `keyCode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub key_code: u32,
    pub modifiers: Modifiers,
}

/// One host callback invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Pointer(PointerInput),
    Wheel(WheelInput),
    Key(KeyInput),
    Resize,
    Load,
}
