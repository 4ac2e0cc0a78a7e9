// src/frame/wiring.rs
//! Two-phase event wiring.
//!
//! Handlers are stored as they are registered and attached to the host in one
//! pass at `run()`, in a fixed channel order. The resize listener is always
//! attached: it owns surface rebuilds and only forwards to the redraw handler
//! when one was registered.

use crate::events::{input_char, input_key, mouse_event, wheel_event};
use crate::platform::{Channel, HostEvent, Listener, Platform};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::rc::{Rc, Weak};

use super::{
    InputCharHandler, InputKeyHandler, MouseHandler, RedrawHandler, Shared, WheelHandler,
};

/// Handlers registered but not attached yet.
#[derive(Default)]
pub(super) struct PendingListeners {
    pub mouse_down: Option<MouseHandler>,
    pub mouse_up: Option<MouseHandler>,
    pub mouse_wheel: Option<WheelHandler>,
    pub cursor_pos: Option<MouseHandler>,
    pub input_char: Option<InputCharHandler>,
    pub input_key: Option<InputKeyHandler>,
    pub redraw: Option<RedrawHandler>,
}

/// Attaches every pending handler plus the resize listener. Returns how many
/// listeners were attached.
pub(super) fn activate<P: Platform>(
    shared: &Rc<Shared<P>>,
    pending: PendingListeners,
) -> Result<usize> {
    let PendingListeners {
        mouse_down,
        mouse_up,
        mouse_wheel,
        cursor_pos,
        input_char,
        input_key,
        redraw,
    } = pending;

    let listeners = [
        (Channel::PointerDown, mouse_down.map(pointer_listener)),
        (Channel::PointerUp, mouse_up.map(pointer_listener)),
        (Channel::Wheel, mouse_wheel.map(wheel_listener)),
        (Channel::PointerMove, cursor_pos.map(pointer_listener)),
        (Channel::KeyPress, input_char.map(char_listener)),
        (Channel::KeyDown, input_key.map(key_listener)),
        (
            Channel::Resize,
            Some(resize_listener(Rc::downgrade(shared), redraw)),
        ),
    ];

    let mut attached = 0;
    for (channel, listener) in listeners {
        let Some(listener) = listener else {
            debug!("wiring: no handler for {}, skipped", channel.event_name());
            continue;
        };
        shared
            .platform
            .listen(channel, listener)
            .with_context(|| format!("Failed to attach {} listener", channel.event_name()))?;
        attached += 1;
    }
    Ok(attached)
}

fn unexpected(event: &HostEvent) {
    warn!("wiring: dropped unexpected host event {:?}", event);
}

fn pointer_listener(mut handler: MouseHandler) -> Listener {
    Box::new(move |event| {
        match &event {
            HostEvent::Pointer(input) => handler(mouse_event(input)),
            other => unexpected(other),
        }
        Ok(())
    })
}

fn wheel_listener(mut handler: WheelHandler) -> Listener {
    Box::new(move |event| {
        match &event {
            HostEvent::Wheel(input) => handler(wheel_event(input)),
            other => unexpected(other),
        }
        Ok(())
    })
}

fn char_listener(mut handler: InputCharHandler) -> Listener {
    Box::new(move |event| {
        match &event {
            HostEvent::Key(input) => handler(input_char(input)),
            other => unexpected(other),
        }
        Ok(())
    })
}

fn key_listener(mut handler: InputKeyHandler) -> Listener {
    Box::new(move |event| {
        match &event {
            HostEvent::Key(input) => handler(input_key(input)),
            other => unexpected(other),
        }
        Ok(())
    })
}

fn resize_listener<P: Platform>(
    shared: Weak<Shared<P>>,
    mut redraw: Option<RedrawHandler>,
) -> Listener {
    Box::new(move |_| match shared.upgrade() {
        Some(shared) => shared.handle_resize(redraw.as_mut()),
        None => Ok(()),
    })
}
