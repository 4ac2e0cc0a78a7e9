// src/frame/dispatch.rs
//! One paint pass for an update request.

use crate::painter::{Painter, SavedState};
use crate::widget::UpdateRequest;
use anyhow::Result;
use log::trace;

/// Sets up the target's coordinate frame, redraws it and flushes.
///
/// Everything between `save` and `restore` runs inside a [`SavedState`], so
/// neither the translation nor the clip outlives this pass, including when
/// the target's redraw fails. A redraw error is returned after the restore
/// and the surface is not flushed.
pub(super) fn render(painter: &mut dyn Painter, request: UpdateRequest<'_>) -> Result<()> {
    let UpdateRequest { target, completely } = request;
    let Some(mut target) = target else {
        return Ok(());
    };

    let (origin, clip) = target.coordinate_frame();
    trace!(
        "render: origin ({}, {}), clip {:?}, completely {}",
        origin.x,
        origin.y,
        clip,
        completely
    );

    let mut scope = SavedState::new(painter);
    scope.translate(origin);
    if let Some(rect) = clip {
        scope.clip(rect);
    }
    target.redraw(&mut *scope, completely)?;
    scope.flush()
}
