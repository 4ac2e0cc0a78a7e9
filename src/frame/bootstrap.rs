// src/frame/bootstrap.rs
//! One-time page setup and the parallel asset load.

use crate::platform::{Channel, PageStructure, Platform};
use anyhow::{Context, Result};
use log::{debug, info};
use std::rc::Rc;

use super::{Lifecycle, Shared};

/// Full-viewport canvas with no margins and no scrollbars.
pub(super) fn stylesheet(canvas_id: &str) -> String {
    format!(
        "#{canvas_id} {{ display: block; padding: 0; margin: 0; border: none; }}\n\
         html, body {{ min-height: 100vh; margin: 0; padding: 0; overflow: hidden; }}\n"
    )
}

/// Installs the page structure and the listeners that keep the canvas' pixel
/// size equal to the viewport.
///
/// These listeners attach before any handler listener, so on every resize the
/// canvas is resized before the surface is rebuilt.
pub(super) fn install_page<P: Platform>(shared: &Rc<Shared<P>>) -> Result<()> {
    let canvas_id = shared.config.canvas.id.clone();
    let page = PageStructure {
        stylesheet: stylesheet(&canvas_id),
        canvas_id,
    };
    shared
        .platform
        .install_page(&page)
        .context("Failed to install page structure")?;

    for channel in [Channel::Resize, Channel::Load] {
        let weak = Rc::downgrade(shared);
        shared
            .platform
            .listen(
                channel,
                Box::new(move |_| match weak.upgrade() {
                    Some(shared) => fit_canvas(&shared.platform),
                    None => Ok(()),
                }),
            )
            .with_context(|| {
                format!("Failed to attach canvas-fit {} listener", channel.event_name())
            })?;
    }
    Ok(())
}

fn fit_canvas<P: Platform>(platform: &P) -> Result<()> {
    let size = platform.viewport_size().context("Failed to read viewport size")?;
    debug!("bootstrap: canvas -> {}x{}", size.width, size.height);
    platform.set_canvas_size(size)
}

/// Starts loading the drawing backend and the font. Completion is handled by
/// [`Shared::assets_loaded`].
pub(super) fn start_asset_load<P: Platform>(shared: &Rc<Shared<P>>) {
    shared.set_lifecycle(Lifecycle::Loading);
    info!(
        "bootstrap: loading drawing backend and font {}",
        shared.config.assets.font_url
    );
    let weak = Rc::downgrade(shared);
    shared.platform.load_assets(
        &shared.config.assets,
        Box::new(move |result| {
            if let Some(shared) = weak.upgrade() {
                shared.assets_loaded(result);
            }
        }),
    );
}
