// src/display/manager.rs
//! SurfaceManager - owns the surface/painter pair and rebuilds it on resize.

use crate::config::{ColorSpace, SurfaceOptions};
use crate::display::driver::{BackendContext, DrawingBackend};
use crate::error::FrameError;
use crate::geometry::Size;
use crate::painter::Painter;
use anyhow::Result;
use log::{debug, error, info};

/// Where and how surfaces are created. Fixed for the lifetime of a frame.
#[derive(Debug, Clone)]
pub struct SurfaceTarget {
    pub canvas_id: String,
    pub color_space: ColorSpace,
    pub options: SurfaceOptions,
}

/// Owns the backend context and the current painter.
///
/// The painter is always bound to the surface that was current when it was
/// built. A rebuild drops the old pair before creating the new one, so a
/// failed rebuild leaves no painter rather than a stale one.
pub struct SurfaceManager<B: DrawingBackend> {
    target: SurfaceTarget,
    context: Option<BackendContext<B>>,
    painter: Option<Box<dyn Painter>>,
    size: Size,
    generation: u64,
}

impl<B: DrawingBackend> SurfaceManager<B> {
    pub fn new(target: SurfaceTarget) -> Self {
        Self {
            target,
            context: None,
            painter: None,
            size: Size::default(),
            generation: 0,
        }
    }

    /// Installs the backend context. Called once, when assets finish loading.
    pub fn install(&mut self, context: BackendContext<B>) {
        info!("SurfaceManager: backend context installed");
        self.context = Some(context);
    }

    pub fn is_ready(&self) -> bool {
        self.context.is_some()
    }

    /// (Re)creates the surface and its painter at `size`.
    pub fn ensure_surface(&mut self, size: Size) -> Result<()> {
        let context = self.context.as_ref().ok_or(FrameError::BackendNotReady)?;

        if self.painter.take().is_some() {
            debug!("SurfaceManager: dropped painter of generation {}", self.generation);
        }

        let backend = context.backend();
        let surface = backend
            .make_surface(
                &self.target.canvas_id,
                self.target.color_space,
                &self.target.options,
            )
            .map_err(|e| {
                error!(
                    "SurfaceManager: surface creation for #{} failed: {:#}",
                    self.target.canvas_id, e
                );
                FrameError::SurfaceCreation(format!("{e:#}"))
            })?;

        let painter = backend
            .make_painter(surface, context.font_manager(), context.typeface(), size)
            .map_err(|e| {
                error!("SurfaceManager: painter creation failed: {:#}", e);
                FrameError::SurfaceCreation(format!("{e:#}"))
            })?;
        self.painter = Some(painter);
        self.size = size;
        self.generation += 1;
        debug!(
            "SurfaceManager: generation {} at {}x{}",
            self.generation, size.width, size.height
        );
        Ok(())
    }

    pub fn painter(&self) -> Option<&dyn Painter> {
        self.painter.as_deref()
    }

    pub fn painter_mut(&mut self) -> Option<&mut Box<dyn Painter>> {
        self.painter.as_mut()
    }

    /// Logical size the current painter was built for.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of surfaces created so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
