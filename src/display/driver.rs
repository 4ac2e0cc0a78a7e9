// src/display/driver.rs
//! DrawingBackend trait - the GPU drawing library the frame paints through.
//!
//! The frame never talks to the drawing library directly. It asks a backend
//! for a surface bound to the page canvas and for a painter wrapping that
//! surface. Fonts are installed once, when the backend finishes loading.
//!
//! ## Lifecycle
//! 1. The platform loads the backend and the font bytes (in parallel).
//! 2. `BackendContext::install` builds the font manager and typeface.
//! 3. Every viewport resize calls `make_surface` + `make_painter`.

use crate::config::{ColorSpace, SurfaceOptions};
use crate::geometry::Size;
use crate::painter::Painter;
use anyhow::{Context, Result};
use log::info;

/// A drawing library able to create canvas-bound surfaces and painters.
pub trait DrawingBackend {
    type Surface;
    type FontManager: Clone;
    type Typeface: Clone;

    fn font_manager_from_data(&self, data: &[u8]) -> Result<Self::FontManager>;

    fn typeface_from_data(&self, data: &[u8]) -> Result<Self::Typeface>;

    /// Creates a GPU-backed surface for the canvas element with `canvas_id`.
    fn make_surface(
        &self,
        canvas_id: &str,
        color_space: ColorSpace,
        options: &SurfaceOptions,
    ) -> Result<Self::Surface>;

    /// Wraps `surface` in a painter. The painter owns the surface and keeps
    /// the installed font handles for text drawing.
    fn make_painter(
        &self,
        surface: Self::Surface,
        font_manager: &Self::FontManager,
        typeface: &Self::Typeface,
        size: Size,
    ) -> Result<Box<dyn Painter>>;
}

/// What the platform hands over once asset loading completes.
pub struct LoadedAssets<B> {
    pub backend: B,
    pub font_data: Vec<u8>,
}

/// Backend handles installed once at bootstrap and read-only afterwards.
pub struct BackendContext<B: DrawingBackend> {
    backend: B,
    font_manager: B::FontManager,
    typeface: B::Typeface,
}

impl<B: DrawingBackend> BackendContext<B> {
    pub fn install(assets: LoadedAssets<B>) -> Result<Self> {
        let LoadedAssets { backend, font_data } = assets;
        let font_manager = backend
            .font_manager_from_data(&font_data)
            .context("Failed to build font manager from font data")?;
        let typeface = backend
            .typeface_from_data(&font_data)
            .context("Failed to build typeface from font data")?;
        info!(
            "BackendContext: installed drawing backend ({} bytes of font data)",
            font_data.len()
        );
        Ok(Self {
            backend,
            font_manager,
            typeface,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn font_manager(&self) -> &B::FontManager {
        &self.font_manager
    }

    pub fn typeface(&self) -> &B::Typeface {
        &self.typeface
    }
}
