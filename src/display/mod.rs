// src/display/mod.rs
//! Drawing side of the frame.
//!
//! - DrawingBackend: the GPU drawing library (CanvasKit, or a recorder)
//! - SurfaceManager: owns the surface/painter pair and rebuilds it on resize

pub mod driver;
pub mod drivers;
pub mod manager;

pub use driver::{BackendContext, DrawingBackend, LoadedAssets};
pub use manager::{SurfaceManager, SurfaceTarget};
