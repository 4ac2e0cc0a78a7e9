// src/display/drivers/mod.rs
//! Drawing backend implementations.

#[cfg(target_arch = "wasm32")]
pub mod canvaskit;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub use canvaskit::CanvasKitBackend;
pub use recording::RecordingBackend;
