// src/error.rs

use std::fmt;

/// Conditions callers of the frame can tell apart.
///
/// Everything else travels as plain `anyhow::Error` with context attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The operation has no synchronous form on this host.
    Unsupported(&'static str),
    /// The drawing backend could not create a surface for the canvas.
    SurfaceCreation(String),
    /// The drawing backend or the font asset failed to load.
    AssetLoad(String),
    /// A surface was requested before the drawing backend was installed.
    BackendNotReady,
    /// `run()` was called on a frame that is already running.
    AlreadyRunning,
    /// `post_update` was called from inside a paint pass.
    ReentrantUpdate,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(operation) => {
                write!(f, "`{operation}` is not supported by the web frame")
            }
            Self::SurfaceCreation(reason) => {
                write!(f, "failed to create drawing surface: {reason}")
            }
            Self::AssetLoad(reason) => write!(f, "failed to load frame assets: {reason}"),
            Self::BackendNotReady => write!(f, "drawing backend has not been installed yet"),
            Self::AlreadyRunning => write!(f, "frame is already running"),
            Self::ReentrantUpdate => write!(f, "post_update called while a paint pass is running"),
        }
    }
}

impl std::error::Error for FrameError {}
