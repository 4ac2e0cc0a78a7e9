// src/lib.rs
//! Browser frame for Castella.
//!
//! Binds the widget core to a browser window: a full-viewport canvas drawn
//! through a GPU backend, DOM input normalized into framework events, and the
//! async clipboard. Everything except the web-sys host and the CanvasKit
//! bindings is host-agnostic and runs natively against [`HeadlessPlatform`].

pub mod clipboard;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod frame;
pub mod geometry;
pub mod keys;
pub mod logging;
pub mod painter;
pub mod platform;
pub mod widget;

pub use config::{FrameConfig, CONFIG};
pub use error::FrameError;
pub use frame::{Frame, Lifecycle};
pub use geometry::{Point, Rect, Size};
pub use keys::{KeyAction, KeyCode, Modifiers};
pub use painter::{Painter, SavedState};
pub use platform::{HeadlessPlatform, Platform};
pub use widget::{App, UpdateRequest, UpdateTarget, Widget};

#[cfg(target_arch = "wasm32")]
pub use platform::BrowserPlatform;

/// Installs the console logger and builds a frame over the browser window
/// from the default configuration.
#[cfg(target_arch = "wasm32")]
pub fn start() -> anyhow::Result<Frame<BrowserPlatform>> {
    logging::init_logging(&CONFIG.logging.filter);
    Frame::with_config(BrowserPlatform::new()?, CONFIG.clone())
}
