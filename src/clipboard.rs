// src/clipboard.rs
//! Clipboard access for the core.
//!
//! Browser clipboard access is asynchronous and permission-gated, so the
//! synchronous accessors refuse immediately and never reach the host.

use crate::error::FrameError;
use crate::frame::Frame;
use crate::platform::Platform;
use anyhow::Result;
use log::debug;

impl<P: Platform> Frame<P> {
    pub fn get_clipboard_text(&self) -> Result<String> {
        Err(FrameError::Unsupported("get_clipboard_text").into())
    }

    pub fn set_clipboard_text(&self, _text: &str) -> Result<()> {
        Err(FrameError::Unsupported("set_clipboard_text").into())
    }

    /// Reads the clipboard; `on_done` runs when the host settles the read.
    pub fn async_get_clipboard_text(&self, on_done: impl FnOnce(Result<String>) + 'static) {
        debug!("Frame: clipboard read requested");
        self.platform().read_clipboard(Box::new(on_done));
    }

    /// Writes `text` to the clipboard; `on_done` runs when the host settles
    /// the write.
    pub fn async_set_clipboard_text(&self, text: &str, on_done: impl FnOnce(Result<()>) + 'static) {
        debug!("Frame: clipboard write requested ({} bytes)", text.len());
        self.platform().write_clipboard(text, Box::new(on_done));
    }
}
