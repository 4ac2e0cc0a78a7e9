// src/platform/platform_trait.rs
//
// Defines the `Platform` trait, which abstracts over the host environment the
// frame runs in: the page, its event stream, asset loading and the clipboard.

use crate::config::AssetConfig;
use crate::display::{DrawingBackend, LoadedAssets};
use crate::geometry::Size;
use anyhow::Result;

use super::events::{Channel, HostEvent};

/// A host event listener. An error returned here is fatal for the frame and
/// surfaces as an uncaught host-level error.
pub type Listener = Box<dyn FnMut(HostEvent) -> Result<()>>;

/// Completion of the parallel backend + font load.
pub type AssetCallback<B> = Box<dyn FnOnce(Result<LoadedAssets<B>>)>;

pub type ClipboardReadCallback = Box<dyn FnOnce(Result<String>)>;

pub type ClipboardWriteCallback = Box<dyn FnOnce(Result<()>)>;

/// Static page structure the frame needs: one full-viewport canvas and the
/// stylesheet that makes it fill the viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStructure {
    pub canvas_id: String,
    pub stylesheet: String,
}

/// The host environment.
///
/// Every method takes `&self`: hosts are single-threaded and may call back
/// into the frame synchronously (a dispatched resize runs its listeners before
/// `dispatch_resize` returns), so implementations use interior mutability
/// and must not hold borrows across listener calls.
pub trait Platform: 'static {
    type Backend: DrawingBackend + 'static;

    fn set_title(&self, title: &str) -> Result<()>;

    /// Asks the host to resize the window. Hosts may ignore the request.
    fn resize_window(&self, size: Size) -> Result<()>;

    /// Current viewport size in logical pixels.
    fn viewport_size(&self) -> Result<Size>;

    /// Current pixel size of the page canvas.
    fn canvas_size(&self) -> Result<Size>;

    fn set_canvas_size(&self, size: Size) -> Result<()>;

    fn install_page(&self, page: &PageStructure) -> Result<()>;

    /// Attaches `listener` to `channel`. Listeners on one channel fire in
    /// attach order.
    fn listen(&self, channel: Channel, listener: Listener) -> Result<()>;

    /// Synthesizes a resize event on the window.
    fn dispatch_resize(&self) -> Result<()>;

    /// Loads the drawing backend and the font in parallel. `on_loaded` runs
    /// once both have settled.
    fn load_assets(&self, assets: &AssetConfig, on_loaded: AssetCallback<Self::Backend>);

    fn read_clipboard(&self, on_done: ClipboardReadCallback);

    fn write_clipboard(&self, text: &str, on_done: ClipboardWriteCallback);
}
