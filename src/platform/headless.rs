// src/platform/headless.rs
//! Headless host: an in-process stand-in for the browser.
//!
//! It records everything the frame asks of the host and lets the caller drive
//! the host side by hand: fire input, resize the viewport, finish or fail the
//! asset load, and settle pending clipboard operations. Clones share state.

use crate::config::AssetConfig;
use crate::display::drivers::RecordingBackend;
use crate::display::LoadedAssets;
use crate::geometry::Size;
use anyhow::{anyhow, Result};
use log::{debug, error, info, trace};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::events::{Channel, HostEvent};
use super::platform_trait::{
    AssetCallback, ClipboardReadCallback, ClipboardWriteCallback, Listener, PageStructure,
    Platform,
};

enum PendingClipboard {
    Read(ClipboardReadCallback),
    Write(String, ClipboardWriteCallback),
}

#[derive(Default)]
struct HeadlessState {
    title: String,
    window_size: Option<Size>,
    viewport: Size,
    canvas: Size,
    page: Option<PageStructure>,
    listeners: Vec<(Channel, Rc<RefCell<Listener>>)>,
    asset_request: Option<AssetConfig>,
    pending_assets: Option<AssetCallback<RecordingBackend>>,
    clipboard: String,
    clipboard_denied: bool,
    pending_clipboard: VecDeque<PendingClipboard>,
    errors: Vec<String>,
}

#[derive(Clone)]
pub struct HeadlessPlatform {
    state: Rc<RefCell<HeadlessState>>,
    backend: RecordingBackend,
}

impl HeadlessPlatform {
    pub fn new(viewport: Size) -> Self {
        info!(
            "HeadlessPlatform::new() - viewport {}x{}",
            viewport.width, viewport.height
        );
        let state = HeadlessState {
            viewport,
            ..HeadlessState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            backend: RecordingBackend::new(),
        }
    }

    /// The backend handed out when the asset load completes.
    pub fn backend(&self) -> &RecordingBackend {
        &self.backend
    }

    /// Runs every listener attached to `channel`, in attach order. Returns how
    /// many ran. Listener errors are logged and kept in [`Self::errors`].
    pub fn fire(&self, channel: Channel, event: HostEvent) -> usize {
        let listeners: Vec<Rc<RefCell<Listener>>> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|(attached, _)| *attached == channel)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        trace!(
            "HeadlessPlatform: firing {} to {} listener(s)",
            channel.event_name(),
            listeners.len()
        );
        for listener in &listeners {
            let result = {
                let mut listener = listener.borrow_mut();
                (listener.as_mut())(event.clone())
            };
            if let Err(e) = result {
                error!("HeadlessPlatform: {} listener failed: {:#}", channel.event_name(), e);
                self.state.borrow_mut().errors.push(format!("{e:#}"));
            }
        }
        listeners.len()
    }

    /// Changes the viewport and fires `resize`, as a user resizing the
    /// browser window would.
    pub fn resize_viewport(&self, size: Size) {
        self.state.borrow_mut().viewport = size;
        self.fire(Channel::Resize, HostEvent::Resize);
    }

    /// Fires the window `load` event.
    pub fn finish_page_load(&self) {
        self.fire(Channel::Load, HostEvent::Load);
    }

    /// Resolves the pending asset load with `font_data`.
    pub fn complete_asset_load(&self, font_data: Vec<u8>) -> bool {
        let Some(on_loaded) = self.state.borrow_mut().pending_assets.take() else {
            return false;
        };
        debug!("HeadlessPlatform: asset load complete");
        on_loaded(Ok(LoadedAssets {
            backend: self.backend.clone(),
            font_data,
        }));
        true
    }

    /// Rejects the pending asset load.
    pub fn fail_asset_load(&self, reason: &str) -> bool {
        let Some(on_loaded) = self.state.borrow_mut().pending_assets.take() else {
            return false;
        };
        debug!("HeadlessPlatform: asset load failed: {}", reason);
        on_loaded(Err(anyhow!("{reason}")));
        true
    }

    /// Completes the oldest pending clipboard operation. Returns `false` when
    /// nothing was pending.
    pub fn settle_clipboard(&self) -> bool {
        let (pending, denied) = {
            let mut state = self.state.borrow_mut();
            (state.pending_clipboard.pop_front(), state.clipboard_denied)
        };
        match pending {
            None => false,
            Some(PendingClipboard::Read(on_done)) => {
                if denied {
                    on_done(Err(anyhow!("clipboard read permission denied")));
                } else {
                    let text = self.state.borrow().clipboard.clone();
                    on_done(Ok(text));
                }
                true
            }
            Some(PendingClipboard::Write(text, on_done)) => {
                if denied {
                    on_done(Err(anyhow!("clipboard write permission denied")));
                } else {
                    self.state.borrow_mut().clipboard = text;
                    on_done(Ok(()));
                }
                true
            }
        }
    }

    pub fn set_clipboard_denied(&self, denied: bool) {
        self.state.borrow_mut().clipboard_denied = denied;
    }

    /// Puts text on the clipboard from outside the page.
    pub fn copy_external(&self, text: &str) {
        self.state.borrow_mut().clipboard = text.to_string();
    }

    pub fn clipboard_text(&self) -> String {
        self.state.borrow().clipboard.clone()
    }

    pub fn pending_clipboard_ops(&self) -> usize {
        self.state.borrow().pending_clipboard.len()
    }

    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    pub fn window_size(&self) -> Option<Size> {
        self.state.borrow().window_size
    }

    pub fn page(&self) -> Option<PageStructure> {
        self.state.borrow().page.clone()
    }

    pub fn asset_request(&self) -> Option<AssetConfig> {
        self.state.borrow().asset_request.clone()
    }

    pub fn assets_pending(&self) -> bool {
        self.state.borrow().pending_assets.is_some()
    }

    /// Channels in the order their listeners were attached.
    pub fn attached_channels(&self) -> Vec<Channel> {
        self.state
            .borrow()
            .listeners
            .iter()
            .map(|(channel, _)| *channel)
            .collect()
    }

    /// Listener errors collected so far.
    pub fn errors(&self) -> Vec<String> {
        self.state.borrow().errors.clone()
    }
}

impl Platform for HeadlessPlatform {
    type Backend = RecordingBackend;

    fn set_title(&self, title: &str) -> Result<()> {
        info!("HeadlessPlatform: SetTitle '{}'", title);
        self.state.borrow_mut().title = title.to_string();
        Ok(())
    }

    fn resize_window(&self, size: Size) -> Result<()> {
        info!("HeadlessPlatform: ResizeWindow {}x{}", size.width, size.height);
        self.state.borrow_mut().window_size = Some(size);
        Ok(())
    }

    fn viewport_size(&self) -> Result<Size> {
        Ok(self.state.borrow().viewport)
    }

    fn canvas_size(&self) -> Result<Size> {
        Ok(self.state.borrow().canvas)
    }

    fn set_canvas_size(&self, size: Size) -> Result<()> {
        self.state.borrow_mut().canvas = size;
        Ok(())
    }

    fn install_page(&self, page: &PageStructure) -> Result<()> {
        info!("HeadlessPlatform: page installed with canvas #{}", page.canvas_id);
        self.state.borrow_mut().page = Some(page.clone());
        Ok(())
    }

    fn listen(&self, channel: Channel, listener: Listener) -> Result<()> {
        debug!("HeadlessPlatform: listening for {}", channel.event_name());
        self.state
            .borrow_mut()
            .listeners
            .push((channel, Rc::new(RefCell::new(listener))));
        Ok(())
    }

    fn dispatch_resize(&self) -> Result<()> {
        self.fire(Channel::Resize, HostEvent::Resize);
        Ok(())
    }

    fn load_assets(&self, assets: &AssetConfig, on_loaded: AssetCallback<RecordingBackend>) {
        debug!("HeadlessPlatform: asset load requested ({})", assets.font_url);
        let mut state = self.state.borrow_mut();
        state.asset_request = Some(assets.clone());
        state.pending_assets = Some(on_loaded);
    }

    fn read_clipboard(&self, on_done: ClipboardReadCallback) {
        self.state
            .borrow_mut()
            .pending_clipboard
            .push_back(PendingClipboard::Read(on_done));
    }

    fn write_clipboard(&self, text: &str, on_done: ClipboardWriteCallback) {
        self.state
            .borrow_mut()
            .pending_clipboard
            .push_back(PendingClipboard::Write(text.to_string(), on_done));
    }
}
