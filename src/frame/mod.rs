// src/frame/mod.rs
//! The web frame: the one handle the core uses to reach the browser window.
//!
//! A [`Frame`] owns the surface/painter pair, the handlers the core registers,
//! and the bootstrap lifecycle. It is a cheap clonable handle; clones share
//! the same state. Host listeners only hold weak references to that state.
//!
//! ## Lifecycle
//! 1. `Frame::new` sets the title and requests the window size.
//! 2. The core registers its handlers with the `on_*` methods.
//! 3. `run()` installs the page, attaches all listeners, and starts loading
//!    the drawing backend and the font.
//! 4. When both have loaded, the backend context is installed and a resize
//!    event is synthesized. That resize builds the first surface and paints.

mod bootstrap;
mod dispatch;
mod wiring;

#[cfg(test)]
mod tests;

use crate::config::{FrameConfig, WindowConfig, CONFIG};
use crate::display::{BackendContext, LoadedAssets, SurfaceManager, SurfaceTarget};
use crate::error::FrameError;
use crate::events::{InputCharEvent, InputKeyEvent, MouseEvent, WheelEvent};
use crate::geometry::Size;
use crate::painter::Painter;
use crate::platform::Platform;
use crate::widget::UpdateRequest;
use anyhow::{Context, Result};
use log::{debug, error, info, trace, warn};
use std::cell::{Cell, RefCell, RefMut};
use std::rc::Rc;

use wiring::PendingListeners;

pub type MouseHandler = Box<dyn FnMut(MouseEvent)>;
pub type WheelHandler = Box<dyn FnMut(WheelEvent)>;
pub type InputCharHandler = Box<dyn FnMut(InputCharEvent)>;
pub type InputKeyHandler = Box<dyn FnMut(InputKeyEvent)>;
/// Called with the fresh painter after every resize. The flag is always
/// `true`: a new surface has no valid content.
pub type RedrawHandler = Box<dyn FnMut(&mut dyn Painter, bool) -> Result<()>>;

/// Where the frame is in its bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, `run()` not called yet.
    Created,
    /// Waiting for the drawing backend and the font.
    Loading,
    /// Backend installed; resizes build surfaces.
    Ready,
    /// Terminal. The backend or a surface could not be created.
    Failed(String),
}

impl Lifecycle {
    pub fn is_failed(&self) -> bool {
        matches!(self, Lifecycle::Failed(_))
    }
}

struct Shared<P: Platform> {
    platform: P,
    config: FrameConfig,
    surfaces: RefCell<SurfaceManager<P::Backend>>,
    pending: RefCell<PendingListeners>,
    lifecycle: RefCell<Lifecycle>,
    running: Cell<bool>,
}

impl<P: Platform> Shared<P> {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.borrow().clone()
    }

    fn set_lifecycle(&self, next: Lifecycle) {
        debug!("Frame: lifecycle {:?} -> {:?}", self.lifecycle.borrow(), next);
        *self.lifecycle.borrow_mut() = next;
    }

    /// Moves the frame to its terminal failed state.
    fn fail(&self, error: FrameError) {
        error!("Frame: fatal: {}", error);
        self.set_lifecycle(Lifecycle::Failed(error.to_string()));
    }

    /// Completion of the parallel backend + font load.
    fn assets_loaded(&self, result: Result<LoadedAssets<P::Backend>>) {
        let context = match result.and_then(BackendContext::install) {
            Ok(context) => context,
            Err(e) => {
                self.fail(FrameError::AssetLoad(format!("{e:#}")));
                return;
            }
        };
        self.surfaces.borrow_mut().install(context);
        self.set_lifecycle(Lifecycle::Ready);

        info!("Frame: assets loaded, synthesizing initial resize");
        if let Err(e) = self.platform.dispatch_resize() {
            self.fail(FrameError::SurfaceCreation(format!(
                "initial resize could not be dispatched: {e:#}"
            )));
        }
    }

    /// Body of the resize listener: rebuild the surface at the viewport size,
    /// then hand the new painter to the redraw handler, if there is one.
    fn handle_resize(&self, redraw: Option<&mut RedrawHandler>) -> Result<()> {
        if self.lifecycle.borrow().is_failed() {
            debug!("Frame: resize ignored, frame has failed");
            return Ok(());
        }
        let mut surfaces = self
            .surfaces
            .try_borrow_mut()
            .map_err(|_| FrameError::ReentrantUpdate)?;
        if !surfaces.is_ready() {
            debug!("Frame: resize ignored, drawing backend not loaded yet");
            return Ok(());
        }

        let size = self
            .platform
            .viewport_size()
            .context("Failed to read viewport size")?;
        if let Err(e) = surfaces.ensure_surface(size) {
            drop(surfaces);
            let reason = match e.downcast_ref::<FrameError>() {
                Some(frame_error) => frame_error.clone(),
                None => FrameError::SurfaceCreation(format!("{e:#}")),
            };
            self.fail(reason);
            return Err(e);
        }

        match (surfaces.painter_mut(), redraw) {
            (Some(painter), Some(redraw)) => redraw(&mut **painter, true),
            _ => Ok(()),
        }
    }
}

/// Handle to the browser window the core draws into.
pub struct Frame<P: Platform> {
    shared: Rc<Shared<P>>,
}

impl<P: Platform> Clone for Frame<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<P: Platform> Frame<P> {
    /// Creates a frame with the default configuration, titled `title` and
    /// asking the host for a `width` x `height` window.
    pub fn new(platform: P, title: &str, width: f64, height: f64) -> Result<Self> {
        let mut config = CONFIG.clone();
        config.window = WindowConfig {
            title: title.to_string(),
            width,
            height,
        };
        Self::with_config(platform, config)
    }

    pub fn with_config(platform: P, config: FrameConfig) -> Result<Self> {
        info!(
            "Frame::with_config() - '{}' {}x{}, canvas #{}",
            config.window.title, config.window.width, config.window.height, config.canvas.id
        );
        platform
            .set_title(&config.window.title)
            .context("Failed to set window title")?;
        platform
            .resize_window(Size::new(config.window.width, config.window.height))
            .context("Failed to request window size")?;

        let target = SurfaceTarget {
            canvas_id: config.canvas.id.clone(),
            color_space: config.canvas.color_space,
            options: config.surface.clone(),
        };
        let shared = Shared {
            platform,
            config,
            surfaces: RefCell::new(SurfaceManager::new(target)),
            pending: RefCell::new(PendingListeners::default()),
            lifecycle: RefCell::new(Lifecycle::Created),
            running: Cell::new(false),
        };
        Ok(Self {
            shared: Rc::new(shared),
        })
    }

    pub fn platform(&self) -> &P {
        &self.shared.platform
    }

    pub fn config(&self) -> &FrameConfig {
        &self.shared.config
    }

    pub fn status(&self) -> Lifecycle {
        self.shared.lifecycle()
    }

    fn register(&self, what: &str, store: impl FnOnce(&mut PendingListeners)) {
        if self.shared.running.get() {
            warn!("Frame: {} registered after run(); it will never be attached", what);
        }
        store(&mut self.shared.pending.borrow_mut());
    }

    pub fn on_mouse_down(&self, handler: impl FnMut(MouseEvent) + 'static) {
        self.register("mouse-down handler", |pending| {
            pending.mouse_down = Some(Box::new(handler))
        });
    }

    pub fn on_mouse_up(&self, handler: impl FnMut(MouseEvent) + 'static) {
        self.register("mouse-up handler", |pending| {
            pending.mouse_up = Some(Box::new(handler))
        });
    }

    pub fn on_mouse_wheel(&self, handler: impl FnMut(WheelEvent) + 'static) {
        self.register("wheel handler", |pending| {
            pending.mouse_wheel = Some(Box::new(handler))
        });
    }

    pub fn on_cursor_pos(&self, handler: impl FnMut(MouseEvent) + 'static) {
        self.register("cursor handler", |pending| {
            pending.cursor_pos = Some(Box::new(handler))
        });
    }

    pub fn on_input_char(&self, handler: impl FnMut(InputCharEvent) + 'static) {
        self.register("input-char handler", |pending| {
            pending.input_char = Some(Box::new(handler))
        });
    }

    pub fn on_input_key(&self, handler: impl FnMut(InputKeyEvent) + 'static) {
        self.register("input-key handler", |pending| {
            pending.input_key = Some(Box::new(handler))
        });
    }

    pub fn on_redraw(
        &self,
        handler: impl FnMut(&mut dyn Painter, bool) -> Result<()> + 'static,
    ) {
        self.register("redraw handler", |pending| {
            pending.redraw = Some(Box::new(handler))
        });
    }

    /// Bootstraps the page and attaches every registered handler.
    ///
    /// Returns once the listeners are attached; the first paint happens later,
    /// when the asset load completes.
    pub fn run(&self) -> Result<()> {
        if self.shared.running.replace(true) {
            return Err(FrameError::AlreadyRunning.into());
        }
        info!("Frame::run() - bootstrapping");

        bootstrap::install_page(&self.shared)?;
        let pending = std::mem::take(&mut *self.shared.pending.borrow_mut());
        let attached = wiring::activate(&self.shared, pending)?;
        info!("Frame::run() - {} listener(s) attached", attached);

        bootstrap::start_asset_load(&self.shared);
        Ok(())
    }

    /// The current painter, or `None` before the first surface exists or while
    /// a paint pass holds it.
    pub fn get_painter(&self) -> Option<RefMut<'_, Box<dyn Painter>>> {
        let surfaces = self.shared.surfaces.try_borrow_mut().ok()?;
        RefMut::filter_map(surfaces, |surfaces| surfaces.painter_mut()).ok()
    }

    /// Pixel size of the page canvas.
    pub fn get_size(&self) -> Result<Size> {
        self.shared.platform.canvas_size()
    }

    /// Repaints the request's target through the current painter.
    ///
    /// A request without a target, or one posted before the first surface
    /// exists, is ignored.
    ///
    /// The core must not post updates from inside a `redraw` (of a widget,
    /// the app, or the resize redraw handler): the painter is held by the
    /// running pass and a nested call returns [`FrameError::ReentrantUpdate`]
    /// without painting. Repaint children from within the parent's `redraw`
    /// through the painter it was given instead.
    pub fn post_update(&self, request: UpdateRequest<'_>) -> Result<()> {
        if request.target.is_none() {
            trace!("Frame::post_update() - no target");
            return Ok(());
        }
        let mut surfaces = self
            .shared
            .surfaces
            .try_borrow_mut()
            .map_err(|_| FrameError::ReentrantUpdate)?;
        let Some(painter) = surfaces.painter_mut() else {
            trace!("Frame::post_update() - no painter yet");
            return Ok(());
        };
        dispatch::render(&mut **painter, request)
    }

    /// Presentation is host-driven; nothing to do.
    pub fn flush(&self) {}

    pub fn clear(&self) {}
}
