// src/display/drivers/recording.rs
//! Recording drawing backend for native runs and tests.
//!
//! Surfaces are numbered tokens, and painters append every operation to a
//! shared [`PaintLog`] so the paint pass can be inspected after the painter has
//! been handed to the frame.

use crate::config::{ColorSpace, SurfaceOptions};
use crate::display::driver::DrawingBackend;
use crate::geometry::{Point, Rect, Size};
use crate::painter::Painter;
use anyhow::{bail, Result};
use log::trace;
use std::cell::RefCell;
use std::rc::Rc;

/// One recorded painter call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Save,
    Restore,
    Translate(Point),
    Clip(Rect),
    Flush { surface: u64 },
}

/// Shared, append-only record of painter calls.
#[derive(Debug, Clone, Default)]
pub struct PaintLog {
    ops: Rc<RefCell<Vec<PaintOp>>>,
}

impl PaintLog {
    pub fn push(&self, op: PaintOp) {
        trace!("PaintLog: {:?}", op);
        self.ops.borrow_mut().push(op);
    }

    pub fn ops(&self) -> Vec<PaintOp> {
        self.ops.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.ops.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
    }
}

/// A surface created by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSurface {
    pub id: u64,
    pub canvas_id: String,
    pub color_space: ColorSpace,
    pub options: SurfaceOptions,
}

/// A painter built by [`RecordingBackend`] and the font handles it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedPainter {
    pub surface: u64,
    pub font_manager: usize,
    pub typeface: usize,
}

#[derive(Debug, Default)]
struct BackendState {
    surfaces: Vec<RecordedSurface>,
    painters: Vec<RecordedPainter>,
    fail_next_surface: bool,
    fail_next_painter: bool,
}

/// Drawing backend that records instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    log: PaintLog,
    state: Rc<RefCell<BackendState>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &PaintLog {
        &self.log
    }

    /// Every surface created so far, oldest first.
    pub fn surfaces(&self) -> Vec<RecordedSurface> {
        self.state.borrow().surfaces.clone()
    }

    /// Every painter built so far, oldest first.
    pub fn painters(&self) -> Vec<RecordedPainter> {
        self.state.borrow().painters.clone()
    }

    /// Makes the next `make_surface` call fail, as a lost WebGL context would.
    pub fn fail_next_surface(&self) {
        self.state.borrow_mut().fail_next_surface = true;
    }

    pub fn fail_next_painter(&self) {
        self.state.borrow_mut().fail_next_painter = true;
    }
}

/// Font handles are plain numbers: the manager is the byte sum of the font
/// data and the typeface is its length.
impl DrawingBackend for RecordingBackend {
    type Surface = RecordedSurface;
    type FontManager = usize;
    type Typeface = usize;

    fn font_manager_from_data(&self, data: &[u8]) -> Result<usize> {
        if data.is_empty() {
            bail!("font data is empty");
        }
        Ok(data.iter().map(|byte| usize::from(*byte)).sum())
    }

    fn typeface_from_data(&self, data: &[u8]) -> Result<usize> {
        if data.is_empty() {
            bail!("font data is empty");
        }
        Ok(data.len())
    }

    fn make_surface(
        &self,
        canvas_id: &str,
        color_space: ColorSpace,
        options: &SurfaceOptions,
    ) -> Result<RecordedSurface> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next_surface) {
            bail!("WebGL context unavailable for #{}", canvas_id);
        }
        let surface = RecordedSurface {
            id: state.surfaces.len() as u64 + 1,
            canvas_id: canvas_id.to_string(),
            color_space,
            options: options.clone(),
        };
        state.surfaces.push(surface.clone());
        Ok(surface)
    }

    fn make_painter(
        &self,
        surface: RecordedSurface,
        font_manager: &usize,
        typeface: &usize,
        size: Size,
    ) -> Result<Box<dyn Painter>> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next_painter) {
            bail!("no canvas for surface {}", surface.id);
        }
        state.painters.push(RecordedPainter {
            surface: surface.id,
            font_manager: *font_manager,
            typeface: *typeface,
        });
        Ok(Box::new(RecordingPainter::for_surface(
            self.log.clone(),
            surface.id,
            size,
        )))
    }
}

/// Painter that appends every call to a [`PaintLog`].
#[derive(Debug)]
pub struct RecordingPainter {
    log: PaintLog,
    surface: u64,
    size: Size,
    depth: usize,
}

impl RecordingPainter {
    pub fn new(log: PaintLog, size: Size) -> Self {
        Self::for_surface(log, 0, size)
    }

    fn for_surface(log: PaintLog, surface: u64, size: Size) -> Self {
        Self {
            log,
            surface,
            size,
            depth: 0,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

impl Painter for RecordingPainter {
    fn save(&mut self) {
        self.depth += 1;
        self.log.push(PaintOp::Save);
    }

    fn restore(&mut self) {
        // Unbalanced restores are ignored, matching canvas semantics.
        self.depth = self.depth.saturating_sub(1);
        self.log.push(PaintOp::Restore);
    }

    fn translate(&mut self, offset: Point) {
        self.log.push(PaintOp::Translate(offset));
    }

    fn clip(&mut self, rect: Rect) {
        self.log.push(PaintOp::Clip(rect));
    }

    fn flush(&mut self) -> Result<()> {
        self.log.push(PaintOp::Flush {
            surface: self.surface,
        });
        Ok(())
    }

    fn save_count(&self) -> usize {
        self.depth
    }
}
