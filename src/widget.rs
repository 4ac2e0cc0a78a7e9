// src/widget.rs

//! What the core hands the frame when it asks for a repaint.

use crate::geometry::{Point, Rect, Size};
use crate::painter::Painter;
use anyhow::Result;

/// A widget that can repaint itself in its own local coordinate space.
pub trait Widget {
    /// Position of the widget's top-left corner in frame coordinates.
    fn position(&self) -> Point;

    fn size(&self) -> Size;

    fn redraw(&mut self, painter: &mut dyn Painter, completely: bool) -> Result<()>;
}

/// The application root. It paints the whole frame.
pub trait App {
    fn redraw(&mut self, painter: &mut dyn Painter, completely: bool) -> Result<()>;
}

/// What an update request repaints.
pub enum UpdateTarget<'a> {
    App(&'a mut dyn App),
    Widget(&'a mut dyn Widget),
}

impl UpdateTarget<'_> {
    /// Origin to translate to and the clip to apply before redrawing.
    ///
    /// The root paints unclipped from (0,0); a widget paints from its position
    /// clipped to its own bounds.
    pub fn coordinate_frame(&self) -> (Point, Option<Rect>) {
        match self {
            UpdateTarget::App(_) => (Point::ORIGIN, None),
            UpdateTarget::Widget(widget) => {
                (widget.position(), Some(Rect::from_size(widget.size())))
            }
        }
    }

    pub fn redraw(&mut self, painter: &mut dyn Painter, completely: bool) -> Result<()> {
        match self {
            UpdateTarget::App(app) => app.redraw(painter, completely),
            UpdateTarget::Widget(widget) => widget.redraw(painter, completely),
        }
    }
}

/// A repaint request posted by the core.
///
/// A request without a target is accepted and ignored.
pub struct UpdateRequest<'a> {
    pub target: Option<UpdateTarget<'a>>,
    /// `true` when the target must repaint its whole region.
    pub completely: bool,
}

impl<'a> UpdateRequest<'a> {
    pub fn app(app: &'a mut dyn App, completely: bool) -> Self {
        Self {
            target: Some(UpdateTarget::App(app)),
            completely,
        }
    }

    pub fn widget(widget: &'a mut dyn Widget, completely: bool) -> Self {
        Self {
            target: Some(UpdateTarget::Widget(widget)),
            completely,
        }
    }

    pub fn empty() -> Self {
        Self {
            target: None,
            completely: false,
        }
    }
}
