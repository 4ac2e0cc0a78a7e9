// src/painter.rs

//! The stateful 2D painter contract the core draws through, and the scoped
//! save/restore guard the frame wraps every paint pass in.

use crate::geometry::{Point, Rect};
use anyhow::Result;
use std::ops::{Deref, DerefMut};

/// A 2D drawing interface bound to one surface.
///
/// Implementations keep a stack of saved states (transform + clip). `save`
/// pushes, `restore` pops; `save_count` reports the current depth.
pub trait Painter {
    fn save(&mut self);

    fn restore(&mut self);

    /// Moves the coordinate origin by `offset`.
    fn translate(&mut self, offset: Point);

    /// Intersects the current clip with `rect`, in local coordinates.
    fn clip(&mut self, rect: Rect);

    /// Pushes pending drawing to the host compositor.
    fn flush(&mut self) -> Result<()>;

    fn save_count(&self) -> usize;
}

/// Painter state saved for the lifetime of the guard.
///
/// `save` runs on construction and `restore` runs on drop, so the pair stays
/// balanced on early returns and during unwinding.
pub struct SavedState<'a> {
    painter: &'a mut (dyn Painter + 'a),
}

impl<'a> SavedState<'a> {
    pub fn new(painter: &'a mut (dyn Painter + 'a)) -> Self {
        painter.save();
        Self { painter }
    }
}

impl<'a> Deref for SavedState<'a> {
    type Target = dyn Painter + 'a;

    fn deref(&self) -> &Self::Target {
        self.painter
    }
}

impl<'a> DerefMut for SavedState<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.painter
    }
}

impl Drop for SavedState<'_> {
    fn drop(&mut self) {
        self.painter.restore();
    }
}
