//! Drawing surface seam.
//!
//! The engine never talks to a windowing toolkit directly. Hosts implement
//! [`DrawSurface`] over their painter; [`Canvas`](super::canvas::Canvas) is
//! the built-in software implementation used by the headless host and tests.

use image::{Rgba, RgbaImage};

use crate::geometry::{Point, Rect};

/// A painter with a save/restore stack of coordinate transforms.
///
/// Transform calls apply in the current local coordinate system, the same
/// way Qt's `QPainter` or an HTML canvas behave.
pub trait DrawSurface {
    /// Push the current transform state.
    fn save(&mut self);
    /// Pop the most recently saved transform state.
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    /// Rotate clockwise by `degrees`.
    fn rotate(&mut self, degrees: f32);
    /// Uniform scale of the coordinate system.
    fn scale(&mut self, factor: f32);
    /// Blit `image` with its top-left corner at `at` (local coordinates).
    fn draw_image(&mut self, at: Point, image: &RgbaImage);
    /// One-pixel outline of `rect` (local coordinates).
    fn stroke_rect(&mut self, rect: Rect, color: Rgba<u8>);
}
