//! Per-paint render context.
//!
//! A [`RenderContext`] lives for exactly one paint call. Creating it saves
//! the surface state and dropping it restores that state, so every exit path
//! (early `return`, `?`, unwinding) leaves the surface balanced. Nested
//! save/restore pairs go through [`RenderContext::scoped`].

use image::{Rgba, RgbaImage};
use std::ops::{Deref, DerefMut};

use crate::geometry::{Point, Rect, Size};
use crate::render::surface::DrawSurface;

pub struct RenderContext<'s, S: DrawSurface + ?Sized> {
    surface: &'s mut S,
    /// Current window size in pixels.
    pub window_size: Size,
    /// Global scale factor for this frame.
    pub scale_factor: f32,
    /// Active rotation in degrees.
    pub rotation_angle: f32,
    /// Rotation center; the window center when `None`.
    pub center_point: Option<Point>,
}

impl<'s, S: DrawSurface + ?Sized> RenderContext<'s, S> {
    /// Save the surface state and open a context over it.
    pub fn begin(
        surface: &'s mut S,
        window_size: Size,
        scale_factor: f32,
        rotation_angle: f32,
        center_point: Option<Point>,
    ) -> Self {
        surface.save();
        Self {
            surface,
            window_size,
            scale_factor,
            rotation_angle,
            center_point,
        }
    }

    /// Nested save; the returned guard restores when dropped.
    pub fn scoped(&mut self) -> RenderScope<'_, 's, S> {
        self.surface.save();
        RenderScope { ctx: self }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.surface.translate(dx, dy);
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.surface.rotate(degrees);
    }

    pub fn scale(&mut self, factor: f32) {
        self.surface.scale(factor);
    }

    /// Center of the window.
    pub fn window_center(&self) -> Point {
        self.window_size.center()
    }

    /// The configured rotation center, defaulting to the window center.
    pub fn center(&self) -> Point {
        self.center_point.unwrap_or_else(|| self.window_center())
    }

    /// Rotate the coordinate system by the active angle about the rotation
    /// center. No-op for a zero angle.
    pub fn apply_rotation_about_center(&mut self) {
        if self.rotation_angle == 0.0 {
            return;
        }
        let c = self.center();
        self.surface.translate(c.x as f32, c.y as f32);
        self.surface.rotate(self.rotation_angle);
        self.surface.translate(-c.x as f32, -c.y as f32);
    }

    pub fn draw_image(&mut self, at: Point, image: &RgbaImage) {
        self.surface.draw_image(at, image);
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        self.surface.stroke_rect(rect, color);
    }
}

impl<S: DrawSurface + ?Sized> Drop for RenderContext<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// Guard for a nested save/restore pair inside a [`RenderContext`].
pub struct RenderScope<'c, 's, S: DrawSurface + ?Sized> {
    ctx: &'c mut RenderContext<'s, S>,
}

impl<'s, S: DrawSurface + ?Sized> Deref for RenderScope<'_, 's, S> {
    type Target = RenderContext<'s, S>;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl<S: DrawSurface + ?Sized> DerefMut for RenderScope<'_, '_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl<S: DrawSurface + ?Sized> Drop for RenderScope<'_, '_, S> {
    fn drop(&mut self) {
        self.ctx.surface.restore();
    }
}
