//! Software drawing surface.
//!
//! [`Canvas`] renders into an in-memory RGBA buffer. Pixel-aligned blits are
//! straight copies with alpha blending; any other transform resamples the
//! source bilinearly.

use image::{Rgba, RgbaImage};
use log::warn;
use std::path::Path;

use crate::geometry::{Point, Rect, Size, Transform2D};
use crate::render::raster::{blend_over, sample_bilinear};
use crate::render::surface::DrawSurface;

pub struct Canvas {
    pixels: RgbaImage,
    transform: Transform2D,
    stack: Vec<Transform2D>,
}

impl Canvas {
    /// A fully transparent canvas.
    pub fn new(size: Size) -> Self {
        Self {
            pixels: RgbaImage::new(size.w.max(1) as u32, size.h.max(1) as u32),
            transform: Transform2D::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        Size::of_image(&self.pixels)
    }

    pub fn clear(&mut self, color: Rgba<u8>) {
        for px in self.pixels.pixels_mut() {
            *px = color;
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Number of saved states not yet restored.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn transform(&self) -> Transform2D {
        self.transform
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.pixels.save(path)
    }

    fn put(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.pixels.width() as i64 || y >= self.pixels.height() as i64 {
            return;
        }
        blend_over(self.pixels.get_pixel_mut(x as u32, y as u32), color);
    }

    fn blit_aligned(&mut self, ox: i32, oy: i32, image: &RgbaImage) {
        for (x, y, px) in image.enumerate_pixels() {
            self.put(ox as i64 + x as i64, oy as i64 + y as i64, *px);
        }
    }

    fn blit_transformed(&mut self, at: Point, image: &RgbaImage) {
        let Some(inverse) = self.transform.inverse() else {
            return;
        };
        let (w, h) = (image.width() as f32, image.height() as f32);
        let (x0, y0) = (at.x as f32, at.y as f32);
        let corners = [
            self.transform.apply(x0, y0),
            self.transform.apply(x0 + w, y0),
            self.transform.apply(x0, y0 + h),
            self.transform.apply(x0 + w, y0 + h),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max);

        let x_start = min_x.floor().max(0.0) as i64;
        let y_start = min_y.floor().max(0.0) as i64;
        let x_end = (max_x.ceil() as i64).min(self.pixels.width() as i64);
        let y_end = (max_y.ceil() as i64).min(self.pixels.height() as i64);

        for y in y_start..y_end {
            for x in x_start..x_end {
                let (lx, ly) = inverse.apply(x as f32 + 0.5, y as f32 + 0.5);
                let (sx, sy) = (lx - x0, ly - y0);
                if sx < -0.5 || sy < -0.5 || sx > w + 0.5 || sy > h + 0.5 {
                    continue;
                }
                let color = sample_bilinear(image, sx - 0.5, sy - 0.5);
                self.put(x, y, color);
            }
        }
    }
}

impl DrawSurface for Canvas {
    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(t) => self.transform = t,
            None => warn!("Canvas::restore called without a matching save"),
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.translate(dx, dy);
    }

    fn rotate(&mut self, degrees: f32) {
        self.transform = self.transform.rotate(degrees);
    }

    fn scale(&mut self, factor: f32) {
        self.transform = self.transform.scale(factor, factor);
    }

    fn draw_image(&mut self, at: Point, image: &RgbaImage) {
        match self.transform.as_integer_translation() {
            Some((tx, ty)) => self.blit_aligned(at.x + tx, at.y + ty, image),
            None => self.blit_transformed(at, image),
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        if rect.w <= 0 || rect.h <= 0 {
            return;
        }
        let (right, bottom) = (rect.x + rect.w - 1, rect.y + rect.h - 1);
        let mut outline: Vec<(i32, i32)> = Vec::new();
        for x in rect.x..=right {
            outline.push((x, rect.y));
            outline.push((x, bottom));
        }
        for y in rect.y..=bottom {
            outline.push((rect.x, y));
            outline.push((right, y));
        }
        outline.sort_unstable();
        outline.dedup();
        for (x, y) in outline {
            let (px, py) = self.transform.apply(x as f32 + 0.5, y as f32 + 0.5);
            self.put(px.floor() as i64, py.floor() as i64, color);
        }
    }
}
