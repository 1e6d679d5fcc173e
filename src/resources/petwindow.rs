//! The movable pet window.
//!
//! The motion states read the window's position and size and write its new
//! position every tick. The window is sized to hold the sprite at any of its
//! rotations: a square whose side is the sprite's longer scaled dimension.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::geometry::{Point, Size};

#[derive(Resource, Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PetWindow {
    /// Top-left corner in screen pixels.
    pub pos: Point,
    /// Window size in pixels.
    pub size: Size,
    /// Unscaled bounding size of the sprite the window must contain.
    #[serde(skip)]
    pub sprite: Size,
    /// Scale applied to `sprite` when fitting.
    #[serde(skip)]
    pub scale: f32,
}

impl PetWindow {
    /// A window of an explicit size that is never refitted to a sprite.
    pub fn new(pos: Point, size: Size) -> Self {
        Self {
            pos,
            size,
            sprite: size,
            scale: 1.0,
        }
    }

    /// A window fitted around `sprite` at `scale`, placed at `pos`.
    pub fn fitted(pos: Point, sprite: Size, scale: f32) -> Self {
        let mut window = Self {
            pos,
            size: Size::default(),
            sprite,
            scale,
        };
        window.size = window.fitted_size();
        window
    }

    /// Square side large enough for every rotation of the scaled sprite.
    pub fn fitted_size(&self) -> Size {
        let side = (self.sprite.w.max(self.sprite.h) as f32 * self.scale) as i32;
        Size::new(side.max(1), side.max(1))
    }

    /// Resize to [`fitted_size`](Self::fitted_size) keeping the center fixed.
    pub fn refit(&mut self) {
        let new_size = self.fitted_size();
        let center_x = self.pos.x + self.size.w / 2;
        let center_y = self.pos.y + self.size.h / 2;
        self.pos = Point::new(center_x - new_size.w / 2, center_y - new_size.h / 2);
        self.size = new_size;
    }

    pub fn width(&self) -> i32 {
        self.size.w
    }

    pub fn height(&self) -> i32 {
        self.size.h
    }

    pub fn move_to(&mut self, pos: Point) {
        self.pos = pos;
    }
}
