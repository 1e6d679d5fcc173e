//! Visual part component.
//!
//! One independently transformable piece of the pet sprite: the head of the
//! train, a carriage, or the tail. The source image is shared and never
//! mutated; rotation and mirroring are rewritten every tick from the motion
//! state.

use bevy_ecs::prelude::Component;

use crate::geometry::{Point, Size};
use crate::resources::imagestore::SourceImage;

#[derive(Component, Clone, Debug)]
pub struct VisualPart {
    pub image: SourceImage,
    /// Top-left draw position in window pixels; `(0, 0)` centers the part.
    pub placement: Point,
    /// Part scale, multiplied by the frame's global scale.
    pub scale: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    pub mirrored: bool,
}

impl VisualPart {
    pub fn new(image: SourceImage) -> Self {
        Self {
            image,
            placement: Point::ORIGIN,
            scale: 1.0,
            rotation: 0.0,
            mirrored: false,
        }
    }

    pub fn with_placement(mut self, placement: Point) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Size of the unrotated part at `global_scale`, truncated to pixels.
    pub fn scaled_size(&self, global_scale: f32) -> Size {
        self.image.size().scaled(global_scale * self.scale)
    }
}
