//! Screen size resource.
//!
//! Stores the dimensions of the screen the pet walks on, in pixels. The
//! motion systems read this to compute border targets and sweep limits.

use bevy_ecs::prelude::Resource;

use crate::geometry::Size;

/// Current screen size in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl ScreenSize {
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }
}
