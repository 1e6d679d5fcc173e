//! Debug toggle resource.
//!
//! The mere presence of this resource indicates that debug overlays should
//! be drawn over the pet. Remove it to disable debug behavior.

use bevy_ecs::prelude::Resource;

/// Marker resource: when present, the render pass draws part outlines and
/// the rotation center.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct DebugMode {}
