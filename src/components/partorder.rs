//! Part order component.
//!
//! Position of a visual part in the train, counted from the head. The
//! renderer lays parts out left to right in ascending order.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct PartOrder(pub u32);
