//! ECS components for the pet's visual parts.
//!
//! Submodules overview:
//! - [`visualpart`] – one transformable piece of the sprite (image, placement,
//!   scale, rotation, mirroring)
//! - [`partorder`] – position of a part in the train, head first

pub mod partorder;
pub mod visualpart;
