//! Train pet engine library.
//!
//! The motion-and-rendering core of a desktop pet: a per-tick state machine
//! that walks a sprite along the screen border (or sweeps it across the
//! screen in rows), visual parts that are scaled, rotated and mirrored
//! independently, and a caching transform pipeline feeding a composite
//! renderer.
//!
//! # Project Structure
//!
//! - [`components`] – ECS components for the sprite's visual parts
//! - [`resources`] – motion state, pet window, configuration, image store
//!   and transform cache
//! - [`systems`] – tick systems and the render pass
//! - [`render`] – drawing-surface seam, render context, layout, compositing
//! - [`geometry`] – pixel points, sizes, rectangles and affine transforms
//! - [`engine`] – [`engine::PetEngine`], the host-facing entry point

pub mod components;
pub mod engine;
pub mod geometry;
pub mod render;
pub mod resources;
pub mod systems;
