//! Engine systems.
//!
//! Submodules overview
//! - [`motion`] – move the pet window, switch motion states, sync parts
//! - [`render`] – collect parts and draw them through the composite renderer

pub mod motion;
pub mod render;
