//! Rendering: the drawing-surface seam, the scoped render context, layout
//! math and the composite renderer.
//!
//! Submodules overview
//! - [`surface`] – the [`surface::DrawSurface`] trait hosts implement
//! - [`canvas`] – software surface over an RGBA buffer
//! - [`context`] – per-paint scoped state with symmetric save/restore
//! - [`layout`] – centering rule and left-to-right part rows
//! - [`composite`] – resolves parts through the transform cache and blits them
//! - [`raster`] – bilinear sampling and alpha blending helpers

pub mod canvas;
pub mod composite;
pub mod context;
pub mod layout;
pub mod raster;
pub mod surface;
