//! Composite renderer.
//!
//! Arranges the pet's visual parts in the window, resolves each part's
//! transformed image through the [`TransformCache`] and blits it.
//!
//! A single part is placed with the centering rule. Several parts form a
//! row in sequence order: widths and heights come from the unrotated parts
//! at the frame scale, the row is centered horizontally and every part is
//! centered vertically on its own height. Every part is pre-rotated and
//! mirrored by the cache; the surface is only rotated for the debug overlay.

use image::Rgba;
use log::debug;
use smallvec::SmallVec;

use crate::components::visualpart::VisualPart;
use crate::geometry::{Point, Rect, Size};
use crate::render::context::RenderContext;
use crate::render::layout::{centered_origin, resolve_placement, row_positions};
use crate::render::surface::DrawSurface;
use crate::resources::transformcache::TransformCache;

const DEBUG_PART_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const DEBUG_FRAME_COLOR: Rgba<u8> = Rgba([0, 200, 0, 255]);
const CENTER_MARKER: i32 = 5;

/// Per-frame parameters for a composite render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub window_size: Size,
    pub scale: f32,
    pub rotation: f32,
    /// Rotation center; the window center when `None`.
    pub center: Option<Point>,
    pub mirrored: bool,
}

/// Where each part ended up, in the parts' order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawnParts {
    pub rects: SmallVec<[Rect; 8]>,
}

/// Render `parts` into `surface` for one frame.
///
/// An empty part list draws nothing. Surface state is saved on entry and
/// restored on every exit path.
pub fn render<S: DrawSurface + ?Sized>(
    surface: &mut S,
    cache: &mut TransformCache,
    parts: &[&VisualPart],
    frame: &Frame,
    debug_overlay: bool,
) -> DrawnParts {
    if parts.is_empty() {
        return DrawnParts::default();
    }

    let mut ctx = RenderContext::begin(
        surface,
        frame.window_size,
        frame.scale,
        frame.rotation,
        frame.center,
    );
    let drawn = render_parts(&mut ctx, cache, parts, frame.mirrored);
    if debug_overlay {
        draw_debug_overlay(&mut ctx, parts, &drawn);
    }
    drawn
}

/// Lay out and draw parts inside an open context.
pub fn render_parts<S: DrawSurface + ?Sized>(
    ctx: &mut RenderContext<'_, S>,
    cache: &mut TransformCache,
    parts: &[&VisualPart],
    mirrored: bool,
) -> DrawnParts {
    match parts {
        [] => DrawnParts::default(),
        [part] => {
            let image = cache.resolve(
                &part.image,
                ctx.scale_factor * part.scale,
                ctx.rotation_angle,
                mirrored,
            );
            let size = Size::of_image(image.as_ref());
            let at = resolve_placement(part.placement, ctx.window_size, size);
            {
                let mut scope = ctx.scoped();
                scope.draw_image(at, &image);
            }
            DrawnParts {
                rects: SmallVec::from_elem(Rect::from_origin_size(at, size), 1),
            }
        }
        _ => render_row(ctx, cache, parts, mirrored),
    }
}

fn render_row<S: DrawSurface + ?Sized>(
    ctx: &mut RenderContext<'_, S>,
    cache: &mut TransformCache,
    parts: &[&VisualPart],
    mirrored: bool,
) -> DrawnParts {
    let sizes: SmallVec<[Size; 8]> = parts
        .iter()
        .map(|part| part.scaled_size(ctx.scale_factor))
        .collect();
    let positions = row_positions(&sizes, ctx.window_size);

    let mut scope = ctx.scoped();
    let mut rects: SmallVec<[Rect; 8]> = SmallVec::with_capacity(parts.len());
    for (part, slot) in parts.iter().zip(positions) {
        let image = cache.resolve(
            &part.image,
            scope.scale_factor * part.scale,
            scope.rotation_angle,
            mirrored,
        );
        let at = if part.placement.is_origin() {
            slot
        } else {
            part.placement
        };
        scope.draw_image(at, &image);
        rects.push(Rect::from_origin_size(at, Size::of_image(image.as_ref())));
    }

    DrawnParts { rects }
}

/// Part outlines, the rotated sprite frame and the rotation center.
fn draw_debug_overlay<S: DrawSurface + ?Sized>(
    ctx: &mut RenderContext<'_, S>,
    parts: &[&VisualPart],
    drawn: &DrawnParts,
) {
    let scale = ctx.scale_factor;
    let window = ctx.window_size;
    let center = ctx.center();

    for rect in &drawn.rects {
        ctx.stroke_rect(*rect, DEBUG_PART_COLOR);
    }

    // the unrotated footprint of the whole sprite, turned to the frame angle
    let footprint = Size::new(
        parts.iter().map(|p| p.scaled_size(scale).w).sum(),
        parts.iter().map(|p| p.scaled_size(scale).h).max().unwrap_or(0),
    );
    {
        let mut scope = ctx.scoped();
        scope.apply_rotation_about_center();
        let origin = centered_origin(window, footprint);
        scope.stroke_rect(Rect::from_origin_size(origin, footprint), DEBUG_FRAME_COLOR);
    }

    let half = CENTER_MARKER / 2;
    ctx.stroke_rect(
        Rect::new(center.x - half, center.y - half, CENTER_MARKER, CENTER_MARKER),
        DEBUG_PART_COLOR,
    );

    debug!(
        "debug overlay: rotation {} center ({}, {}) parts {}",
        ctx.rotation_angle,
        center.x,
        center.y,
        drawn.rects.len()
    );
}
