//! Render pass.
//!
//! Collects the visual parts from the ECS world in train order and hands
//! them to the composite renderer together with the transform cache.
//!
//! The composite renderer takes one rotation and one mirror flag per frame.
//! They are read from the lead part. `sync_parts_system` writes the same
//! motion-state values to every part each tick, so the per-part `rotation`
//! and `mirrored` fields are copies of the frame values, not independent
//! per-part transforms.

use bevy_ecs::prelude::*;

use crate::components::partorder::PartOrder;
use crate::components::visualpart::VisualPart;
use crate::render::composite::{DrawnParts, Frame, render};
use crate::render::surface::DrawSurface;
use crate::resources::debugmode::DebugMode;
use crate::resources::petconfig::PetConfig;
use crate::resources::petwindow::PetWindow;
use crate::resources::transformcache::TransformCache;

/// Draw every visual part into `surface`, sized to the pet window.
pub fn render_pass<S: DrawSurface + ?Sized>(world: &mut World, surface: &mut S) -> DrawnParts {
    let scale = world.resource::<PetConfig>().scale_factor;
    let window = *world.resource::<PetWindow>();
    let debug_overlay = world.contains_resource::<DebugMode>();

    let mut parts: Vec<(PartOrder, VisualPart)> = {
        let mut q = world.query::<(&PartOrder, &VisualPart)>();
        q.iter(world).map(|(o, p)| (*o, p.clone())).collect()
    };
    parts.sort_by_key(|(order, _)| *order);
    let refs: Vec<&VisualPart> = parts.iter().map(|(_, p)| p).collect();

    let (rotation, mirrored) = refs
        .first()
        .map(|lead| (lead.rotation, lead.mirrored))
        .unwrap_or((0.0, false));
    let frame = Frame {
        window_size: window.size,
        scale,
        rotation,
        center: Some(window.size.center()),
        mirrored,
    };

    world.resource_scope(|_, mut cache: Mut<TransformCache>| {
        render(surface, &mut cache, &refs, &frame, debug_overlay)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Size};
    use crate::render::canvas::Canvas;
    use crate::resources::imagestore::SourceImage;
    use crate::resources::transformcache::TransformKey;
    use image::{Rgba, RgbaImage};

    fn part(rotation: f32, mirrored: bool) -> VisualPart {
        let mut part = VisualPart::new(SourceImage::new(RgbaImage::from_pixel(
            8,
            4,
            Rgba([9, 9, 9, 255]),
        )));
        part.rotation = rotation;
        part.mirrored = mirrored;
        part
    }

    #[test]
    fn frame_transform_comes_from_the_lead_part() {
        let mut world = World::new();
        let mut config = PetConfig::new();
        config.scale_factor = 1.0;
        world.insert_resource(config);
        world.insert_resource(PetWindow::new(Point::ORIGIN, Size::new(40, 40)));
        world.insert_resource(TransformCache::unbounded());

        let lead = part(90.0, true);
        let trailing = part(0.0, false);
        let (lead_image, trailing_image) = (lead.image.clone(), trailing.image.clone());
        // spawned out of order; PartOrder decides which part leads
        world.spawn((PartOrder(1), trailing));
        world.spawn((PartOrder(0), lead));

        let mut canvas = Canvas::new(Size::new(40, 40));
        let drawn = render_pass(&mut world, &mut canvas);
        assert_eq!(drawn.rects.len(), 2);

        let cache = world.resource::<TransformCache>();
        for image in [&lead_image, &trailing_image] {
            assert!(cache.contains(&TransformKey::new(image, 1.0, 90.0, true)));
        }
        assert_eq!(cache.len(), 2);
    }
}
