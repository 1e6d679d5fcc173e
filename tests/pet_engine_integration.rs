//! Engine integration tests for the motion schedule, part syncing and painting.

use bevy_ecs::prelude::*;
use image::{Rgba, RgbaImage};

use trainpet::components::partorder::PartOrder;
use trainpet::components::visualpart::VisualPart;
use trainpet::engine::PetEngine;
use trainpet::geometry::{Point, Size};
use trainpet::render::canvas::Canvas;
use trainpet::resources::imagestore::{SourceImage, TrainAssets};
use trainpet::resources::layoutrefresh::LayoutRefresh;
use trainpet::resources::motionstate::{MotionState, corner_target};
use trainpet::resources::petconfig::{CropRects, MotionMode, PetConfig};
use trainpet::resources::petwindow::PetWindow;
use trainpet::resources::screensize::ScreenSize;
use trainpet::resources::transformcache::TransformKey;
use trainpet::systems::motion::{
    motion_transition_system, sync_parts_system, update_motion_system,
};

const SCREEN: ScreenSize = ScreenSize { w: 1000, h: 800 };
const MAX_TICKS: usize = 10_000;

fn solid(w: u32, h: u32, shade: u8) -> SourceImage {
    SourceImage::new(RgbaImage::from_pixel(w, h, Rgba([shade, shade, shade, 255])))
}

fn config(mode: MotionMode) -> PetConfig {
    let mut config = PetConfig::new();
    config.mode = mode;
    config.move_speed = 5;
    config.window_margin = 20;
    config.vertical_step = 50;
    config
}

/// A 40x40 window at the border start position, heading to corner 0.
fn border_engine(parts: Vec<SourceImage>) -> PetEngine {
    let config = config(MotionMode::Border);
    let size = Size::new(40, 40);
    let start = MotionState::start_position(MotionMode::Border, size, &SCREEN, 20);
    let window = PetWindow::new(start, size);
    PetEngine::with_window(
        config,
        SCREEN,
        window,
        parts,
        MotionState::Border { corner: 0 },
    )
}

fn tick_until_refresh(engine: &mut PetEngine) -> usize {
    for ticks in 1..=MAX_TICKS {
        engine.on_tick();
        if engine.take_refresh() {
            return ticks;
        }
    }
    panic!("no corner reached within {MAX_TICKS} ticks");
}

#[test]
fn border_loop_visits_every_corner_and_returns() {
    let mut engine = border_engine(vec![solid(40, 40, 10)]);
    assert_eq!(engine.window().pos, Point::new(940, 740));

    let ticks = tick_until_refresh(&mut engine);
    assert_eq!(ticks, 3);
    assert_eq!(engine.motion(), MotionState::Border { corner: 1 });
    assert_eq!(engine.rotation_angle(), 270.0);
    assert_eq!(engine.window().pos, Point::new(940, 760));

    for _ in 0..3 {
        tick_until_refresh(&mut engine);
    }
    // the fourth arrival lands on corner 3 and heads back to corner 0
    assert_eq!(engine.motion(), MotionState::Border { corner: 0 });
    assert_eq!(engine.rotation_angle(), 0.0);
    assert_eq!(engine.refresh_count(), 4);
    assert_eq!(
        engine.window().pos,
        corner_target(3, Size::new(40, 40), &SCREEN, 20)
    );

    tick_until_refresh(&mut engine);
    assert_eq!(engine.motion(), MotionState::Border { corner: 1 });
    assert_eq!(
        engine.window().pos,
        corner_target(0, Size::new(40, 40), &SCREEN, 20)
    );
}

#[test]
fn border_window_stays_on_screen() {
    let mut engine = border_engine(vec![solid(40, 40, 10)]);
    for _ in 0..2_000 {
        engine.on_tick();
        let window = engine.window();
        assert!(window.pos.x >= 0 && window.pos.x + window.width() <= SCREEN.w);
        assert!(window.pos.y >= 0 && window.pos.y + window.height() <= SCREEN.h);
    }
    assert!(engine.refresh_count() >= 4);
}

#[test]
fn sweep_bounces_descends_and_turns_around() {
    let screen = ScreenSize::new(200, 200);
    let window = PetWindow::new(Point::ORIGIN, Size::new(40, 40));
    let mut engine = PetEngine::with_window(
        config(MotionMode::Sweep),
        screen,
        window,
        vec![solid(40, 40, 10)],
        MotionState::initial(MotionMode::Sweep),
    );
    // native artwork faces left, so travelling right is mirrored
    assert!(engine.mirrored());

    for _ in 0..31 {
        engine.on_tick();
    }
    assert_eq!(engine.window().pos, Point::new(155, 0));

    engine.on_tick();
    assert_eq!(engine.window().pos.x, 160);
    assert_eq!(
        engine.motion(),
        MotionState::VerticalSweep {
            target_y: 50,
            moving_up: false,
            next_moving_right: false,
            row: 1,
        }
    );
    assert_eq!(engine.rotation_angle(), 90.0);

    for _ in 0..10 {
        engine.on_tick();
    }
    assert_eq!(engine.window().pos, Point::new(160, 50));
    assert_eq!(
        engine.motion(),
        MotionState::HorizontalSweep {
            moving_right: false,
            row: 1,
            pending_target: None,
        }
    );
    assert_eq!(engine.rotation_angle(), 0.0);
    assert!(!engine.mirrored());

    engine.on_tick();
    assert_eq!(engine.window().pos, Point::new(155, 50));
    assert_eq!(engine.refresh_count(), 0);
}

#[test]
fn sweep_wraps_to_the_top_row() {
    let screen = ScreenSize::new(100, 100);
    let window = PetWindow::new(Point::ORIGIN, Size::new(40, 40));
    let mut engine = PetEngine::with_window(
        config(MotionMode::Sweep),
        screen,
        window,
        vec![solid(40, 40, 10)],
        MotionState::initial(MotionMode::Sweep),
    );

    let mut saw_climb = false;
    for _ in 0..200 {
        engine.on_tick();
        if let MotionState::VerticalSweep { moving_up: true, .. } = engine.motion() {
            saw_climb = true;
            assert_eq!(engine.rotation_angle(), 270.0);
        }
        let window = engine.window();
        assert!(window.pos.y >= 0 && window.pos.y + window.height() <= 100);
    }
    assert!(saw_climb, "sweep never wrapped back to the top");
}

#[test]
fn every_part_follows_the_motion_state() {
    let mut engine = border_engine(vec![solid(20, 10, 10), solid(20, 10, 20), solid(20, 10, 30)]);
    tick_until_refresh(&mut engine);

    let parts = engine.parts();
    assert_eq!(parts.len(), 3);
    for part in &parts {
        assert_eq!(part.rotation, 270.0);
        assert!(part.mirrored);
    }
}

#[test]
fn painting_reuses_cached_transforms() {
    let assets = TrainAssets {
        head: solid(60, 30, 10),
        body: solid(50, 30, 20),
        tail: solid(40, 30, 30),
    };
    let mut config = config(MotionMode::Border);
    config.scale_factor = 0.5;
    let mut engine = PetEngine::from_assets(config, SCREEN, &assets, Some(2));
    assert_eq!(engine.parts().len(), 4);
    // square window around the 200x30 row at half scale
    assert_eq!(engine.window().size, Size::new(100, 100));

    let mut canvas = Canvas::new(engine.window().size);
    let drawn = engine.on_paint(&mut canvas);
    assert_eq!(drawn.rects.len(), 4);
    assert_eq!(canvas.depth(), 0);
    // head, shared body, tail
    assert_eq!(engine.cache().pipeline_runs(), 3);

    let mut canvas = Canvas::new(engine.window().size);
    engine.on_paint(&mut canvas);
    assert_eq!(engine.cache().pipeline_runs(), 3);
    assert_eq!(engine.cache().hits(), 4 + 4 - 3);

    engine.clear_cache();
    assert!(engine.cache().is_empty());
}

#[test]
fn debug_paint_leaves_surface_balanced() {
    let mut engine = border_engine(vec![solid(30, 10, 10), solid(30, 10, 20)]);
    engine.set_debug(true);
    tick_until_refresh(&mut engine);

    let mut canvas = Canvas::new(engine.window().size);
    let drawn = engine.on_paint(&mut canvas);
    assert_eq!(drawn.rects.len(), 2);
    assert_eq!(canvas.depth(), 0);
    for part in engine.parts() {
        let key = TransformKey::new(&part.image, 0.2, 270.0, true);
        assert!(engine.cache().contains(&key));
    }

    engine.set_debug(false);
    let mut canvas = Canvas::new(engine.window().size);
    engine.on_paint(&mut canvas);
    assert_eq!(canvas.depth(), 0);
}

#[test]
fn assets_cut_from_a_sheet_drive_the_engine() {
    let mut sheet = RgbaImage::new(30, 30);
    for (x, _, px) in sheet.enumerate_pixels_mut() {
        let shade = if x < 10 { 10 } else if x < 20 { 20 } else { 30 };
        *px = Rgba([shade, shade, shade, 255]);
    }
    let crops = CropRects {
        head: trainpet::geometry::Rect::new(0, 0, 10, 30),
        body: trainpet::geometry::Rect::new(10, 0, 10, 30),
        tail: trainpet::geometry::Rect::new(20, 0, 10, 30),
    };
    let assets = TrainAssets::from_sheet(&SourceImage::new(sheet), &crops).unwrap();

    let mut config = config(MotionMode::Border);
    config.scale_factor = 1.0;
    let mut engine = PetEngine::from_assets(config, SCREEN, &assets, Some(50));
    // clamped to the configured maximum
    let parts = engine.parts();
    assert_eq!(parts.len(), 12);
    assert_eq!(parts[0].image.id(), assets.head.id());
    assert_eq!(parts[11].image.id(), assets.tail.id());
}

#[test]
fn omitted_carriage_count_uses_the_configured_default() {
    let assets = TrainAssets {
        head: solid(30, 10, 10),
        body: solid(20, 10, 20),
        tail: solid(10, 10, 30),
    };
    let mut config = config(MotionMode::Border);
    config.default_carriages = 4;

    let mut engine = PetEngine::from_assets(config.clone(), SCREEN, &assets, None);
    let parts = engine.parts();
    assert_eq!(parts.len(), 6);
    assert_eq!(parts[0].image.id(), assets.head.id());
    assert_eq!(parts[5].image.id(), assets.tail.id());

    // a default outside the range is clamped like an explicit count
    config.default_carriages = 40;
    let mut engine = PetEngine::from_assets(config.clone(), SCREEN, &assets, None);
    assert_eq!(engine.parts().len(), config.max_carriages + 2);

    let mut engine = PetEngine::head_only(config, SCREEN, &assets);
    let parts = engine.parts();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].image.id(), assets.head.id());
}

#[test]
fn motion_systems_run_in_a_plain_schedule() {
    let mut world = World::new();
    let config = config(MotionMode::Border);
    let size = Size::new(40, 40);
    world.insert_resource(PetWindow::new(
        MotionState::start_position(MotionMode::Border, size, &SCREEN, 20),
        size,
    ));
    world.insert_resource(SCREEN);
    world.insert_resource(config);
    world.insert_resource(MotionState::Border { corner: 0 });
    world.insert_resource(LayoutRefresh::default());
    let part = world
        .spawn((PartOrder(0), VisualPart::new(solid(40, 40, 10))))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            update_motion_system,
            motion_transition_system,
            sync_parts_system,
        )
            .chain(),
    );
    for _ in 0..3 {
        schedule.run(&mut world);
    }

    assert_eq!(
        *world.resource::<MotionState>(),
        MotionState::Border { corner: 1 }
    );
    assert!(world.resource::<LayoutRefresh>().requested);
    assert_eq!(world.get::<VisualPart>(part).unwrap().rotation, 270.0);
}
