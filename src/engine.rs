//! Pet engine.
//!
//! [`PetEngine`] owns the ECS world and the tick schedule. Hosts drive it
//! from a single thread:
//!
//! - [`PetEngine::on_tick`] at a fixed interval (about 60 Hz) advances the
//!   motion state and syncs the visual parts
//! - [`PetEngine::on_paint`] once per displayed frame draws the parts into a
//!   [`DrawSurface`]
//!
//! Every tick and paint leaves the world consistent, so stopping the host's
//! timer is all the teardown there is.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use log::info;

use crate::components::partorder::PartOrder;
use crate::components::visualpart::VisualPart;
use crate::geometry::Size;
use crate::render::composite::DrawnParts;
use crate::render::surface::DrawSurface;
use crate::resources::debugmode::DebugMode;
use crate::resources::imagestore::{SourceImage, TrainAssets};
use crate::resources::layoutrefresh::LayoutRefresh;
use crate::resources::motionstate::MotionState;
use crate::resources::petconfig::PetConfig;
use crate::resources::petwindow::PetWindow;
use crate::resources::screensize::ScreenSize;
use crate::resources::transformcache::TransformCache;
use crate::systems::motion::{motion_transition_system, sync_parts_system, update_motion_system};
use crate::systems::render::render_pass;

pub struct PetEngine {
    world: World,
    tick: Schedule,
}

/// Unscaled size of the parts laid out in a row.
fn footprint(parts: &[SourceImage]) -> Size {
    Size::new(
        parts.iter().map(|p| p.size().w).sum(),
        parts.iter().map(|p| p.size().h).max().unwrap_or(0),
    )
}

impl PetEngine {
    /// Build an engine for `parts`, listed head first.
    ///
    /// The pet window is fitted around the parts and placed at the motion
    /// mode's start position.
    pub fn new(config: PetConfig, screen: ScreenSize, parts: Vec<SourceImage>) -> Self {
        let state = MotionState::initial(config.mode);
        let mut window = PetWindow::fitted(Default::default(), footprint(&parts), config.scale_factor);
        window.move_to(MotionState::start_position(
            config.mode,
            window.size,
            &screen,
            config.window_margin,
        ));
        Self::with_window(config, screen, window, parts, state)
    }

    /// Build an engine from cropped train assets with `carriages` bodies,
    /// or the configured default for `None`. The count is clamped to the
    /// configured range.
    pub fn from_assets(
        config: PetConfig,
        screen: ScreenSize,
        assets: &TrainAssets,
        carriages: Option<usize>,
    ) -> Self {
        let count = config.clamp_carriages(carriages.unwrap_or(config.default_carriages));
        let parts = assets.parts(count);
        Self::new(config, screen, parts)
    }

    /// Build an engine that draws the head alone.
    pub fn head_only(config: PetConfig, screen: ScreenSize, assets: &TrainAssets) -> Self {
        let parts = assets.parts(0);
        Self::new(config, screen, parts)
    }

    /// Build an engine with an explicit window and initial state.
    pub fn with_window(
        config: PetConfig,
        screen: ScreenSize,
        window: PetWindow,
        parts: Vec<SourceImage>,
        state: MotionState,
    ) -> Self {
        let mut world = World::new();

        let rotation = state.rotation_angle(&config.angles);
        let mirrored = state.mirrored(config.native_facing);
        for (index, image) in parts.into_iter().enumerate() {
            let mut part = VisualPart::new(image);
            part.rotation = rotation;
            part.mirrored = mirrored;
            world.spawn((PartOrder(index as u32), part));
        }

        info!(
            "Pet engine: mode {}, screen {}x{}, window {}x{} at ({}, {})",
            config.mode, screen.w, screen.h, window.size.w, window.size.h, window.pos.x, window.pos.y
        );

        world.insert_resource(TransformCache::with_capacity(config.cache_capacity));
        world.insert_resource(config);
        world.insert_resource(screen);
        world.insert_resource(window);
        world.insert_resource(state);
        world.insert_resource(LayoutRefresh::default());

        let mut tick = Schedule::default();
        tick.set_executor_kind(ExecutorKind::SingleThreaded);
        tick.add_systems(
            (
                update_motion_system,
                motion_transition_system,
                sync_parts_system,
            )
                .chain(),
        );

        Self { world, tick }
    }

    /// Advance one tick: move, transition, sync parts.
    pub fn on_tick(&mut self) {
        self.tick.run(&mut self.world);
    }

    /// Draw the current frame into `surface`.
    pub fn on_paint<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> DrawnParts {
        render_pass(&mut self.world, surface)
    }

    pub fn motion(&self) -> MotionState {
        *self.world.resource::<MotionState>()
    }

    pub fn window(&self) -> PetWindow {
        *self.world.resource::<PetWindow>()
    }

    pub fn config(&self) -> &PetConfig {
        self.world.resource::<PetConfig>()
    }

    /// Current facing angle in degrees.
    pub fn rotation_angle(&self) -> f32 {
        self.motion().rotation_angle(&self.config().angles)
    }

    pub fn mirrored(&self) -> bool {
        self.motion().mirrored(self.config().native_facing)
    }

    /// Visual parts in train order.
    pub fn parts(&mut self) -> Vec<VisualPart> {
        let mut q = self.world.query::<(&PartOrder, &VisualPart)>();
        let mut parts: Vec<(PartOrder, VisualPart)> =
            q.iter(&self.world).map(|(o, p)| (*o, p.clone())).collect();
        parts.sort_by_key(|(order, _)| *order);
        parts.into_iter().map(|(_, p)| p).collect()
    }

    /// The screen changed size, e.g. the pet moved to another monitor.
    pub fn set_screen_size(&mut self, screen: ScreenSize) {
        info!("Screen resized to {}x{}", screen.w, screen.h);
        self.world.insert_resource(screen);
    }

    /// Whether a layout refresh was raised since the last call.
    pub fn take_refresh(&mut self) -> bool {
        self.world.resource_mut::<LayoutRefresh>().take()
    }

    pub fn refresh_count(&self) -> u64 {
        self.world.resource::<LayoutRefresh>().count
    }

    pub fn set_debug(&mut self, enabled: bool) {
        if enabled {
            self.world.insert_resource(DebugMode {});
        } else {
            self.world.remove_resource::<DebugMode>();
        }
    }

    pub fn cache(&self) -> &TransformCache {
        self.world.resource::<TransformCache>()
    }

    pub fn clear_cache(&mut self) {
        self.world.resource_mut::<TransformCache>().clear();
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
