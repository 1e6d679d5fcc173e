//! Motion tick systems.
//!
//! Run once per tick, chained in this order:
//! 1. [`update_motion_system`] moves the pet window
//! 2. [`motion_transition_system`] swaps in the successor state, if any
//! 3. [`sync_parts_system`] writes the new rotation and mirroring to every
//!    visual part
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::visualpart::VisualPart;
use crate::resources::layoutrefresh::LayoutRefresh;
use crate::resources::motionstate::MotionState;
use crate::resources::petconfig::PetConfig;
use crate::resources::petwindow::PetWindow;
use crate::resources::screensize::ScreenSize;

pub fn update_motion_system(
    mut state: ResMut<MotionState>,
    mut window: ResMut<PetWindow>,
    screen: Res<ScreenSize>,
    config: Res<PetConfig>,
    mut refresh: ResMut<LayoutRefresh>,
) {
    if state.update_position(&mut window, &screen, &config) {
        refresh.request();
        info!(
            "Reached corner at ({}, {}), heading to corner {:?}",
            window.pos.x,
            window.pos.y,
            state.corner()
        );
    }
}

pub fn motion_transition_system(mut state: ResMut<MotionState>, window: Res<PetWindow>) {
    if let Some(next) = state.next_state(&window) {
        debug!("Motion transition {:?} -> {:?}", *state, next);
        *state = next;
    }
}

pub fn sync_parts_system(
    state: Res<MotionState>,
    config: Res<PetConfig>,
    mut parts: Query<&mut VisualPart>,
) {
    let rotation = state.rotation_angle(&config.angles);
    let mirrored = state.mirrored(config.native_facing);
    for mut part in parts.iter_mut() {
        if part.rotation != rotation {
            debug!("Part rotation {} -> {}", part.rotation, rotation);
            part.rotation = rotation;
        }
        if part.mirrored != mirrored {
            part.mirrored = mirrored;
        }
    }
}
