//! Motion state machine.
//!
//! [`MotionState`] is the single installed resource deciding where the pet
//! window moves each tick and which way the sprite faces. It is a closed
//! enum: the tick schedule calls [`MotionState::update_position`] and then
//! [`MotionState::next_state`], replacing the resource when a transition is
//! returned.
//!
//! Border-following walks the four screen corners in the order
//! bottom-right → top-right → top-left → bottom-left, keeping the sprite's
//! bottom flush against the edge it runs along. The sweep modes bounce the
//! pet horizontally across the screen and step it down one row per bounce.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::geometry::Point;
use crate::geometry::Size;
use crate::resources::petconfig::{Facing, MotionMode, PetConfig, RotationAngles};
use crate::resources::petwindow::PetWindow;
use crate::resources::screensize::ScreenSize;

/// Number of corners visited by the border-following state.
pub const CORNER_COUNT: u8 = 4;

/// The screen edge the sprite's bottom rests on while heading to a corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Bottom,
    Right,
    Top,
    Left,
}

impl Edge {
    /// Edge followed on the way into `corner`.
    pub fn for_corner(corner: u8) -> Edge {
        match corner % CORNER_COUNT {
            0 => Edge::Bottom,
            1 => Edge::Right,
            2 => Edge::Top,
            _ => Edge::Left,
        }
    }

    pub fn angle(self, angles: &RotationAngles) -> f32 {
        match self {
            Edge::Bottom => angles.bottom,
            Edge::Right => angles.right,
            Edge::Top => angles.top,
            Edge::Left => angles.left,
        }
    }
}

#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MotionState {
    /// Heading for `corner` (0 bottom-right, 1 top-right, 2 top-left,
    /// 3 bottom-left).
    Border { corner: u8 },
    /// Moving across the screen. `pending_target` is set on the tick the
    /// window bounced off an edge and holds the next row's `y`.
    HorizontalSweep {
        moving_right: bool,
        row: i32,
        pending_target: Option<i32>,
    },
    /// Stepping to the next row; resumes horizontal motion towards
    /// `next_moving_right` on arrival.
    VerticalSweep {
        target_y: i32,
        moving_up: bool,
        next_moving_right: bool,
        row: i32,
    },
}

/// Target position for the window when heading to `corner`.
///
/// One axis is flush with the screen edge the sprite runs along, the other
/// keeps `margin` pixels from the perpendicular edge.
pub fn corner_target(corner: u8, window: Size, screen: &ScreenSize, margin: i32) -> Point {
    match corner % CORNER_COUNT {
        0 => Point::new(screen.w - window.w - margin, screen.h - window.h),
        1 => Point::new(screen.w - window.w, margin),
        2 => Point::new(margin, 0),
        _ => Point::new(0, screen.h - window.h - margin),
    }
}

/// Per-tick step towards `target`.
///
/// The dominant axis moves a full `speed`; the other axis moves
/// proportionally so the path is a straight line.
pub fn border_step(current: Point, target: Point, speed: i32) -> (i32, i32) {
    let dx = target.x - current.x;
    let dy = target.y - current.y;
    if dx.abs() > dy.abs() {
        let step_y = (dy as f32 * speed as f32 / dx.abs() as f32).round() as i32;
        (speed * dx.signum(), step_y)
    } else if dy != 0 {
        let step_x = (dx as f32 * speed as f32 / dy.abs() as f32).round() as i32;
        (step_x, speed * dy.signum())
    } else {
        (0, 0)
    }
}

/// True when `pos` is within `tolerance` pixels of `target` on both axes.
pub fn is_at_target(pos: Point, target: Point, tolerance: i32) -> bool {
    (pos.x - target.x).abs() <= tolerance && (pos.y - target.y).abs() <= tolerance
}

/// Row target after a horizontal bounce, wrapping to the top row when the
/// next row would not fit on screen. Returns `(row, target_y)`.
pub fn next_row(row: i32, vertical_step: i32, screen: &ScreenSize, window: Size) -> (i32, i32) {
    let row = row + 1;
    let target = row * vertical_step;
    if target >= screen.h - window.h {
        (0, 0)
    } else {
        (row, target)
    }
}

impl MotionState {
    /// Initial state for a motion mode.
    pub fn initial(mode: MotionMode) -> Self {
        match mode {
            MotionMode::Border => MotionState::Border { corner: 0 },
            MotionMode::Sweep => MotionState::HorizontalSweep {
                moving_right: true,
                row: 0,
                pending_target: None,
            },
        }
    }

    /// Where a freshly created window starts for a motion mode.
    pub fn start_position(mode: MotionMode, window: Size, screen: &ScreenSize, margin: i32) -> Point {
        match mode {
            MotionMode::Border => {
                Point::new(screen.w - window.w - margin, screen.h - window.h - margin)
            }
            MotionMode::Sweep => Point::ORIGIN,
        }
    }

    /// Move the window one tick.
    ///
    /// Returns `true` when the border state reached its corner; the window
    /// has then been refitted and snapped exactly onto the corner target, and
    /// the caller should raise a layout refresh.
    pub fn update_position(
        &mut self,
        window: &mut PetWindow,
        screen: &ScreenSize,
        config: &PetConfig,
    ) -> bool {
        let speed = config.move_speed;
        match self {
            MotionState::Border { corner } => {
                let target = corner_target(*corner, window.size, screen, config.window_margin);
                let (step_x, step_y) = border_step(window.pos, target, speed);
                let candidate = window.pos.offset(step_x, step_y);
                if is_at_target(candidate, target, speed) {
                    *corner = (*corner + 1) % CORNER_COUNT;
                    window.refit();
                    window.move_to(target);
                    true
                } else {
                    window.move_to(candidate);
                    false
                }
            }
            MotionState::HorizontalSweep {
                moving_right,
                row,
                pending_target,
            } => {
                let right_edge = screen.w - window.width();
                let mut x = window.pos.x;
                let bounced = if *moving_right {
                    x += speed;
                    if x >= right_edge {
                        x = right_edge;
                        true
                    } else {
                        false
                    }
                } else {
                    x -= speed;
                    if x <= 0 {
                        x = 0;
                        true
                    } else {
                        false
                    }
                };
                if bounced {
                    *moving_right = !*moving_right;
                    let (new_row, target) =
                        next_row(*row, config.vertical_step, screen, window.size);
                    *row = new_row;
                    *pending_target = Some(target);
                }
                window.move_to(Point::new(x, window.pos.y));
                false
            }
            MotionState::VerticalSweep {
                target_y,
                moving_up,
                ..
            } => {
                let mut y = window.pos.y;
                if *moving_up {
                    y = (y - speed).max(*target_y);
                } else {
                    y = (y + speed).min(*target_y);
                }
                window.move_to(Point::new(window.pos.x, y));
                false
            }
        }
    }

    /// Successor state, if this state is finished.
    ///
    /// Called once per tick after [`update_position`](Self::update_position).
    pub fn next_state(&self, window: &PetWindow) -> Option<MotionState> {
        match *self {
            MotionState::Border { .. } => None,
            MotionState::HorizontalSweep {
                moving_right,
                row,
                pending_target,
            } => pending_target.map(|target_y| MotionState::VerticalSweep {
                target_y,
                moving_up: window.pos.y > target_y,
                next_moving_right: moving_right,
                row,
            }),
            MotionState::VerticalSweep {
                target_y,
                moving_up,
                next_moving_right,
                row,
            } => {
                let y = window.pos.y;
                let arrived = (moving_up && y <= target_y) || (!moving_up && y >= target_y);
                arrived.then_some(MotionState::HorizontalSweep {
                    moving_right: next_moving_right,
                    row,
                    pending_target: None,
                })
            }
        }
    }

    /// Current facing angle in degrees.
    pub fn rotation_angle(&self, angles: &RotationAngles) -> f32 {
        match *self {
            MotionState::Border { corner } => Edge::for_corner(corner).angle(angles),
            MotionState::HorizontalSweep { .. } => angles.level,
            MotionState::VerticalSweep { moving_up, .. } => {
                if moving_up {
                    angles.climb
                } else {
                    angles.descend
                }
            }
        }
    }

    /// Whether travel points along the rotated sprite's local +x axis.
    ///
    /// With the default angle tables the border loop and both vertical
    /// directions always travel towards local +x; only a left-moving
    /// horizontal sweep travels towards local -x.
    pub fn heading_right(&self) -> bool {
        match *self {
            MotionState::Border { .. } => true,
            MotionState::HorizontalSweep { moving_right, .. } => moving_right,
            MotionState::VerticalSweep { .. } => true,
        }
    }

    /// Whether the artwork must be mirrored to face the direction of travel.
    pub fn mirrored(&self, native: Facing) -> bool {
        match native {
            Facing::Left => self.heading_right(),
            Facing::Right => !self.heading_right(),
        }
    }

    /// Border corner index, if border-following.
    pub fn corner(&self) -> Option<u8> {
        match *self {
            MotionState::Border { corner } => Some(corner),
            _ => None,
        }
    }
}
