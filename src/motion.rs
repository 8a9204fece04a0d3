use std::time::Duration;

use crate::camera::Camera;
use crate::math::cell_of;
use crate::world::Grid;

/// The four logical actions, sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub move_forward: bool,
    pub move_backward: bool,
}

impl InputState {
    /// +1 for left, -1 for right, 0 when both or neither are held.
    fn turn_axis(self) -> f32 {
        self.rotate_left as i32 as f32 - self.rotate_right as i32 as f32
    }

    fn move_axis(self) -> f32 {
        self.move_forward as i32 as f32 - self.move_backward as i32 as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    pub move_speed: f32, // map units per second
    pub turn_speed: f32, // radians per second
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            turn_speed: 3.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionOutcome {
    pub rotated: bool,
    pub moved: bool,
    /// A move was requested but the target cell was not free.
    pub blocked: bool,
}

/// Elapsed frame time in seconds, capped so a stall does not teleport the
/// camera through walls.
pub fn clamp_elapsed(dt: Duration, max: Duration) -> f32 {
    dt.min(max).as_secs_f32()
}

/// Move `distance` along `dir` (negative backs up). The whole step is
/// rejected if it would end inside a wall or off the map; there is no sliding.
pub fn translate(camera: &mut Camera, grid: &Grid, distance: f32) -> bool {
    let candidate = camera.pos + camera.dir * distance;
    if !grid.is_free(cell_of(candidate)) {
        return false;
    }
    camera.pos = candidate;
    true
}

/// Apply one frame of input: turn first, then move.
pub fn step(
    camera: &mut Camera,
    grid: &Grid,
    input: InputState,
    config: &MotionConfig,
    dt: f32,
) -> MotionOutcome {
    let mut outcome = MotionOutcome::default();

    let turn = input.turn_axis();
    if turn != 0.0 && dt > 0.0 {
        camera.rotate(turn * config.turn_speed * dt);
        outcome.rotated = true;
    }

    let fwd = input.move_axis();
    if fwd != 0.0 && dt > 0.0 {
        if translate(camera, grid, fwd * config.move_speed * dt) {
            outcome.moved = true;
        } else {
            outcome.blocked = true;
        }
    }
    outcome
}
