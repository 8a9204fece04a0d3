use std::time::Duration;

use glam::{Vec2, vec2};
use thiserror::Error;

use crate::camera::Camera;
use crate::math::cell_of;
use crate::motion::MotionConfig;
use crate::renderer::SceneColors;
use crate::world::Grid;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("internal resolution {width}x{height} has a zero dimension")]
    ZeroResolution { width: usize, height: usize },

    #[error("horizontal FoV {0} deg must be inside (0, 180)")]
    BadFov(f32),

    #[error("{name} must be positive and finite, got {value}")]
    BadSpeed { name: &'static str, value: f32 },

    #[error("facing {0} is not a usable direction")]
    BadFacing(Vec2),

    #[error("spawn point {0} is not on a free cell")]
    SpawnBlocked(Vec2),
}

/// Everything the viewer needs to start. There is no file or CLI layer;
/// tweak the defaults.
#[derive(Clone, Debug)]
pub struct Config {
    pub title: &'static str,
    /// Internal render target; stretched to the window on present.
    pub width: usize,
    pub height: usize,
    pub window_width: f64,
    pub window_height: f64,

    pub spawn: Vec2,
    pub facing: Vec2,
    pub fov_x_deg: f32,

    pub motion: MotionConfig,
    pub max_frame_dt: Duration,
    pub scene: SceneColors,

    /// Show buffer row 0 at the bottom of the window.
    pub present_flipped: bool,
    pub fps_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "flatcaster",
            width: 640,
            height: 480,
            window_width: 1280.0,
            window_height: 720.0,

            spawn: vec2(2.0, 2.0),
            facing: vec2(-1.0, 0.1),
            // plane length 0.66
            fov_x_deg: (2.0 * 0.66_f32.atan()).to_degrees(),

            motion: MotionConfig::default(),
            max_frame_dt: Duration::from_millis(100),
            scene: SceneColors::default(),

            present_flipped: false,
            fps_interval: Duration::from_secs(1),
        }
    }
}

impl Config {
    pub fn validate(&self, grid: &Grid) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroResolution {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.fov_x_deg > 0.0 && self.fov_x_deg < 180.0) {
            return Err(ConfigError::BadFov(self.fov_x_deg));
        }
        if !self.facing.is_finite() || self.facing.length_squared() < f32::EPSILON {
            return Err(ConfigError::BadFacing(self.facing));
        }
        for (name, value) in [
            ("move_speed", self.motion.move_speed),
            ("turn_speed", self.motion.turn_speed),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::BadSpeed { name, value });
            }
        }
        if !grid.is_free(cell_of(self.spawn)) {
            return Err(ConfigError::SpawnBlocked(self.spawn));
        }
        Ok(())
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.spawn, self.facing, self.fov_x_deg)
    }
}
