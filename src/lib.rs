//! Flat grid ray-caster.
//!
//! Projects a 2D occupancy grid into a first-person view by casting one ray
//! per screen column and stepping it through the grid with a DDA walk.
//! Window and input plumbing live in the binary; everything here is plain
//! data in, pixels out.

pub mod camera;
pub mod caster;
pub mod config;
pub mod math;
pub mod motion;
pub mod renderer;
pub mod scaler;
pub mod world;

pub use camera::Camera;
pub use caster::{CastError, ColumnSlice, Hit, Side};
pub use config::{Config, ConfigError};
pub use motion::{InputState, MotionConfig, MotionOutcome};
pub use renderer::SceneColors;
pub use world::{Grid, MapError};
