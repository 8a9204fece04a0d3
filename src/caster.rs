//! Per-column ray casting.
//!
//! Each screen column gets one ray `dir + plane * camera_x`. The ray walks the
//! grid one cell boundary at a time (DDA) until it enters a wall cell. The
//! distance used for projection is measured along the camera's forward axis,
//! not along the ray, which keeps straight walls straight.

use glam::{IVec2, Vec2, ivec2};
use log::warn;
use thiserror::Error;

use crate::camera::Camera;
use crate::math::{cell_of, sign};
use crate::renderer::wall_color;
use crate::world::Grid;

/// Below this a ray component counts as parallel to the axis.
const PARALLEL_EPS: f32 = 1e-20;
/// Stand-in for `1 / 0` on a parallel axis.
const FAR: f32 = 1e30;
/// Floor for the projected distance; keeps column heights finite.
pub const MIN_PERP_DIST: f32 = 1e-4;

#[derive(Debug, Error, PartialEq)]
pub enum CastError {
    #[error("ray origin {origin} is outside the {size}x{size} map")]
    OriginOutside { origin: Vec2, size: usize },

    #[error("ray left the map at cell {cell}; the map border is not solid")]
    LeftGrid { cell: IVec2 },

    #[error("ray did not hit a wall within {limit} steps")]
    Unterminated { limit: usize },
}

/// Which family of grid lines the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Crossed a vertical line (x changed); "side 0".
    X,
    /// Crossed a horizontal line (y changed); "side 1", drawn darker.
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub cell: IVec2,
    pub tag: u8,
    pub side: Side,
    pub perp_dist: f32,
    pub steps: usize,
}

/// Traversal state of one ray.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub dir: Vec2,
    cell: IVec2,
    step: IVec2,
    side_dist: Vec2,
    delta_dist: Vec2,
}

impl Ray {
    pub fn new(origin: Vec2, dir: Vec2) -> Self {
        let cell = cell_of(origin);

        let delta = |d: f32| if d.abs() < PARALLEL_EPS { FAR } else { (1.0 / d).abs() };
        let delta_dist = Vec2::new(delta(dir.x), delta(dir.y));

        let side = |d: f32, p: f32, c: i32, dd: f32| {
            if d < 0.0 {
                (p - c as f32) * dd
            } else {
                (c as f32 + 1.0 - p) * dd
            }
        };
        let side_dist = Vec2::new(
            side(dir.x, origin.x, cell.x, delta_dist.x),
            side(dir.y, origin.y, cell.y, delta_dist.y),
        );

        Self {
            dir,
            cell,
            step: ivec2(sign(dir.x), sign(dir.y)),
            side_dist,
            delta_dist,
        }
    }

    /// Move to the next cell boundary along whichever axis is nearer.
    #[inline]
    fn advance(&mut self) -> Side {
        if self.side_dist.x < self.side_dist.y {
            self.side_dist.x += self.delta_dist.x;
            self.cell.x += self.step.x;
            Side::X
        } else {
            self.side_dist.y += self.delta_dist.y;
            self.cell.y += self.step.y;
            Side::Y
        }
    }

    /// Walk until a wall cell. Gives up after `2 * N` steps, which is more than
    /// any ray from inside a closed `N x N` map needs.
    pub fn cast(mut self, grid: &Grid) -> Result<Hit, CastError> {
        let limit = 2 * grid.size();

        for steps in 1..=limit {
            let side = self.advance();
            let Some(tag) = grid.tag(self.cell) else {
                warn!("ray along {} left the map at {}", self.dir, self.cell);
                return Err(CastError::LeftGrid { cell: self.cell });
            };
            if tag == 0 {
                continue;
            }

            let raw = match side {
                Side::X => self.side_dist.x - self.delta_dist.x,
                Side::Y => self.side_dist.y - self.delta_dist.y,
            };
            return Ok(Hit {
                cell: self.cell,
                tag,
                side,
                perp_dist: raw.max(MIN_PERP_DIST),
                steps,
            });
        }
        warn!("ray along {} stuck at {} after {limit} steps", self.dir, self.cell);
        Err(CastError::Unterminated { limit })
    }
}

/// Cast from `origin` along `dir` (need not be normalised).
pub fn cast_ray(grid: &Grid, origin: Vec2, dir: Vec2) -> Result<Hit, CastError> {
    if grid.tag(cell_of(origin)).is_none() {
        return Err(CastError::OriginOutside {
            origin,
            size: grid.size(),
        });
    }
    Ray::new(origin, dir).cast(grid)
}

/// Vertical wall slice for one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSlice {
    pub line_height: i32,
    pub draw_start: i32,
    pub draw_end: i32,
    pub color: u32,
    pub hit: Hit,
}

/// Projected height and clamped `[start, end]` rows for a wall at `perp_dist`.
/// A zero-height target gives the empty run `(0, 0, -1)`.
pub fn project(perp_dist: f32, height: usize) -> (i32, i32, i32) {
    if height == 0 {
        return (0, 0, -1);
    }
    let h = height as i32;
    // `as` saturates, so a tiny distance gives i32::MAX rather than garbage.
    let line_height = (height as f32 / perp_dist.max(MIN_PERP_DIST)) as i32;
    let draw_start = (h / 2 - line_height / 2).clamp(0, h - 1);
    let draw_end = (h / 2 + line_height / 2).clamp(0, h - 1);
    (line_height, draw_start, draw_end)
}

/// Normalised screen coordinate of column `x`: -1 at the left edge.
#[inline]
pub fn camera_x(x: usize, width: usize) -> f32 {
    2.0 * x as f32 / width as f32 - 1.0
}

pub fn cast_column(
    camera: &Camera,
    grid: &Grid,
    x: usize,
    width: usize,
    height: usize,
) -> Result<ColumnSlice, CastError> {
    let ray_dir = camera.ray_dir(camera_x(x, width));
    let hit = cast_ray(grid, camera.pos, ray_dir)?;
    let (line_height, draw_start, draw_end) = project(hit.perp_dist, height);

    Ok(ColumnSlice {
        line_height,
        draw_start,
        draw_end,
        color: wall_color(hit.tag, hit.side),
        hit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ROOM_8, ROOM_12};
    use glam::vec2;

    fn room8() -> Grid {
        Grid::new(&ROOM_8).unwrap()
    }

    #[test]
    fn straight_east_hits_border() {
        let grid = Grid::new(&ROOM_12).unwrap();
        let hit = cast_ray(&grid, vec2(1.5, 1.5), Vec2::X).unwrap();
        assert_eq!(hit.cell, ivec2(11, 1));
        assert_eq!(hit.side, Side::X);
        assert_eq!(hit.tag, 1);
        // wall face at x = 11
        assert!((hit.perp_dist - 9.5).abs() < 1e-5);
    }

    #[test]
    fn straight_north_hits_on_y_side() {
        let grid = room8();
        let hit = cast_ray(&grid, vec2(2.5, 3.5), vec2(0.0, -1.0)).unwrap();
        assert_eq!(hit.cell, ivec2(2, 0));
        assert_eq!(hit.side, Side::Y);
        assert!((hit.perp_dist - 2.5).abs() < 1e-5);
    }

    #[test]
    fn origin_on_grid_line_steps_immediately() {
        let grid = room8();
        // x = 2.0 exactly: side_dist.x starts at zero
        let ray = Ray::new(vec2(2.0, 2.5), vec2(-1.0, 0.0));
        assert_eq!(ray.side_dist.x, 0.0);
        let hit = ray.cast(&grid).unwrap();
        assert_eq!(hit.cell, ivec2(0, 2));
        assert!((hit.perp_dist - 1.0).abs() < 1e-5);
    }

    #[test]
    fn parallel_axis_uses_sentinel() {
        let ray = Ray::new(vec2(3.5, 3.5), vec2(1.0, 0.0));
        assert_eq!(ray.delta_dist.y, FAR);
        assert_eq!(ray.step, ivec2(1, 0));
    }

    #[test]
    fn perp_dist_never_below_floor() {
        let grid = room8();
        // hugging the west wall, looking into it
        let hit = cast_ray(&grid, vec2(1.0 + 1e-7, 2.5), vec2(-1.0, 0.0)).unwrap();
        assert!(hit.perp_dist >= MIN_PERP_DIST);
        let (lh, start, end) = project(hit.perp_dist, 480);
        assert!(lh >= 0);
        assert_eq!((start, end), (0, 479));
    }

    #[test]
    fn project_centres_the_slice() {
        assert_eq!(project(2.0, 480), (240, 120, 360));
        assert_eq!(project(1000.0, 480), (0, 240, 240));
        let (lh, s, e) = project(0.0, 480);
        assert!(lh > 0);
        assert_eq!((s, e), (0, 479));
    }

    #[test]
    fn terminates_within_bound_for_all_directions() {
        let grid = Grid::new(&ROOM_12).unwrap();
        let origins = [vec2(1.5, 1.5), vec2(5.25, 7.75), vec2(10.9, 10.1), vec2(6.0, 6.0)];
        for origin in origins {
            for i in 0..720 {
                let a = (i as f32) * std::f32::consts::TAU / 720.0;
                let dir = vec2(a.cos(), a.sin());
                let hit = cast_ray(&grid, origin, dir).unwrap();
                assert!(hit.steps <= 2 * grid.size());
                assert!(hit.perp_dist.is_finite());
                assert!(hit.perp_dist >= MIN_PERP_DIST);
            }
        }
    }

    #[test]
    fn open_map_is_an_error_not_a_hang() {
        static OPEN: [u8; 16] = [0; 16];
        let grid = Grid::unchecked(&OPEN).unwrap();
        let err = cast_ray(&grid, vec2(1.5, 1.5), vec2(1.0, 0.3)).unwrap_err();
        assert!(matches!(err, CastError::LeftGrid { .. }));
    }

    #[test]
    fn zero_direction_hits_step_limit() {
        let grid = room8();
        let err = cast_ray(&grid, vec2(2.5, 2.5), Vec2::ZERO).unwrap_err();
        assert_eq!(err, CastError::Unterminated { limit: 2 * grid.size() });

        let cam = Camera::from_basis(vec2(2.5, 2.5), Vec2::ZERO, Vec2::ZERO);
        assert_eq!(
            cast_column(&cam, &grid, 320, 640, 480).unwrap_err(),
            CastError::Unterminated { limit: 16 }
        );
    }

    #[test]
    fn zero_height_projects_to_empty_run() {
        assert_eq!(project(1.0, 0), (0, 0, -1));
        assert_eq!(project(0.0, 0), (0, 0, -1));
        assert_eq!(project(1.0, 1), (1, 0, 0));
    }

    #[test]
    fn origin_outside_is_rejected() {
        let grid = room8();
        let err = cast_ray(&grid, vec2(-0.5, 3.0), Vec2::X).unwrap_err();
        assert_eq!(
            err,
            CastError::OriginOutside {
                origin: vec2(-0.5, 3.0),
                size: 8
            }
        );
    }

    #[test]
    fn column_zero_looks_left_of_dir() {
        let cam = Camera::from_basis(vec2(4.5, 2.5), vec2(0.0, 1.0), vec2(-0.66, 0.0));
        assert_eq!(camera_x(0, 640), -1.0);
        assert_eq!(camera_x(320, 640), 0.0);
        let left = cam.ray_dir(camera_x(0, 640));
        assert!((left - vec2(0.66, 1.0)).length() < 1e-6);
        let slice = cast_column(&cam, &room8(), 0, 640, 480).unwrap();
        assert!(slice.draw_start <= slice.draw_end);
    }
}
