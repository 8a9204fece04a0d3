use glam::Vec2;

use crate::math::rotate;

/// First-person view: where we stand, where we look, and how wide.
///
/// `plane` spans the screen from its centre to the right edge, so its length
/// is `tan(fov / 2)` relative to a unit `dir`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub dir: Vec2,
    pub plane: Vec2,
}

impl Camera {
    /// Camera at `pos` looking along `facing`, with horizontal FoV `fov_x_deg`.
    pub fn new(pos: Vec2, facing: Vec2, fov_x_deg: f32) -> Self {
        let dir = facing.normalize_or(Vec2::X);
        let mut cam = Self {
            pos,
            dir,
            plane: Vec2::ZERO,
        };
        cam.set_fov_from_horizontal(fov_x_deg);
        cam
    }

    /// Explicit basis, for when `plane` is not exactly perpendicular to `dir`.
    pub fn from_basis(pos: Vec2, dir: Vec2, plane: Vec2) -> Self {
        Self { pos, dir, plane }
    }

    pub fn set_fov_from_horizontal(&mut self, fov_x_deg: f32) {
        let half = 0.5 * fov_x_deg.to_radians();
        // right-hand perpendicular of dir in a y-down map
        self.plane = Vec2::new(self.dir.y, -self.dir.x) * half.tan();
    }

    /// Horizontal field of view in degrees implied by the current basis.
    pub fn fov_x_deg(&self) -> f32 {
        let ratio = self.plane.length() / self.dir.length();
        (2.0 * ratio.atan()).to_degrees()
    }

    /// Ray direction through screen column `camera_x` in `[-1, 1)`.
    #[inline]
    pub fn ray_dir(&self, camera_x: f32) -> Vec2 {
        self.dir + self.plane * camera_x
    }

    /// Turn `dir` and `plane` together; positive is counter-clockwise.
    pub fn rotate(&mut self, angle: f32) {
        self.dir = rotate(self.dir, angle);
        self.plane = rotate(self.plane, angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn plane_is_perpendicular_and_scaled() {
        let cam = Camera::new(Vec2::ZERO, vec2(-1.0, 0.0), 90.0);
        assert!(cam.dir.dot(cam.plane).abs() < 1e-6);
        assert!((cam.plane.length() - 1.0).abs() < 1e-5);
        assert!((cam.plane - vec2(0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn fov_round_trips() {
        let cam = Camera::new(Vec2::ZERO, vec2(0.3, -0.7), 66.0);
        assert!((cam.fov_x_deg() - 66.0).abs() < 1e-3);
    }

    #[test]
    fn rotation_round_trip_restores_basis() {
        let start = Camera::from_basis(
            vec2(2.0, 2.0),
            vec2(-1.0, 0.1).normalize(),
            vec2(0.0, 0.66),
        );
        let mut cam = start;
        for theta in [0.016_f32, 0.5, -1.3, 3.0] {
            cam.rotate(theta);
            cam.rotate(-theta);
            assert!((cam.dir - start.dir).length() < 1e-5);
            assert!((cam.plane - start.plane).length() < 1e-5);
        }
        assert_eq!(cam.pos, start.pos);
    }

    #[test]
    fn rotation_keeps_basis_angle() {
        let mut cam = Camera::new(Vec2::ZERO, Vec2::X, 70.0);
        let before = cam.dir.dot(cam.plane);
        cam.rotate(1.1);
        assert!((cam.dir.dot(cam.plane) - before).abs() < 1e-6);
        assert!((cam.dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn centre_ray_is_dir() {
        let cam = Camera::new(Vec2::ZERO, vec2(0.0, 1.0), 60.0);
        assert_eq!(cam.ray_dir(0.0), cam.dir);
    }
}
