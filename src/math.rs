//! Small vector helpers on top of glam.

pub use glam::{IVec2, Vec2, ivec2, vec2};

/// -1, 0 or +1 depending on the sign of `v`.
#[inline]
pub fn sign(v: f32) -> i32 {
    if v < 0.0 {
        -1
    } else if v > 0.0 {
        1
    } else {
        0
    }
}

/// Grid cell containing `p`.
#[inline]
pub fn cell_of(p: Vec2) -> IVec2 {
    p.floor().as_ivec2()
}

/// Rotate `v` by `angle` radians (positive = counter-clockwise).
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    vec2(v.x * c - v.y * s, v.x * s + v.y * c)
}
