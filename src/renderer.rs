use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::caster::{CastError, ColumnSlice, Side, cast_column};
use crate::{camera::Camera, world::Grid};

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // 0RGB, what softbuffer expects
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

pub const RED: u32 = pack_rgb(255, 0, 0);
pub const GREEN: u32 = pack_rgb(0, 255, 0);
pub const BLUE: u32 = pack_rgb(0, 0, 255);
pub const YELLOW: u32 = pack_rgb(255, 255, 0);
pub const WHITE: u32 = pack_rgb(255, 255, 255);

/// Halve every channel. The mask drops the bit that would bleed into the
/// channel below.
#[inline]
pub const fn darken(color: u32) -> u32 {
    (color >> 1) & 0x007F_7F7F
}

/// Palette entry for a wall tag, darkened on Y-side hits.
pub fn wall_color(tag: u8, side: Side) -> u32 {
    let base = match tag {
        1 => RED,
        2 => GREEN,
        3 => BLUE,
        4 => YELLOW,
        _ => WHITE,
    };
    match side {
        Side::X => base,
        Side::Y => darken(base),
    }
}

/// Flat fills above and below the wall slices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneColors {
    pub ceiling: u32,
    pub floor: u32,
}

impl Default for SceneColors {
    fn default() -> Self {
        Self {
            ceiling: pack_rgb(30, 30, 70),
            floor: pack_rgb(40, 40, 40),
        }
    }
}

/// Paint rows `y_start..=y_end` of column `x`. Callers clamp; an empty range
/// (`y_start > y_end`) draws nothing.
#[inline]
pub fn fill_column_run(
    buf: &mut [u32],
    width: usize,
    x: usize,
    y_start: i32,
    y_end: i32,
    color: u32,
) {
    if y_start > y_end {
        return;
    }
    let mut idx = y_start as usize * width + x;
    for _y in y_start..=y_end {
        buf[idx] = color;
        idx += width;
    }
}

/// Cast every column. Columns only read the camera and grid, so they run in
/// parallel; the result is ordered by column.
pub fn cast_columns(
    width: usize,
    height: usize,
    grid: &Grid,
    camera: &Camera,
) -> Result<Vec<ColumnSlice>, CastError> {
    (0..width)
        .into_par_iter()
        .map(|x| cast_column(camera, grid, x, width, height))
        .collect()
}

pub fn draw_column(
    buf: &mut [u32],
    width: usize,
    height: usize,
    x: usize,
    slice: &ColumnSlice,
    scene: &SceneColors,
) {
    let last = height as i32 - 1;
    fill_column_run(buf, width, x, 0, slice.draw_start - 1, scene.ceiling);
    fill_column_run(buf, width, x, slice.draw_start, slice.draw_end, slice.color);
    fill_column_run(buf, width, x, slice.draw_end + 1, last, scene.floor);
}

pub fn render_frame(
    buf: &mut [u32],
    width: usize,
    height: usize,
    grid: &Grid,
    camera: &Camera,
    scene: &SceneColors,
) -> Result<(), CastError> {
    buf.fill(0);
    if width == 0 || height == 0 {
        return Ok(());
    }

    let slices = cast_columns(width, height, grid, camera)?;
    for (x, slice) in slices.iter().enumerate() {
        draw_column(buf, width, height, x, slice, scene);
    }
    Ok(())
}
