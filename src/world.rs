use glam::IVec2;
use thiserror::Error;

/// 12x12 walled room, the map the viewer starts in.
#[rustfmt::skip]
pub const ROOM_12: [u8; 12 * 12] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

/// 8x8 room with a few coloured pillars.
#[rustfmt::skip]
pub const ROOM_8: [u8; 8 * 8] = [
    1, 1, 1, 1, 1, 1, 1, 1,
    1, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 2, 0, 1,
    1, 0, 0, 3, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 4, 1,
    1, 1, 1, 1, 1, 1, 1, 1,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map is empty")]
    Empty,

    #[error("map has {len} cells, which is not a square grid")]
    NotSquare { len: usize },

    #[error("border cell ({col}, {row}) is open; rays could leave the map")]
    OpenBorder { col: usize, row: usize },
}

/// Read-only occupancy grid: 0 is free space, anything else is wall material.
///
/// Cells are row-major, `cells[row * size + col]`, with `col` along x and
/// `row` along y.
#[derive(Clone, Copy, Debug)]
pub struct Grid {
    size: usize,
    cells: &'static [u8],
}

impl Grid {
    /// Wrap a static square map, checking that the border ring is solid.
    pub fn new(cells: &'static [u8]) -> Result<Self, MapError> {
        let grid = Self::unchecked(cells)?;

        let n = grid.size;
        for i in 0..n {
            for (col, row) in [(i, 0), (i, n - 1), (0, i), (n - 1, i)] {
                if cells[row * n + col] == 0 {
                    return Err(MapError::OpenBorder { col, row });
                }
            }
        }
        Ok(grid)
    }

    /// Shape check only. The caster still bounds-checks every step, so a grid
    /// built this way fails loudly instead of reading past the map.
    pub fn unchecked(cells: &'static [u8]) -> Result<Self, MapError> {
        if cells.is_empty() {
            return Err(MapError::Empty);
        }
        let size = cells.len().isqrt();
        if size * size != cells.len() {
            return Err(MapError::NotSquare { len: cells.len() });
        }
        Ok(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Tag at `cell`, or `None` outside the map.
    #[inline]
    pub fn tag(&self, cell: IVec2) -> Option<u8> {
        let n = self.size as i32;
        if cell.x < 0 || cell.y < 0 || cell.x >= n || cell.y >= n {
            return None;
        }
        Some(self.cells[cell.y as usize * self.size + cell.x as usize])
    }

    #[inline]
    pub fn is_free(&self, cell: IVec2) -> bool {
        self.tag(cell) == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::ivec2;

    #[test]
    fn builtin_maps_are_closed() {
        assert_eq!(Grid::new(&ROOM_12).unwrap().size(), 12);
        assert_eq!(Grid::new(&ROOM_8).unwrap().size(), 8);
    }

    #[test]
    fn rejects_open_border() {
        #[rustfmt::skip]
        static LEAKY: [u8; 9] = [
            1, 1, 1,
            1, 0, 0,
            1, 1, 1,
        ];
        assert_eq!(
            Grid::new(&LEAKY).unwrap_err(),
            MapError::OpenBorder { col: 2, row: 1 }
        );
    }

    #[test]
    fn rejects_non_square() {
        static ODD: [u8; 6] = [1; 6];
        assert_eq!(Grid::new(&ODD).unwrap_err(), MapError::NotSquare { len: 6 });
        assert_eq!(Grid::new(&[]).unwrap_err(), MapError::Empty);
    }

    #[test]
    fn tag_is_row_major_and_bounds_checked() {
        let grid = Grid::new(&ROOM_8).unwrap();
        // row 4, col 5
        assert_eq!(grid.tag(ivec2(5, 4)), Some(2));
        assert_eq!(grid.tag(ivec2(4, 5)), Some(0));
        assert_eq!(grid.tag(ivec2(-1, 3)), None);
        assert_eq!(grid.tag(ivec2(3, 8)), None);
        assert!(grid.is_free(ivec2(1, 1)));
        assert!(!grid.is_free(ivec2(0, 1)));
    }
}
