//! Map metadata.

use glam::{IVec2, Vec2};

/// Dimensions of a grid centered on the world origin.
///
/// Row 0 is the top edge (maximum world y) and column 0 the left edge
/// (minimum world x).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapInfo {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// World units per cell edge.
    pub cell_size: f32,
}

impl Default for MapInfo {
    fn default() -> Self {
        Self {
            width: 8,
            height: 5,
            cell_size: 1.0,
        }
    }
}

impl MapInfo {
    pub fn square(width: u32, cell_size: f32) -> Self {
        Self {
            width,
            height: width,
            cell_size,
        }
    }

    /// Width of the map in world units.
    #[inline]
    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.cell_size
    }

    /// Height of the map in world units.
    #[inline]
    pub fn world_height(&self) -> f32 {
        self.height as f32 * self.cell_size
    }

    /// Cell containing `pos`, as `(column, row)`. May lie outside the map.
    #[inline]
    pub fn world_to_cell(&self, pos: Vec2) -> IVec2 {
        let column = (pos.x / self.cell_size + self.width as f32 / 2.0).floor();
        let row = (self.height as f32 / 2.0 - pos.y / self.cell_size).floor();
        IVec2::new(column as i32, row as i32)
    }

    /// World position of the center of cell `(row, column)`.
    #[inline]
    pub fn cell_center(&self, row: u32, column: u32) -> Vec2 {
        Vec2::new(
            (column as f32 - self.width as f32 / 2.0 + 0.5) * self.cell_size,
            (self.height as f32 / 2.0 - row as f32 - 0.5) * self.cell_size,
        )
    }

    /// equivalent to (0 <= x < width && 0 <= y < height) for signed cells
    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }
}
