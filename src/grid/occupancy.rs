use glam::{IVec2, Vec2};

use crate::types::{FREE, GridError, MapInfo, OCCUPIED};

/// Immutable binary occupancy grid, stored row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    info: MapInfo,
    data: Vec<u8>,
}

impl OccupancyGrid {
    pub fn new(info: MapInfo, data: Vec<u8>) -> Result<Self, GridError> {
        if info.width == 0 || info.height == 0 {
            return Err(GridError::invalid(format!(
                "grid must have at least one row and column, got {}x{}",
                info.width, info.height
            )));
        }
        if !(info.cell_size.is_finite() && info.cell_size > 0.0) {
            return Err(GridError::invalid(format!(
                "cell size must be positive and finite, got {}",
                info.cell_size
            )));
        }

        let expected_len = (info.width as usize) * (info.height as usize);
        if data.len() != expected_len {
            return Err(GridError::invalid(format!(
                "data length {} does not match map size {}",
                data.len(),
                expected_len
            )));
        }

        if let Some(idx) = data.iter().position(|&v| v != FREE && v != OCCUPIED) {
            let width = info.width as usize;
            return Err(GridError::invalid(format!(
                "cell ({}, {}) has value {}, expected {} or {}",
                idx / width,
                idx % width,
                data[idx],
                FREE,
                OCCUPIED
            )));
        }

        Ok(Self { info, data })
    }

    /// Build a grid from rows of 0/1 values. Every row must have the same
    /// length.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R], cell_size: f32) -> Result<Self, GridError> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(width * rows.len());
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::invalid(format!(
                    "grid is not rectangular: row {} has {} cells, row 0 has {}",
                    i,
                    row.len(),
                    width
                )));
            }
            data.extend_from_slice(row);
        }

        let info = MapInfo {
            width: width as u32,
            height: rows.len() as u32,
            cell_size,
        };
        Self::new(info, data)
    }

    /// Same cells at a different scale.
    pub fn with_cell_size(&self, cell_size: f32) -> Result<Self, GridError> {
        let info = MapInfo {
            cell_size,
            ..self.info
        };
        Self::new(info, self.data.clone())
    }

    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn cell_size(&self) -> f32 {
        self.info.cell_size
    }

    pub fn get(&self, row: u32, column: u32) -> Option<u8> {
        if column >= self.info.width || row >= self.info.height {
            return None;
        }
        Some(self.data[self.index(row, column)])
    }

    /// `cell` is `(column, row)`. Out-of-bounds cells are never occupied.
    #[inline]
    pub fn is_occupied(&self, cell: IVec2) -> bool {
        self.info.contains(cell)
            && self.data[self.index(cell.y as u32, cell.x as u32)] == OCCUPIED
    }

    /// Cell containing `pos` as `(column, row)`; may be out of bounds.
    #[inline]
    pub fn world_to_cell(&self, pos: Vec2) -> IVec2 {
        self.info.world_to_cell(pos)
    }

    pub fn cell_center(&self, row: u32, column: u32) -> Vec2 {
        self.info.cell_center(row, column)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.info.width as usize)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn index(&self, row: u32, column: u32) -> usize {
        (row as usize) * (self.info.width as usize) + (column as usize)
    }
}
