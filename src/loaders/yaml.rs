//! YAML map files.
//!
//! ```yaml
//! cell_size: 0.8
//! cells:
//!   - [1, 1, 1]
//!   - [1, 0, 1]
//!   - [1, 1, 1]
//! player: [1, 1]      # optional, (row, column)
//! scene:              # optional, see `SceneConfig`
//!   wall_scale: 3.5
//!   march:
//!     step_size: 0.05
//! ```

use std::path::Path;

use glam::Vec2;
use serde::Deserialize;

use crate::fov::SceneConfig;
use crate::grid::OccupancyGrid;
use crate::types::GridError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapFile {
    #[serde(deserialize_with = "deserialize_cell_size")]
    cell_size: f32,
    cells: Vec<Vec<u8>>,
    #[serde(default)]
    player: Option<[u32; 2]>,
    #[serde(default)]
    scene: SceneConfig,
}

fn deserialize_cell_size<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f32::deserialize(deserializer)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("cell_size must be positive"))
    }
}

#[derive(Debug, Clone)]
pub struct LoadedMap {
    pub grid: OccupancyGrid,
    /// Center of the player cell, if the file names one.
    pub player: Option<Vec2>,
    pub scene: SceneConfig,
}

pub fn parse_map(yaml: &str) -> Result<LoadedMap, GridError> {
    let file: MapFile = serde_yaml::from_str(yaml)?;
    let grid = OccupancyGrid::from_rows(&file.cells, file.cell_size)?;

    let player = match file.player {
        Some([row, column]) => {
            if row >= grid.height() || column >= grid.width() {
                return Err(GridError::invalid(format!(
                    "player cell ({row}, {column}) is outside the {}x{} map",
                    grid.height(),
                    grid.width()
                )));
            }
            Some(grid.cell_center(row, column))
        }
        None => None,
    };

    Ok(LoadedMap {
        grid,
        player,
        scene: file.scene,
    })
}

pub fn load_map(path: impl AsRef<Path>) -> Result<LoadedMap, GridError> {
    let path = path.as_ref();
    let yaml = std::fs::read_to_string(path)?;
    let map = parse_map(&yaml)?;
    tracing::debug!(
        path = %path.display(),
        width = map.grid.width(),
        height = map.grid.height(),
        cell_size = map.grid.cell_size(),
        "loaded map"
    );
    Ok(map)
}

pub fn load_grid(path: impl AsRef<Path>) -> Result<OccupancyGrid, GridError> {
    load_map(path).map(|map| map.grid)
}
