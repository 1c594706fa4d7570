pub mod convert;
pub mod fov;
pub mod grid;
pub mod loaders;
pub mod raycast;
pub mod types;

pub use grid::OccupancyGrid;
pub use loaders::{load_grid, load_map};
pub use raycast::{MarchConfig, cast, cast_ray};
pub use types::{GridError, MapInfo, Ray2};
