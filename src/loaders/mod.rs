pub mod yaml;

pub use yaml::{LoadedMap, load_grid, load_map, parse_map};
