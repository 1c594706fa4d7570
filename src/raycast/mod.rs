use glam::UVec2;

pub mod dda;
pub mod march;

pub use dda::raycast_dda;
pub use march::{MarchConfig, MarchOutcome, MarchStep, RayMarch, Termination, cast, cast_ray};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayHit2D {
    /// Grid cell that contains the first hit, as `(column, row)`.
    pub cell: UVec2,
    /// Distance from the ray origin to the cell boundary hit (world units).
    pub hit_distance: f32,
}
