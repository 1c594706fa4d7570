pub const FREE: u8 = 0;
pub const OCCUPIED: u8 = 1;

pub const DEFAULT_MAX_DIST: f32 = 5.0;
pub const DEFAULT_STEP_SIZE: f32 = 0.05;
/// Largest step budget a march accepts. Past this `position += delta` stops
/// moving in f32 long before the budget runs out.
pub const MAX_STEP_BUDGET: u32 = u32::MAX;

/// Numerator of the wall height formula `h = WALL_SCALE / distance`.
pub const DEFAULT_WALL_SCALE: f32 = 3.5;
/// Floor applied to corrected distances before dividing.
pub const DEFAULT_MIN_DISTANCE: f32 = 0.01;
