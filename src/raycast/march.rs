//! Fixed-step ray marching.
//!
//! The march advances by `direction * step_size` and samples the cell under
//! each new position. Thin walls can be stepped over when `step_size` is large
//! compared to the cell size; [`raycast_dda`](super::dda::raycast_dda) visits
//! every crossed cell instead.

use glam::{IVec2, Vec2, Vec3};
use serde::Deserialize;

use crate::grid::OccupancyGrid;
use crate::types::{DEFAULT_MAX_DIST, DEFAULT_STEP_SIZE, GridError, MAX_STEP_BUDGET, Ray2};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarchConfig {
    /// Travel budget in world units.
    pub max_dist: f32,
    /// Distance advanced per step for a unit direction.
    pub step_size: f32,
    /// Normalize the direction before stepping. When false the raw direction
    /// magnitude scales the step.
    pub normalize_direction: bool,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            max_dist: DEFAULT_MAX_DIST,
            step_size: DEFAULT_STEP_SIZE,
            normalize_direction: false,
        }
    }
}

impl MarchConfig {
    pub fn new(max_dist: f32, step_size: f32) -> Self {
        Self {
            max_dist,
            step_size,
            ..Default::default()
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize_direction = true;
        self
    }

    /// Number of steps the march may take: `floor(max_dist / step_size)`,
    /// computed in f32. At most [`MAX_STEP_BUDGET`].
    pub fn step_budget(&self) -> Result<usize, GridError> {
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(GridError::invalid(format!(
                "step size must be positive and finite, got {}",
                self.step_size
            )));
        }
        if !(self.max_dist.is_finite() && self.max_dist > 0.0) {
            return Err(GridError::invalid(format!(
                "max distance must be positive and finite, got {}",
                self.max_dist
            )));
        }

        let steps = (self.max_dist / self.step_size).floor();
        if !steps.is_finite() || steps < 1.0 {
            return Err(GridError::invalid(format!(
                "max distance {} is shorter than one step of {}",
                self.max_dist, self.step_size
            )));
        }
        if steps > MAX_STEP_BUDGET as f32 {
            return Err(GridError::invalid(format!(
                "max distance {} over step {} needs {} steps, more than {}",
                self.max_dist, self.step_size, steps, MAX_STEP_BUDGET
            )));
        }
        Ok(steps as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Stopped on an occupied cell.
    Hit,
    /// Ran out of steps.
    Exhausted,
}

/// One sample of a march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchStep {
    /// 1-based step number.
    pub step: usize,
    pub position: Vec2,
    /// `(column, row)` under `position`; may be out of bounds.
    pub cell: IVec2,
    pub occupied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchOutcome {
    /// Terminal position, with a zero z coordinate.
    pub point: Vec3,
    pub steps: usize,
    pub termination: Termination,
}

impl MarchOutcome {
    pub fn is_hit(&self) -> bool {
        self.termination == Termination::Hit
    }
}

/// Iterator over the states of a single march. Ends after the first occupied
/// sample or when the step budget runs out.
pub struct RayMarch<'a> {
    grid: &'a OccupancyGrid,
    position: Vec2,
    delta: Vec2,
    taken: usize,
    budget: usize,
    done: bool,
}

impl<'a> RayMarch<'a> {
    pub fn new(grid: &'a OccupancyGrid, ray: Ray2, config: &MarchConfig) -> Result<Self, GridError> {
        let budget = config.step_budget()?;
        if !ray.is_finite() {
            return Err(GridError::invalid(format!(
                "ray must be finite, got origin {} direction {}",
                ray.origin, ray.direction
            )));
        }

        let direction = if config.normalize_direction {
            ray.direction.try_normalize().ok_or_else(|| {
                GridError::invalid("cannot normalize a zero-length direction")
            })?
        } else {
            ray.direction
        };

        Ok(Self {
            grid,
            position: ray.origin,
            delta: direction * config.step_size,
            taken: 0,
            budget,
            done: false,
        })
    }

    /// Current position: the origin before the first step.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Drive the march to completion.
    pub fn run(mut self) -> MarchOutcome {
        let mut termination = Termination::Exhausted;
        for sample in self.by_ref() {
            if sample.occupied {
                termination = Termination::Hit;
            }
        }
        MarchOutcome {
            point: self.position.extend(0.0),
            steps: self.taken,
            termination,
        }
    }
}

impl Iterator for RayMarch<'_> {
    type Item = MarchStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.taken >= self.budget {
            return None;
        }

        self.position += self.delta;
        self.taken += 1;

        let cell = self.grid.world_to_cell(self.position);
        let occupied = self.grid.is_occupied(cell);
        if occupied {
            self.done = true;
        }

        Some(MarchStep {
            step: self.taken,
            position: self.position,
            cell,
            occupied,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        (0, Some(self.budget - self.taken))
    }
}

/// March from `origin` along `direction` and report how the march ended.
pub fn cast_ray(
    grid: &OccupancyGrid,
    ray: Ray2,
    config: &MarchConfig,
) -> Result<MarchOutcome, GridError> {
    let outcome = RayMarch::new(grid, ray, config)?.run();
    tracing::trace!(
        origin = %ray.origin,
        direction = %ray.direction,
        steps = outcome.steps,
        hit = outcome.is_hit(),
        "ray march finished"
    );
    Ok(outcome)
}

/// Point where a ray from `origin` first lands in an occupied cell, or where
/// it stops after `config.max_dist` of travel.
///
/// Only the x and y of `origin` are used; the result always has `z == 0`.
/// The cell size is the grid's; use [`OccupancyGrid::with_cell_size`] to cast
/// the same cells at another scale.
pub fn cast(
    origin: Vec3,
    direction: Vec2,
    grid: &OccupancyGrid,
    config: &MarchConfig,
) -> Result<Vec3, GridError> {
    cast_ray(grid, Ray2::from_point(origin, direction), config).map(|outcome| outcome.point)
}
