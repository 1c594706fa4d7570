//! Field-of-view fans for column-based wall rendering.
//!
//! A fan casts `num_rays` evenly spaced rays across the view, then turns each
//! hit distance into a wall height `wall_scale / distance`. Distances are
//! corrected by the cosine of the ray's offset from the view direction so that
//! flat walls stay flat.

use glam::{Vec2, Vec3};
use serde::Deserialize;

use crate::grid::OccupancyGrid;
use crate::raycast::{MarchConfig, cast_ray};
use crate::types::{DEFAULT_MIN_DISTANCE, DEFAULT_WALL_SCALE, GridError, Ray2};

/// Parameters for a fan, passed explicitly to every cast.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub march: MarchConfig,
    /// Numerator of the wall height formula.
    pub wall_scale: f32,
    /// Lower bound applied to corrected distances.
    pub min_distance: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            march: MarchConfig::default(),
            wall_scale: DEFAULT_WALL_SCALE,
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOfView {
    /// View direction in radians, counter-clockwise from +x.
    pub base_angle: f32,
    /// Total angular span in radians.
    pub fov_angle: f32,
    pub num_rays: usize,
}

impl FieldOfView {
    pub fn new(base_angle: f32, fov_angle: f32, num_rays: usize) -> Self {
        Self {
            base_angle,
            fov_angle,
            num_rays,
        }
    }

    pub fn from_degrees(base_deg: f32, fov_deg: f32, num_rays: usize) -> Self {
        Self::new(base_deg.to_radians(), fov_deg.to_radians(), num_rays)
    }

    /// Left and right edges of the fan.
    pub fn edges(&self) -> (f32, f32) {
        let half = self.fov_angle / 2.0;
        (self.base_angle - half, self.base_angle + half)
    }

    /// `num_rays` angles from the left edge to the right edge, both included.
    pub fn angles(&self) -> Vec<f32> {
        let (start, end) = self.edges();
        match self.num_rays {
            0 => Vec::new(),
            1 => vec![start],
            n => {
                let step = (end - start) / (n - 1) as f32;
                (0..n)
                    .map(|i| if i == n - 1 { end } else { start + step * i as f32 })
                    .collect()
            }
        }
    }

    fn validate(&self) -> Result<(), GridError> {
        if self.num_rays == 0 {
            return Err(GridError::invalid("a fan needs at least one ray"));
        }
        if !(self.base_angle.is_finite() && self.fov_angle.is_finite()) {
            return Err(GridError::invalid(format!(
                "fan angles must be finite, got base {} fov {}",
                self.base_angle, self.fov_angle
            )));
        }
        Ok(())
    }
}

/// Result of one ray of a fan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSample {
    pub angle: f32,
    pub end_point: Vec3,
    pub hit: bool,
    /// Planar distance from the origin to `end_point`.
    pub distance: f32,
    /// `distance * cos(angle - base_angle)`, floored at `min_distance`.
    pub corrected_distance: f32,
    /// `wall_scale / corrected_distance`.
    pub wall_height: f32,
}

impl ColumnSample {
    /// Height without the fisheye correction, with the same distance floor.
    pub fn uncorrected_height(&self, config: &SceneConfig) -> f32 {
        let dist = if self.distance > 0.0 && self.distance.is_finite() {
            self.distance
        } else {
            config.min_distance
        };
        config.wall_scale / dist
    }
}

fn validate_scene(config: &SceneConfig) -> Result<(), GridError> {
    config.march.step_budget()?;
    if !(config.min_distance.is_finite() && config.min_distance > 0.0) {
        return Err(GridError::invalid(format!(
            "min distance must be positive and finite, got {}",
            config.min_distance
        )));
    }
    if !config.wall_scale.is_finite() {
        return Err(GridError::invalid(format!(
            "wall scale must be finite, got {}",
            config.wall_scale
        )));
    }
    Ok(())
}

fn sample_column(
    grid: &OccupancyGrid,
    origin: Vec2,
    base_angle: f32,
    angle: f32,
    config: &SceneConfig,
) -> Result<ColumnSample, GridError> {
    let outcome = cast_ray(grid, Ray2::from_angle(origin, angle), &config.march)?;
    let distance = outcome.point.truncate().distance(origin);
    let corrected_distance = (distance * (angle - base_angle).cos()).max(config.min_distance);

    Ok(ColumnSample {
        angle,
        end_point: outcome.point,
        hit: outcome.is_hit(),
        distance,
        corrected_distance,
        wall_height: config.wall_scale / corrected_distance,
    })
}

/// Cast every ray of `fov` from `origin`, in angle order.
pub fn cast_fan(
    grid: &OccupancyGrid,
    origin: Vec2,
    fov: &FieldOfView,
    config: &SceneConfig,
) -> Result<Vec<ColumnSample>, GridError> {
    fov.validate()?;
    validate_scene(config)?;

    let samples = fov
        .angles()
        .into_iter()
        .map(|angle| sample_column(grid, origin, fov.base_angle, angle, config))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        rays = samples.len(),
        hits = samples.iter().filter(|s| s.hit).count(),
        "fan cast"
    );
    Ok(samples)
}

/// Label line for ray `index`: `ray_i` is the raw distance, `h_i` the
/// uncorrected height and `bar_i` the corrected height used for bars.
pub fn fan_label(index: usize, sample: &ColumnSample, config: &SceneConfig) -> String {
    format!(
        "ray_{index} = {:.4}  h_{index} = {:.2}  bar_{index} = {:.2}",
        sample.distance,
        sample.uncorrected_height(config),
        sample.wall_height
    )
}

/// Samples in screen order, left to right. Ray angles grow counter-clockwise,
/// so the last ray is the leftmost column.
pub fn screen_columns(samples: &[ColumnSample]) -> impl Iterator<Item = &ColumnSample> {
    samples.iter().rev()
}

// ---------------------------------------------------------------------------
// Parallel version using rayon
// ---------------------------------------------------------------------------

#[cfg(feature = "rayon")]
pub mod parallel {
    use super::*;
    use rayon::prelude::*;

    /// Same as [`cast_fan`], one rayon task per ray. Casts only read the grid.
    pub fn cast_fan_par(
        grid: &OccupancyGrid,
        origin: Vec2,
        fov: &FieldOfView,
        config: &SceneConfig,
    ) -> Result<Vec<ColumnSample>, GridError> {
        fov.validate()?;
        validate_scene(config)?;

        fov.angles()
            .into_par_iter()
            .map(|angle| sample_column(grid, origin, fov.base_angle, angle, config))
            .collect()
    }
}

/// The map, player and view used by the ray-casting walkthrough.
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub grid: OccupancyGrid,
    pub origin: Vec2,
    pub fov: FieldOfView,
}

pub const DEMO_CELL_SIZE: f32 = 0.8;
/// Player cell as `(row, column)`.
pub const DEMO_PLAYER_CELL: (u32, u32) = (2, 3);

const DEMO_MAP: [[u8; 8]; 5] = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
];

pub fn demo_scene() -> Result<DemoScene, GridError> {
    let grid = OccupancyGrid::from_rows(&DEMO_MAP, DEMO_CELL_SIZE)?;
    let (row, column) = DEMO_PLAYER_CELL;
    let origin = grid.cell_center(row, column);
    Ok(DemoScene {
        grid,
        origin,
        fov: FieldOfView::from_degrees(135.0, 75.0, 5),
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn angles_span_the_fan() {
        let fov = FieldOfView::from_degrees(90.0, 60.0, 7);
        let angles = fov.angles();
        assert_eq!(angles.len(), 7);
        assert_relative_eq!(angles[0], 60f32.to_radians(), epsilon = 1e-6);
        assert_relative_eq!(angles[3], 90f32.to_radians(), epsilon = 1e-6);
        assert_relative_eq!(angles[6], 120f32.to_radians(), epsilon = 1e-6);
        assert!(angles.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(FieldOfView::new(1.0, 0.5, 1).angles(), vec![0.75]);
    }

    #[test]
    fn demo_player_position() {
        let scene = demo_scene().unwrap();
        assert_relative_eq!(scene.origin.x, -0.4, epsilon = 1e-6);
        assert_relative_eq!(scene.origin.y, 0.0, epsilon = 1e-6);
        assert!(!scene.grid.is_occupied(scene.grid.world_to_cell(scene.origin)));
    }

    #[test]
    fn demo_fan_hits_walls() {
        let scene = demo_scene().unwrap();
        let config = SceneConfig::default();
        let samples = cast_fan(&scene.grid, scene.origin, &scene.fov, &config).unwrap();

        assert_eq!(samples.len(), 5);
        for sample in &samples {
            // The map is enclosed, every ray ends on a wall.
            assert!(sample.hit);
            assert!(sample.distance > 0.0 && sample.distance < config.march.max_dist);
            assert!(sample.corrected_distance <= sample.distance + 1e-6);
            assert_relative_eq!(
                sample.wall_height,
                config.wall_scale / sample.corrected_distance
            );
            assert!(sample.uncorrected_height(&config) <= sample.wall_height + 1e-4);
        }

        // The middle ray points straight along the view.
        let middle = samples[2];
        assert_relative_eq!(middle.angle, scene.fov.base_angle, epsilon = 1e-6);
        assert_relative_eq!(middle.corrected_distance, middle.distance, epsilon = 1e-5);
    }

    #[test]
    fn demo_labels_use_raw_distance() {
        let scene = demo_scene().unwrap();
        let config = SceneConfig::default();
        let samples = cast_fan(&scene.grid, scene.origin, &scene.fov, &config).unwrap();
        let labels: Vec<String> = samples
            .iter()
            .enumerate()
            .map(|(i, sample)| fan_label(i, sample, &config))
            .collect();

        assert!(labels[0].starts_with("ray_0 = 1.2500  h_0 = 2.80  bar_0 = "));
        assert!(labels[4].starts_with("ray_4 = 0.4500  h_4 = 7.78  bar_4 = "));
        assert_eq!(
            labels[4],
            format!("ray_4 = 0.4500  h_4 = 7.78  bar_4 = {:.2}", samples[4].wall_height)
        );
    }

    #[test]
    fn fan_matches_individual_casts() {
        let scene = demo_scene().unwrap();
        let config = SceneConfig::default();
        let fov = FieldOfView::from_degrees(135.0, 75.0, 120);
        let samples = cast_fan(&scene.grid, scene.origin, &fov, &config).unwrap();

        for (sample, angle) in samples.iter().zip(fov.angles()) {
            let outcome =
                cast_ray(&scene.grid, Ray2::from_angle(scene.origin, angle), &config.march).unwrap();
            assert_eq!(sample.end_point, outcome.point);
        }
    }

    #[test]
    fn screen_columns_run_right_to_left_in_angle() {
        let scene = demo_scene().unwrap();
        let samples = cast_fan(&scene.grid, scene.origin, &scene.fov, &SceneConfig::default()).unwrap();
        let screen: Vec<f32> = screen_columns(&samples).map(|s| s.angle).collect();
        assert!(screen.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn corrected_distance_is_floored() {
        // Origin hugging a wall: the first step lands in it.
        let grid = OccupancyGrid::from_rows(&[[0u8, 1]], 1.0).unwrap();
        let fov = FieldOfView::new(0.0, 0.0, 1);
        let config = SceneConfig {
            march: MarchConfig::new(5.0, 0.001),
            ..Default::default()
        };
        let samples = cast_fan(&grid, Vec2::new(-0.0005, 0.0), &fov, &config).unwrap();
        assert!(samples[0].hit);
        assert_relative_eq!(samples[0].corrected_distance, config.min_distance);
        assert_relative_eq!(samples[0].wall_height, config.wall_scale / config.min_distance);
    }

    #[test]
    fn rejects_empty_fan_and_bad_config() {
        let scene = demo_scene().unwrap();
        let empty = FieldOfView::new(0.0, 1.0, 0);
        assert!(matches!(
            cast_fan(&scene.grid, scene.origin, &empty, &SceneConfig::default()),
            Err(GridError::InvalidArgument(_))
        ));

        let config = SceneConfig {
            min_distance: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cast_fan(&scene.grid, scene.origin, &scene.fov, &config),
            Err(GridError::InvalidArgument(_))
        ));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_fan_is_identical() {
        let scene = demo_scene().unwrap();
        let config = SceneConfig::default();
        let fov = FieldOfView::from_degrees(135.0, 75.0, 120);
        let sequential = cast_fan(&scene.grid, scene.origin, &fov, &config).unwrap();
        let parallel = parallel::cast_fan_par(&scene.grid, scene.origin, &fov, &config).unwrap();
        assert_eq!(sequential, parallel);
    }
}
