use glam::{IVec2, Vec2};

use crate::grid::OccupancyGrid;
use crate::raycast::RayHit2D;
use crate::types::MapInfo;

/// Fast voxel traversal (Amanatides & Woo) that returns the first occupied cell hit.
///
/// Unlike the fixed-step march this visits every cell the ray crosses, so it
/// cannot skip thin walls. Rays starting outside the grid return `None`.
pub fn raycast_dda(grid: &OccupancyGrid, origin: Vec2, dir: Vec2, max_dist: f32) -> Option<RayHit2D> {
    if dir.length_squared() == 0.0 || !origin.is_finite() || !dir.is_finite() {
        return None;
    }

    let info = grid.info();
    let max_t_grid = max_dist / info.cell_size;
    // Rows grow downwards, so flip y into grid space.
    let dir = dir.normalize() * Vec2::new(1.0, -1.0);

    let start = world_to_grid(info, origin)?;

    // We use ivecs internally as the steps can be negative.
    let mut cell = start.floor().as_ivec2();
    if grid.is_occupied(cell) {
        return Some(RayHit2D {
            cell: cell.as_uvec2(),
            hit_distance: 0.0,
        });
    }

    let step = IVec2::new(dir.x.signum() as i32, dir.y.signum() as i32);
    let (t_delta_x, t_max_x) = axis_params(start.x, dir.x);
    let (t_delta_y, t_max_y) = axis_params(start.y, dir.y);

    let mut t_max = Vec2::new(t_max_x, t_max_y);
    let t_delta = Vec2::new(t_delta_x, t_delta_y);

    loop {
        let t;
        if t_max.x < t_max.y {
            t = t_max.x;
            t_max.x += t_delta.x;
            cell.x += step.x;
        } else {
            t = t_max.y;
            t_max.y += t_delta.y;
            cell.y += step.y;
        }

        if t > max_t_grid || !info.contains(cell) {
            return None;
        }

        if grid.is_occupied(cell) {
            return Some(RayHit2D {
                cell: cell.as_uvec2(),
                hit_distance: t * info.cell_size,
            });
        }
    }
}

/// Continuous `(column, row)` coordinates, `None` outside the grid.
fn world_to_grid(info: &MapInfo, pos: Vec2) -> Option<Vec2> {
    let gx = pos.x / info.cell_size + info.width as f32 / 2.0;
    let gy = info.height as f32 / 2.0 - pos.y / info.cell_size;
    if gx < 0.0 || gy < 0.0 || gx >= info.width as f32 || gy >= info.height as f32 {
        return None;
    }
    Some(Vec2::new(gx, gy))
}

fn axis_params(start: f32, dir: f32) -> (f32, f32) {
    if dir == 0.0 {
        return (f32::INFINITY, f32::INFINITY);
    }

    let step = dir.signum();
    let dist_to_boundary = if step > 0.0 {
        1.0 - start.fract()
    } else {
        start.fract()
    };

    let t_delta = (1.0 / dir).abs();
    let t_max = dist_to_boundary * t_delta;
    (t_delta, t_max)
}
