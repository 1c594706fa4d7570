use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::Vec2;

use gridcast::raycast::{MarchConfig, cast_ray, raycast_dda};
use gridcast::types::{FREE, MapInfo, OCCUPIED, Ray2};
use gridcast::OccupancyGrid;

fn bench_march(c: &mut Criterion) {
    let grid = build_grid(256, 256, 0.05);
    let empty_grid = build_empty_grid(256, 256, 0.05);
    let rays = build_rays();
    let config = MarchConfig::new(10.0, 0.01);

    c.bench_function("march_hits", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for ray in &rays {
                if cast_ray(&grid, *ray, &config).unwrap().is_hit() {
                    hits += 1;
                }
            }
            black_box(hits);
        });
    });

    c.bench_function("march_exhausted", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for ray in &rays {
                if cast_ray(&empty_grid, *ray, &config).unwrap().is_hit() {
                    hits += 1;
                }
            }
            black_box(hits);
        });
    });

    c.bench_function("dda_hits", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for ray in &rays {
                if raycast_dda(&grid, ray.origin, ray.direction, config.max_dist).is_some() {
                    hits += 1;
                }
            }
            black_box(hits);
        });
    });
}

fn build_grid(width: u32, height: u32, cell_size: f32) -> OccupancyGrid {
    let mut data = vec![FREE; (width * height) as usize];
    for y in (0..height).step_by(16) {
        for x in (0..width).step_by(16) {
            data[(y * width + x) as usize] = OCCUPIED;
        }
    }
    let info = MapInfo {
        width,
        height,
        cell_size,
    };
    OccupancyGrid::new(info, data).expect("grid should build")
}

fn build_empty_grid(width: u32, height: u32, cell_size: f32) -> OccupancyGrid {
    let info = MapInfo {
        width,
        height,
        cell_size,
    };
    OccupancyGrid::new(info, vec![FREE; (width * height) as usize]).expect("grid should build")
}

fn build_rays() -> Vec<Ray2> {
    let mut rays = Vec::new();
    for i in 0..64 {
        let origin = Vec2::new(-6.0, -3.0 + i as f32 * 0.1);
        let dir = Vec2::new(1.0, (i as f32 * 0.01) - 0.3).normalize();
        rays.push(Ray2::new(origin, dir));
    }
    rays.push(Ray2::new(Vec2::new(2.0, 2.0), Vec2::new(-1.0, 0.2).normalize()));
    rays.push(Ray2::new(Vec2::new(3.0, -1.0), Vec2::new(0.2, 1.0).normalize()));
    rays
}

criterion_group!(benches, bench_march);
criterion_main!(benches);
