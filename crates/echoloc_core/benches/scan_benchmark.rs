//! Scan pipeline benchmarks.
//!
//! Measures the three CPU stages at the default production ray count.

use criterion::{criterion_group, criterion_main, Criterion};
use echoloc_core::{
    compact_into, intersect_batch, sample_directions_into, GroundPlaneWorld, ScanRequest,
};
use echoloc_shared::{LayerMask, Vec3};

/// Default production ray count.
const RAYS: usize = 4000;

fn bench_sampling(c: &mut Criterion) {
    let mut directions = Vec::with_capacity(RAYS);
    c.bench_function("sample_4000_directions", |b| {
        b.iter(|| {
            sample_directions_into(RAYS, &mut directions);
            directions.len()
        });
    });
}

fn bench_intersection(c: &mut Criterion) {
    let world = GroundPlaneWorld::new(0.0, LayerMask::GEOMETRY);
    let request = ScanRequest {
        origin: Vec3::new(0.0, 5.0, 0.0),
        ray_count: RAYS,
        max_distance: 50.0,
        mask: LayerMask::ALL,
    };
    let mut directions = Vec::with_capacity(RAYS);
    sample_directions_into(RAYS, &mut directions);
    let mut results = Vec::with_capacity(RAYS);

    c.bench_function("intersect_4000_rays_plane", |b| {
        b.iter(|| {
            intersect_batch(&world, &request, &directions, &mut results);
            results.len()
        });
    });
}

fn bench_compaction(c: &mut Criterion) {
    let world = GroundPlaneWorld::new(0.0, LayerMask::GEOMETRY);
    let request = ScanRequest {
        origin: Vec3::new(0.0, 5.0, 0.0),
        ray_count: RAYS,
        max_distance: 50.0,
        mask: LayerMask::ALL,
    };
    let mut directions = Vec::with_capacity(RAYS);
    sample_directions_into(RAYS, &mut directions);
    let mut results = Vec::with_capacity(RAYS);
    intersect_batch(&world, &request, &directions, &mut results);
    let mut transforms = Vec::with_capacity(RAYS);

    c.bench_function("compact_4000_results", |b| {
        b.iter(|| compact_into(&results, 0.5, 5.0, &mut transforms));
    });
}

criterion_group!(benches, bench_sampling, bench_intersection, bench_compaction);
criterion_main!(benches);
