//! Benchmark for the grid index.
//!
//! TARGET: full rebuild of 2,000 bodies plus 2,000 queries well under one frame
//!
//! Run with: cargo bench --package voidline_core --bench spatial_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voidline_core::rng::{ZoneRng, ZoneSeed};
use voidline_core::spatial::{BodyId, Circle, SpatialIndex};

fn scattered_bodies(count: u32) -> Vec<(BodyId, Circle)> {
    let mut rng = ZoneRng::new(ZoneSeed::new(42));
    (0..count)
        .map(|i| {
            let circle = Circle::at(rng.range(0.0, 5000.0), rng.range(0.0, 5000.0), rng.range(8.0, 48.0));
            (BodyId::new(i, 0), circle)
        })
        .collect()
}

fn benchmark_rebuild(c: &mut Criterion) {
    let bodies = scattered_bodies(2_000);
    let mut index = SpatialIndex::new(128.0);

    let mut group = c.benchmark_group("rebuild");
    group.throughput(Throughput::Elements(2_000));
    group.bench_function("rebuild_2k_bodies", |b| {
        b.iter(|| {
            index.rebuild(black_box(bodies.iter().copied()));
            black_box(index.len())
        });
    });
    group.finish();
}

fn benchmark_query_circle(c: &mut Criterion) {
    let bodies = scattered_bodies(2_000);
    let mut index = SpatialIndex::new(128.0);
    index.rebuild(bodies.iter().copied());

    c.bench_function("query_circle_r150", |b| {
        let mut out = Vec::with_capacity(64);
        let mut x = 0.0f32;
        b.iter(|| {
            x = (x + 37.0) % 5000.0;
            index.query_circle_into(black_box(x), black_box(5000.0 - x), 150.0, &mut out);
            black_box(out.len())
        });
    });
}

fn benchmark_collision_pairs(c: &mut Criterion) {
    let bodies = scattered_bodies(2_000);
    let mut index = SpatialIndex::new(128.0);
    index.rebuild(bodies.iter().copied());

    c.bench_function("collision_pairs_2k", |b| {
        b.iter(|| black_box(index.collision_pairs().len()));
    });
}

fn benchmark_brute_force_baseline(c: &mut Criterion) {
    let bodies = scattered_bodies(2_000);

    c.bench_function("brute_force_query_r150", |b| {
        let mut x = 0.0f32;
        b.iter(|| {
            x = (x + 37.0) % 5000.0;
            let probe = Circle::at(x, 5000.0 - x, 150.0);
            black_box(
                bodies
                    .iter()
                    .filter(|(_, circle)| voidline_core::check_collision(probe, *circle))
                    .count(),
            )
        });
    });
}

criterion_group!(
    benches,
    benchmark_rebuild,
    benchmark_query_circle,
    benchmark_collision_pairs,
    benchmark_brute_force_baseline,
);

criterion_main!(benches);
