//! Benchmark for zone generation.
//!
//! TARGET: one regular zone in well under a frame, so generation can run
//! on a loading screen without a worker
//!
//! Run with: cargo bench --package voidline_procedural --bench zone_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voidline_core::ZoneSeed;
use voidline_procedural::{Difficulty, GenerateOptions, TierConfig, ZoneGenerator, ZoneModifier};

fn benchmark_generate(c: &mut Criterion) {
    let generator = ZoneGenerator::default();
    let mut group = c.benchmark_group("generate");

    for (name, tier) in [
        ("asteroid_belt", TierConfig::asteroid_belt()),
        ("derelict_fleet", TierConfig::derelict_fleet()),
        ("nebula_core", TierConfig::nebula_core()),
    ] {
        for depth in [1u32, 6] {
            let options = GenerateOptions::at_depth(depth);
            group.bench_with_input(BenchmarkId::new(name, depth), &options, |b, options| {
                let mut seed = 0u32;
                b.iter(|| {
                    seed = seed.wrapping_add(1);
                    black_box(generator.generate(&tier, ZoneSeed::new(seed), options))
                });
            });
        }
    }
    group.finish();
}

fn benchmark_worst_case(c: &mut Criterion) {
    let generator = ZoneGenerator::default();
    let tier = TierConfig::derelict_fleet();
    let options = GenerateOptions {
        depth: 20,
        modifiers: vec![ZoneModifier::Swarming, ZoneModifier::EliteHunt, ZoneModifier::Fortified],
        difficulty: Difficulty::Nightmare,
    };

    c.bench_function("generate_capped_nightmare", |b| {
        b.iter(|| black_box(generator.generate(&tier, black_box(ZoneSeed::new(12345)), &options)));
    });
}

fn benchmark_boss(c: &mut Criterion) {
    let generator = ZoneGenerator::default();
    let tier = TierConfig::nebula_core();
    let options = GenerateOptions::at_depth(10);

    c.bench_function("generate_boss", |b| {
        b.iter(|| black_box(generator.generate_boss(&tier, black_box(ZoneSeed::new(7)), &options)));
    });
}

criterion_group!(benches, benchmark_generate, benchmark_worst_case, benchmark_boss);
criterion_main!(benches);
