/**
 * Performance benchmarks for blue-noise-stipple
 *
 * Run with:
 *   cargo bench
 *
 * View HTML reports in:
 *   target/criterion/report/index.html
 */

use blue_noise_stipple::{
    compute_importance, toroidal_gaussian_kernel, Grid, ImportanceParams, StippleConfig,
    StippleGenerator,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

/// Radial gradient test image: dark centre, light edges
fn radial(size: usize) -> Grid {
    let c = size as f32 / 2.0;
    let max_dist = (2.0 * c * c).sqrt();
    Grid::from_fn(size, size, |r, col| {
        let dy = r as f32 - c;
        let dx = col as f32 - c;
        (dx * dx + dy * dy).sqrt() / max_dist
    })
}

/// Benchmark importance map computation for different sizes
fn bench_importance(c: &mut Criterion) {
    let mut group = c.benchmark_group("importance");
    let params = ImportanceParams::default();

    for size in [64, 128, 256].iter() {
        let input = radial(*size);
        group.bench_with_input(BenchmarkId::new("radial", size), size, |b, _| {
            b.iter(|| black_box(compute_importance(&input, &params)));
        });
    }

    group.finish();
}

/// Benchmark kernel construction
fn bench_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel");

    for size in [64, 256].iter() {
        group.bench_with_input(BenchmarkId::new("toroidal", size), size, |b, &s| {
            b.iter(|| black_box(toroidal_gaussian_kernel(s, s, 0.9)));
        });
    }

    group.finish();
}

/// Benchmark stipple placement for different sizes
fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    group.sample_size(10);

    for size in [32, 64, 96].iter() {
        let input = radial(*size);
        let generator = StippleGenerator::new(StippleConfig::default()).unwrap();

        group.bench_with_input(BenchmarkId::new("size", size), size, |b, _| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                black_box(generator.generate_with_rng(&input, None, &mut rng).unwrap())
            });
        });
    }

    group.finish();
}

/// Benchmark different stipple densities
fn bench_percentages(c: &mut Criterion) {
    let mut group = c.benchmark_group("percentage");
    group.sample_size(10);
    let input = radial(48);

    for percentage in [0.02, 0.08, 0.2].iter() {
        let config = StippleConfig {
            percentage: *percentage,
            ..Default::default()
        };
        let generator = StippleGenerator::new(config).unwrap();

        group.bench_with_input(
            BenchmarkId::new("percentage", percentage),
            percentage,
            |b, _| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(42);
                    black_box(generator.generate_with_rng(&input, None, &mut rng).unwrap())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_importance,
    bench_kernel,
    bench_placement,
    bench_percentages
);
criterion_main!(benches);
