//! Benchmarks for the Lumen image pipeline.
//!
//! Run with: cargo bench -p lumen-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};
use lumen_core::{Config, DestinationPlanner, Driver, ExecutionMode, RgbaMatrix, Transform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

fn noise_image(seed: u64, w: u32, h: u32) -> DynamicImage {
    let mut rng = StdRng::seed_from_u64(seed);
    DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |_, _| {
        Rgba([rng.gen(), rng.gen(), rng.gen(), 255])
    }))
}

fn write_fixtures(dir: &Path, count: u64) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("bench{i:03}.png"));
            noise_image(i, 256, 192).save(&path).unwrap();
            path
        })
        .collect()
}

fn benchmark_modes(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_fixtures(dir.path(), 16);
    let output = dir.path().join("out");
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("batch_16_images");
    group.sample_size(10);
    for mode in [ExecutionMode::Concurrent, ExecutionMode::Sequential] {
        let driver = Driver::new(&Config::default(), DestinationPlanner::new(dir.path(), &output))
            .with_mode(mode);
        group.bench_with_input(BenchmarkId::from_parameter(mode), &paths, |b, paths| {
            b.iter(|| rt.block_on(driver.run(black_box(paths.clone()))))
        });
    }
    group.finish();
}

fn benchmark_transforms(c: &mut Criterion) {
    let img = noise_image(42, 512, 512);

    for transform in Transform::sequence(&Config::default().transforms) {
        c.bench_function(&format!("transform_{}", transform.name()), |b| {
            b.iter(|| transform.apply(black_box(&img)))
        });
    }
}

fn benchmark_blur(c: &mut Criterion) {
    let img = noise_image(7, 256, 256);
    let matrix = RgbaMatrix::from_image(&img);

    c.bench_function("gaussian_blur_7x7", |b| {
        b.iter(|| {
            let mut m = matrix.clone();
            m.gaussian_blur(black_box(7), 2.0);
            m
        })
    });
}

criterion_group!(
    benches,
    benchmark_modes,
    benchmark_transforms,
    benchmark_blur
);
criterion_main!(benches);
