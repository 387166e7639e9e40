//! Benchmarks for the vintage processing backends
//!
//! Run with: cargo bench -p vintage-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vintage_core::{process, Backend, NoiseGenerator, PixelBuffer};

/// Benchmark the full effect for each backend across worker counts
fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");
    group.sample_size(20);

    for (width, height) in [(800u32, 600u32), (1920, 1080)] {
        let source = PixelBuffer::gradient(width, height).unwrap();
        group.throughput(Throughput::Elements(source.pixel_count() as u64));

        for backend in Backend::ALL {
            for workers in [1usize, 4, 16] {
                group.bench_with_input(
                    BenchmarkId::new(
                        format!("{}/{}t", backend.tag(), workers),
                        format!("{}x{}", width, height),
                    ),
                    &workers,
                    |b, &workers| {
                        b.iter(|| {
                            process(black_box(&source), workers, black_box(0.5), backend)
                                .map(|out| black_box(out.into_bytes()))
                        });
                    },
                );
            }
        }
    }

    group.finish();
}

/// Benchmark raw noise generation
fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("noise");
    let samples = 1_000_000usize;
    group.throughput(Throughput::Elements(samples as u64));

    group.bench_function("next_sample", |b| {
        b.iter(|| {
            let mut rng = NoiseGenerator::new(black_box(3));
            let mut acc = 0i64;
            for _ in 0..samples {
                acc += rng.next_sample() as i64;
            }
            black_box(acc)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_process, bench_noise);

criterion_main!(benches);
