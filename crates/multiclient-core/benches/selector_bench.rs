// Criterion benchmarks for multiclient-core
//
// Run benchmarks with:
//   cargo bench -p multiclient-core
//
// For detailed output with plots:
//   cargo bench -p multiclient-core -- --save-baseline main

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use multiclient_common::{Selection, SelectionPolicy};
use multiclient_core::{select_workers, HealthChecker, Worker, WorkerStatus};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use tokio::time::Instant;

/// Every other worker alive, every fourth archival.
fn fleet(size: usize) -> Vec<WorkerStatus> {
    (0..size)
        .map(|i| WorkerStatus::new(i, i % 2 == 0, i % 4 == 0))
        .collect()
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");

    for size in [4, 16, 64, 256].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let workers = fleet(size);
            let selection = Selection::new(SelectionPolicy::Broadcast);
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| select_workers(black_box(&workers), black_box(&selection), &mut rng));
        });
    }

    group.bench_function("archival_64", |b| {
        let workers = fleet(64);
        let selection = Selection::new(SelectionPolicy::Broadcast).archival();
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| select_workers(black_box(&workers), black_box(&selection), &mut rng));
    });

    group.finish();
}

fn bench_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("single");

    for size in [4, 16, 64, 256].iter() {
        group.bench_with_input(BenchmarkId::new("random", size), size, |b, &size| {
            let workers = fleet(size);
            let selection = Selection::new(SelectionPolicy::Single(None));
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| select_workers(black_box(&workers), black_box(&selection), &mut rng));
        });
    }

    group.bench_function("pinned_64", |b| {
        let workers = fleet(64);
        let selection = Selection::new(SelectionPolicy::Single(Some(42)));
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| select_workers(black_box(&workers), black_box(&selection), &mut rng));
    });

    group.finish();
}

fn bench_multiple(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiple");

    for count in [1, 3, 8, 32].iter() {
        group.bench_with_input(BenchmarkId::new("count", count), count, |b, &count| {
            let workers = fleet(64);
            let selection = Selection::new(SelectionPolicy::MultipleCount(count));
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| select_workers(black_box(&workers), black_box(&selection), &mut rng));
        });
    }

    group.bench_function("indices_64", |b| {
        let workers = fleet(64);
        let requested: BTreeSet<usize> = (0..64).step_by(3).collect();
        let selection = Selection::new(SelectionPolicy::MultipleIndices(requested));
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| select_workers(black_box(&workers), black_box(&selection), &mut rng));
    });

    group.finish();
}

fn bench_health_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("health_pass");

    for size in [4, 16, 64, 256].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let checker = HealthChecker::default();
            let now = Instant::now();
            b.iter(|| {
                let mut workers: Vec<Worker<()>> = (0..size).map(|_| Worker::new(())).collect();
                black_box(checker.due_probes(&mut workers, now))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_broadcast,
    bench_single,
    bench_multiple,
    bench_health_pass,
);
criterion_main!(benches);
