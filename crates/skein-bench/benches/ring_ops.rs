//! Criterion micro-benchmarks for single-ring operations.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use skein_bench::{apply_ops, filled_ring, random_ops};
use skein_pool::NodePool;
use skein_ring::{CloneOptions, ExtendOptions, Item, Position, Target};

/// Benchmark: append then pop the head on a 10K-member ring.
fn bench_append_pop_10k(c: &mut Criterion) {
    let mut pool = NodePool::new();
    let mut ring = filled_ring(&mut pool, "r", 10_000);
    c.bench_function("ring_append_pop_10k", |b| {
        b.iter(|| {
            ring.append(&mut pool, Item::Value(1)).unwrap();
            black_box(ring.pop(&mut pool, Target::Index(0)).unwrap());
        });
    });
}

/// Benchmark: insert and pop at the middle of a 10K-member ring.
fn bench_insert_middle_10k(c: &mut Criterion) {
    let mut pool = NodePool::new();
    let mut ring = filled_ring(&mut pool, "r", 10_000);
    c.bench_function("ring_insert_middle_10k", |b| {
        b.iter(|| {
            let at = ring.insert(&mut pool, Item::Value(7), Position::Index(5_000), false).unwrap();
            black_box(ring.pop(&mut pool, Target::Node(at.node)).unwrap());
        });
    });
}

/// Benchmark: index_of over a 10K-member ring (match near the tail).
fn bench_index_of_10k(c: &mut Criterion) {
    let mut pool = NodePool::new();
    let ring = filled_ring(&mut pool, "r", 10_000);
    c.bench_function("ring_index_of_10k", |b| {
        b.iter(|| black_box(ring.index_of(&pool, &9_990).unwrap()));
    });
}

/// Benchmark: reverse a 10K-member ring in place.
fn bench_reverse_10k(c: &mut Criterion) {
    let mut pool = NodePool::new();
    let mut ring = filled_ring(&mut pool, "r", 10_000);
    c.bench_function("ring_reverse_10k", |b| {
        b.iter(|| ring.reverse(&mut pool).unwrap());
    });
}

/// Benchmark: split a 10K-member ring in half and splice it back.
fn bench_split_extend_10k(c: &mut Criterion) {
    let mut pool = NodePool::new();
    let mut ring = filled_ring(&mut pool, "r", 10_000);
    c.bench_function("ring_split_extend_10k", |b| {
        b.iter(|| {
            let mut tail = ring.split(&mut pool, 5_000, Some("t".into())).unwrap();
            ring.extend(&mut pool, &mut tail, ExtendOptions::default()).unwrap();
        });
    });
}

/// Benchmark: clone a 1K-member ring into fresh nodes.
fn bench_clone_1k(c: &mut Criterion) {
    c.bench_function("ring_clone_1k", |b| {
        b.iter_batched(
            || {
                let mut pool = NodePool::new();
                let ring = filled_ring(&mut pool, "r", 1_000);
                (pool, ring)
            },
            |(mut pool, ring)| black_box(ring.clone_ring(&mut pool, CloneOptions::named("c")).unwrap()),
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: replay a seeded 1K-step edit mix on a 256-member ring.
fn bench_mixed_workload(c: &mut Criterion) {
    let ops = random_ops(42, 1_000, 256);
    c.bench_function("ring_mixed_1k_ops", |b| {
        b.iter_batched(
            || {
                let mut pool = NodePool::new();
                let ring = filled_ring(&mut pool, "r", 256);
                (pool, ring)
            },
            |(mut pool, mut ring)| black_box(apply_ops(&mut ring, &mut pool, &ops)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_append_pop_10k,
    bench_insert_middle_10k,
    bench_index_of_10k,
    bench_reverse_10k,
    bench_split_extend_10k,
    bench_clone_1k,
    bench_mixed_workload
);
criterion_main!(benches);
