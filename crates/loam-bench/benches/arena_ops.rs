//! Criterion micro-benchmarks for arena allocation and per-tick housekeeping.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loam_bench::bench_memory;
use loam_core::Category;

fn bench_alloc(c: &mut Criterion) {
    c.bench_function("arena/alloc_64b_transient", |b| {
        let mut mem = bench_memory(64 * 1024 * 1024);
        b.iter(|| {
            let block = mem.alloc(black_box(64), Category::Transient).unwrap();
            black_box(block);
            // Keep the arena from filling up over the run.
            if mem.current_stats(Category::Transient).total_used > 32 * 1024 * 1024 {
                mem.post();
            }
        });
    });
}

fn bench_post(c: &mut Criterion) {
    c.bench_function("arena/post_tick", |b| {
        let mut mem = bench_memory(1024 * 1024);
        b.iter(|| {
            for _ in 0..64 {
                let _ = mem.alloc(256, Category::Transient).unwrap();
            }
            mem.post();
        });
    });
}

fn bench_realloc(c: &mut Criterion) {
    c.bench_function("arena/realloc_grow", |b| {
        let mut mem = bench_memory(64 * 1024 * 1024);
        let mut block = mem.alloc(64, Category::Transient).unwrap();
        b.iter(|| {
            block = mem.realloc(block, 64).unwrap();
            if mem.current_stats(Category::Transient).total_used > 32 * 1024 * 1024 {
                mem.post();
                block = mem.alloc(64, Category::Transient).unwrap();
            }
        });
    });
}

criterion_group!(benches, bench_alloc, bench_post, bench_realloc);
criterion_main!(benches);
