//! B+tree micro-benchmarks.
//!
//! Measures the operations that dominate real workloads: bulk insert in
//! ascending and shuffled order, point lookup through lower_bound, and a
//! mixed insert/erase churn that keeps splits and merges busy.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pagemap::BtreeMap;

fn shuffled_keys(count: u32) -> Vec<u32> {
    // xorshift32 keeps the benchmark deterministic without a rand dep.
    let mut state = 0x9E37_79B9u32;
    let mut keys: Vec<u32> = (0..count).collect();
    for i in (1..keys.len()).rev() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        keys.swap(i, state as usize % (i + 1));
    }
    keys
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_insert");

    for &count in &[1_000u32, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("sequential", count),
            &count,
            |b, &count| {
                b.iter(|| {
                    let mut map: BtreeMap<u32, u32> = BtreeMap::new();
                    for k in 0..count {
                        map.insert(k, k).unwrap();
                    }
                    black_box(map.len())
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("shuffled", count), &count, |b, &count| {
            let keys = shuffled_keys(count);
            b.iter(|| {
                let mut map: BtreeMap<u32, u32> = BtreeMap::new();
                for &k in &keys {
                    map.insert(k, k).unwrap();
                }
                black_box(map.len())
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_lookup");

    let mut map: BtreeMap<u32, u32> = BtreeMap::new();
    for k in 0..100_000u32 {
        map.insert(k, k).unwrap();
    }
    let probes = shuffled_keys(100_000);

    group.throughput(Throughput::Elements(probes.len() as u64));
    group.bench_function("lower_bound", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for &k in &probes {
                if !map.lower_bound(black_box(k)).is_end() {
                    hits += 1;
                }
            }
            black_box(hits)
        });
    });

    group.bench_function("full_scan", |b| {
        b.iter(|| {
            let sum: u64 = map.iter().map(|(_, v)| v as u64).sum();
            black_box(sum)
        });
    });

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_churn");

    group.throughput(Throughput::Elements(20_000));
    group.bench_function("insert_erase_mixed", |b| {
        let keys = shuffled_keys(10_000);
        b.iter(|| {
            let mut map: BtreeMap<u32, u32> = BtreeMap::new();
            for &k in &keys {
                map.insert(k, k).unwrap();
            }
            for &k in &keys {
                map.erase(k);
            }
            black_box(map.is_empty())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_churn);
criterion_main!(benches);
