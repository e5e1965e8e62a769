use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use fnv::FnvBuildHasher;
use indexed_min_heap::{HeapNode, IndexedMinHeap};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

const VERTICES: usize = 10_000;
const EDGES_PER_VERTEX: usize = 8;

fn random_graph() -> Vec<Vec<(usize, u64)>> {
    let mut rng = XorShiftRng::seed_from_u64(7);
    (0..VERTICES)
        .map(|_| {
            (0..EDGES_PER_VERTEX)
                .map(|_| (rng.gen_range(0, VERTICES), rng.gen_range(1, 100)))
                .collect()
        })
        .collect()
}

fn shortest_paths(graph: &[Vec<(usize, u64)>]) -> u64 {
    let mut queue = IndexedMinHeap::from_sorted_keys_with_hasher(
        0..graph.len(),
        u64::MAX,
        FnvBuildHasher::default(),
    );
    let _ = queue.insert_or_update(0, 0);

    let mut total = 0;
    while let Ok(HeapNode { key, value }) = queue.pop_min() {
        if value == u64::MAX {
            break;
        }
        total += value;
        for &(next, weight) in &graph[key] {
            if let Some(&known) = queue.get(&next) {
                if value + weight < known {
                    let _ = queue.insert_or_update(next, value + weight);
                }
            }
        }
    }
    total
}

fn bench_dijkstra(c: &mut Criterion) {
    let graph = random_graph();

    c.bench_function("dijkstra", |b| {
        b.iter(|| shortest_paths(black_box(&graph)))
    });
}

fn bench_insert_pop(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(11);
    let ops: Vec<(u32, u32)> = (0..VERTICES)
        .map(|_| (rng.gen_range(0, 4096), rng.gen_range(0, 1 << 20)))
        .collect();

    c.bench_function("insert_pop", |b| {
        b.iter(|| {
            let mut heap = IndexedMinHeap::with_capacity(4096);
            for &(key, value) in black_box(&ops) {
                let _ = heap.insert_or_update(key, value);
            }
            while heap.pop_min().is_ok() {}
        })
    });
}

criterion_group!(benches, bench_dijkstra, bench_insert_pop);
criterion_main!(benches);
