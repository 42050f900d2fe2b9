use std::collections::BinaryHeap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{seq::SliceRandom, SeedableRng};
use std::cmp::Reverse;
use strategy_collections::*;

fn pq_add_drain(v: &[u32]) -> u64 {
    let mut queue = PriorityQueue::new();
    for x in v {
        queue.add(*x);
    }
    let mut res = 0u64;
    while let Ok(x) = queue.remove_first() {
        res += u64::from(x);
    }
    res
}

fn pq_add_all_drain(v: &[u32]) -> u64 {
    let mut queue = PriorityQueue::new();
    queue.add_all(v.iter().cloned());
    queue.into_sorted_vec().into_iter().map(u64::from).sum()
}

fn bh_add_drain(v: &[u32]) -> u64 {
    let mut heap = BinaryHeap::new();
    for x in v {
        heap.push(Reverse(*x));
    }
    let mut res = 0u64;
    while let Some(Reverse(x)) = heap.pop() {
        res += u64::from(x);
    }
    res
}

fn pq_remove(queue: &PriorityQueue<u32>, values: &[u32]) -> usize {
    let mut queue = queue.clone();
    values.iter().filter(|x| queue.remove(x)).count()
}

fn add_drain_bench(c: &mut Criterion, title: &str, range: impl Iterator<Item = u32>) {
    let mut group = c.benchmark_group(format!("Add and drain {}", title));
    let mut rand = rand::rngs::StdRng::from_seed([0u8; 32]);
    for i in range {
        let mut values = (0..i).collect::<Vec<_>>();
        values.shuffle(&mut rand);

        group.bench_with_input(
            BenchmarkId::new("PriorityQueue<u32> add", i),
            &values,
            |b, values| b.iter(|| pq_add_drain(black_box(values))),
        );

        group.bench_with_input(
            BenchmarkId::new("PriorityQueue<u32> add_all", i),
            &values,
            |b, values| b.iter(|| pq_add_all_drain(black_box(values))),
        );

        group.bench_with_input(
            BenchmarkId::new("BinaryHeap<Reverse<u32>> push", i),
            &values,
            |b, values| b.iter(|| bh_add_drain(black_box(values))),
        );
    }
}

fn remove_bench(c: &mut Criterion, title: &str, range: impl Iterator<Item = u32>) {
    let mut group = c.benchmark_group(format!("Remove {}", title));
    let mut rand = rand::rngs::StdRng::from_seed([0u8; 32]);
    for i in range {
        let mut values = (0..i).collect::<Vec<_>>();
        values.shuffle(&mut rand);
        let remove = values.iter().step_by(3).cloned().collect::<Vec<_>>();
        let queue: PriorityQueue<u32> = values.iter().cloned().collect();
        group.bench_with_input(
            BenchmarkId::new("PriorityQueue<u32> remove every third", i),
            &(queue, remove),
            |b, input| b.iter(|| pq_remove(black_box(&input.0), &input.1)),
        );
    }
}

pub fn add_drain_small(c: &mut Criterion) {
    add_drain_bench(c, "small", 1..=10)
}
pub fn add_drain_medium(c: &mut Criterion) {
    add_drain_bench(c, "medium", (100..=1000).step_by(100))
}
pub fn remove_medium(c: &mut Criterion) {
    remove_bench(c, "medium", (10..=100).step_by(10))
}

criterion_group!(benches, add_drain_small, add_drain_medium, remove_medium);
criterion_main!(benches);
