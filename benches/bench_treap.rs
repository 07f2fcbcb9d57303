use concurrent_treap::{Entry, RandomizedTreap, Treap};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::collections::BTreeMap;

const NUM_OF_OPERATIONS: usize = 1000;

fn bench_btreemap_insert(c: &mut Criterion) {
    c.bench_function("bench btreemap insert", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let mut map = BTreeMap::new();
            for _ in 0..NUM_OF_OPERATIONS {
                let key = rng.next_u32();
                let priority = rng.next_u32();

                map.insert(key, priority);
            }
        })
    });
}

fn bench_btreemap_get(c: &mut Criterion) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = BTreeMap::new();
    let mut keys = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.next_u32();
        let priority = rng.next_u32();

        map.insert(key, priority);
        keys.push(key);
    }

    c.bench_function("bench btreemap get", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_treap_add(c: &mut Criterion) {
    c.bench_function("bench treap add", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let treap = Treap::new();
            for _ in 0..NUM_OF_OPERATIONS {
                let key = rng.next_u32();
                let priority = rng.next_u32();

                treap.add(Entry::new(key, priority));
            }
        })
    });
}

fn bench_treap_search(c: &mut Criterion) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let treap = Treap::new();
    let mut keys = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.next_u32();
        let priority = rng.next_u32();

        treap.add(Entry::new(key, priority));
        keys.push(key);
    }

    c.bench_function("bench treap search", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(treap.search(key));
            }
        })
    });
}

fn bench_treap_top(c: &mut Criterion) {
    c.bench_function("bench treap top", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let treap = Treap::new();
            for _ in 0..NUM_OF_OPERATIONS {
                treap.add(Entry::new(rng.next_u32(), rng.next_u32()));
            }
            while let Some(entry) = treap.top() {
                black_box(entry);
            }
        })
    });
}

fn bench_randomized_treap_sorted_add(c: &mut Criterion) {
    c.bench_function("bench randomized treap sorted add", |b| {
        b.iter(|| {
            let treap = RandomizedTreap::with_seed([1, 1, 1, 1]);
            for element in 0..NUM_OF_OPERATIONS {
                treap.add(element);
            }
            black_box(treap.height());
        })
    });
}

criterion_group!(
    benches,
    bench_btreemap_insert,
    bench_btreemap_get,
    bench_treap_add,
    bench_treap_search,
    bench_treap_top,
    bench_randomized_treap_sorted_add,
);
criterion_main!(benches);
