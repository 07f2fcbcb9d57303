use concurrent_treap::RandomizedTreap;
use rand::{Rng, SeedableRng, XorShiftRng};
use std::sync::Arc;
use std::thread;
use std::vec::Vec;

#[test]
fn int_test_randomized_treap() {
    let mut rng = XorShiftRng::from_seed([1, 1, 1, 1]);
    let treap = RandomizedTreap::with_seed([2, 2, 2, 2]);
    let mut expected = Vec::new();
    for _ in 0..10_000 {
        let element = rng.gen::<u32>();
        if treap.search(&element).is_none() {
            treap.add(element);
            expected.push(element);
        }
    }

    expected.sort();
    assert_eq!(treap.size(), expected.len());
    assert_eq!(treap.min(), Some(expected[0]));
    assert_eq!(treap.max(), Some(expected[expected.len() - 1]));
    assert!(treap.check_treap_invariants());

    let elements: Vec<u32> = treap.entries().into_iter().map(|entry| entry.key).collect();
    assert_eq!(elements, expected);

    rng.shuffle(&mut expected);
    for element in expected.drain(..5_000) {
        assert!(treap.remove(&element));
        assert!(!treap.remove(&element));
    }
    assert_eq!(treap.size(), expected.len());
    assert!(treap.check_bst_invariants());
    assert!(treap.check_treap_invariants());
}

#[test]
fn int_test_sorted_input_stays_shallow() {
    let treap = RandomizedTreap::with_seed([7, 7, 7, 7]);
    for element in 0..50_000u32 {
        treap.add(element);
    }
    assert_eq!(treap.size(), 50_000);
    assert!(treap.height() < 200);
}

#[test]
fn int_test_shared_between_threads() {
    let treap = Arc::new(RandomizedTreap::new());
    let handles: Vec<_> = (0..4u32)
        .map(|id| {
            let treap = Arc::clone(&treap);
            thread::spawn(move || {
                for element in 0..1_000u32 {
                    treap.add(id * 10_000 + element);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(treap.size(), 4_000);
    assert_eq!(treap.min(), Some(0));
    assert_eq!(treap.max(), Some(30_999));
    assert!(treap.check_treap_invariants());

    treap.clear();
    assert!(treap.is_empty());
}
