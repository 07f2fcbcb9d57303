//! A randomized balanced search tree (treap) that can be shared between threads.
//!
//! Entries pair a key with a priority. The tree keeps binary search order on keys and min-heap
//! order on priorities, so random priorities give an expected logarithmic height without any
//! explicit rebalancing. A many-readers/one-writer lock guards the whole structure.
//!
//! # Examples
//!
//! ```
//! use concurrent_treap::{Entry, Treap};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let treap = Arc::new(Treap::new());
//! let handles: Vec<_> = (0..4u32)
//!     .map(|id| {
//!         let treap = Arc::clone(&treap);
//!         thread::spawn(move || {
//!             for key in 0..25u32 {
//!                 treap.add(Entry::new(id * 100 + key, key * 7 % 13));
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(treap.size(), 100);
//! assert!(treap.check_treap_invariants());
//! ```

pub mod arena;
mod entry;
pub mod sync;
pub mod treap;

pub use crate::entry::Entry;
pub use crate::treap::{
    Error, PriorityGenerator, RandomPriority, RandomizedTreap, Result, Treap, UniformPriorities,
};
