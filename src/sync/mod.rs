//! Synchronization primitives used to share a treap between threads.

mod rw_lock;

pub use self::rw_lock::{ReadGuard, ReadWriteLock, WriteGuard};
