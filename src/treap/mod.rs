//! Probabilistic binary search tree where each node also maintains the heap invariant on a
//! separately assigned priority.

mod node;
mod randomized;
mod tree;

pub use self::randomized::{PriorityGenerator, RandomPriority, RandomizedTreap, UniformPriorities};
pub use self::tree::Treap;

use std::error;
use std::fmt;
use std::result;

/// Number of nodes the node storage grows by when it runs out of room.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// `Treap::update_priority` was given entries with different keys.
    KeyMismatch,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::KeyMismatch => write!(f, "old and new entries must have the same key"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
