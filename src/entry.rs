use serde_derive::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A key paired with a priority, used to insert into and remove from a treap.
///
/// Entries are plain values and are never stored in the tree itself. Two entries are equal when
/// both their keys and their priorities are equal. Entries are ordered by priority first, so
/// sorting entries yields the order in which `Treap::top` would extract them; keys break ties.
///
/// # Examples
///
/// ```
/// use concurrent_treap::Entry;
///
/// let urgent = Entry::new("a", 1);
/// let lazy = Entry::new("b", 9);
/// assert!(urgent < lazy);
/// assert_eq!(urgent, Entry::new("a", 1));
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Entry<K, P> {
    pub key: K,
    pub priority: P,
}

impl<K, P> Entry<K, P> {
    pub fn new(key: K, priority: P) -> Self {
        Entry { key, priority }
    }
}

impl<K: Ord, P: Ord> Ord for Entry<K, P> {
    fn cmp(&self, other: &Entry<K, P>) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl<K: Ord, P: Ord> PartialOrd for Entry<K, P> {
    fn partial_cmp(&self, other: &Entry<K, P>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, P: Ord> PartialEq for Entry<K, P> {
    fn eq(&self, other: &Entry<K, P>) -> bool {
        self.key == other.key && self.priority == other.priority
    }
}

impl<K: Ord, P: Ord> Eq for Entry<K, P> {}
