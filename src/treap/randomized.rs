use crate::entry::Entry;
use crate::treap::Treap;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, XorShiftRng};
use std::cmp::Ordering;
use std::vec::Vec;

/// A source of priorities for new treap entries.
pub trait PriorityGenerator {
    type Priority: Ord + Clone;

    fn next_priority(&mut self) -> Self::Priority;
}

/// A floating-point priority with a total order.
#[derive(Clone, Copy, Debug)]
pub struct RandomPriority(f64);

impl RandomPriority {
    pub fn new(value: f64) -> Self {
        RandomPriority(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Ord for RandomPriority {
    fn cmp(&self, other: &RandomPriority) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for RandomPriority {
    fn partial_cmp(&self, other: &RandomPriority) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RandomPriority {
    fn eq(&self, other: &RandomPriority) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RandomPriority {}

/// Generates priorities uniformly distributed in `[0, 1)`.
pub struct UniformPriorities<R: Rng> {
    rng: R,
}

impl<R: Rng> UniformPriorities<R> {
    pub fn new(rng: R) -> Self {
        UniformPriorities { rng }
    }
}

impl<R: Rng> PriorityGenerator for UniformPriorities<R> {
    type Priority = RandomPriority;

    fn next_priority(&mut self) -> RandomPriority {
        RandomPriority(self.rng.gen::<f64>())
    }
}

/// An ordered collection of elements backed by a `Treap` whose priorities are drawn at random.
///
/// Because every priority is independent of the element it belongs to, the expected height of
/// the tree is logarithmic in the number of elements regardless of insertion order.
///
/// # Examples
///
/// ```
/// use concurrent_treap::RandomizedTreap;
///
/// let t = RandomizedTreap::with_seed([1, 2, 3, 4]);
/// for element in 0..100 {
///     t.add(element);
/// }
///
/// assert_eq!(t.size(), 100);
/// assert_eq!(t.min(), Some(0));
/// assert_eq!(t.max(), Some(99));
/// assert!(t.remove(&50));
/// assert_eq!(t.search(&50), None);
/// assert!(t.check_treap_invariants());
/// ```
pub struct RandomizedTreap<T, G: PriorityGenerator = UniformPriorities<XorShiftRng>> {
    treap: Treap<T, G::Priority>,
    generator: Mutex<G>,
}

impl<T: Ord + Clone> RandomizedTreap<T> {
    /// Constructs a new, empty `RandomizedTreap<T>` with a generator seeded from the thread-local
    /// random number generator.
    pub fn new() -> Self {
        Self::with_generator(UniformPriorities::new(rand::weak_rng()))
    }

    /// Constructs a new, empty `RandomizedTreap<T>` whose priorities are fully determined by
    /// `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `seed` is all zeroes.
    pub fn with_seed(seed: [u32; 4]) -> Self {
        Self::with_generator(UniformPriorities::new(XorShiftRng::from_seed(seed)))
    }
}

impl<T: Ord + Clone> Default for RandomizedTreap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, G> RandomizedTreap<T, G>
where
    T: Ord + Clone,
    G: PriorityGenerator,
{
    pub fn with_generator(generator: G) -> Self {
        RandomizedTreap {
            treap: Treap::new(),
            generator: Mutex::new(generator),
        }
    }

    /// Inserts `element` with a freshly generated priority. Always returns `true`.
    pub fn add(&self, element: T) -> bool {
        let priority = self.generator.lock().next_priority();
        self.treap.add(Entry::new(element, priority))
    }

    /// Removes one occurrence of `element`. Returns `false` if it is absent.
    pub fn remove(&self, element: &T) -> bool {
        self.treap.remove_key(element)
    }

    pub fn clear(&self) {
        self.treap.clear()
    }

    pub fn min(&self) -> Option<T> {
        self.treap.min()
    }

    pub fn max(&self) -> Option<T> {
        self.treap.max()
    }

    pub fn search(&self, element: &T) -> Option<T> {
        self.treap.search(element)
    }

    pub fn is_empty(&self) -> bool {
        self.treap.is_empty()
    }

    pub fn size(&self) -> usize {
        self.treap.size()
    }

    pub fn height(&self) -> usize {
        self.treap.height()
    }

    /// Returns every element with its priority, in element order.
    pub fn entries(&self) -> Vec<Entry<T, G::Priority>> {
        self.treap.entries()
    }

    pub fn check_treap_invariants(&self) -> bool {
        self.treap.check_treap_invariants()
    }

    pub fn check_bst_invariants(&self) -> bool {
        self.treap.check_bst_invariants()
    }
}

#[cfg(test)]
mod tests {
    use super::{PriorityGenerator, RandomPriority, RandomizedTreap};

    struct Descending(u32);

    impl PriorityGenerator for Descending {
        type Priority = u32;

        fn next_priority(&mut self) -> u32 {
            self.0 -= 1;
            self.0
        }
    }

    #[test]
    fn test_random_priority_order() {
        assert!(RandomPriority::new(0.25) < RandomPriority::new(0.5));
        assert_eq!(RandomPriority::new(0.5), RandomPriority::new(0.5));
        assert_eq!(RandomPriority::new(0.75).value(), 0.75);
    }

    #[test]
    fn test_add_remove() {
        let treap = RandomizedTreap::with_seed([1, 1, 1, 1]);
        for element in 0..1000 {
            assert!(treap.add(element));
        }
        assert_eq!(treap.size(), 1000);
        assert_eq!(treap.min(), Some(0));
        assert_eq!(treap.max(), Some(999));
        assert!(treap.height() < 100);
        assert!(treap.check_treap_invariants());
        assert!(treap.check_bst_invariants());

        for element in (0..1000).filter(|element| element % 2 == 0) {
            assert!(treap.remove(&element));
        }
        assert!(!treap.remove(&0));
        assert_eq!(treap.size(), 500);
        assert_eq!(treap.search(&2), None);
        assert_eq!(treap.search(&3), Some(3));
        assert!(treap.check_treap_invariants());

        treap.clear();
        assert!(treap.is_empty());
    }

    #[test]
    fn test_same_seed_same_shape() {
        let first = RandomizedTreap::with_seed([3, 1, 4, 1]);
        let second = RandomizedTreap::with_seed([3, 1, 4, 1]);
        for element in 0..200 {
            first.add(element);
            second.add(element);
        }
        assert_eq!(first.height(), second.height());
        assert_eq!(first.entries(), second.entries());
    }

    #[test]
    fn test_custom_generator() {
        let treap = RandomizedTreap::with_generator(Descending(100));
        for element in 0..10 {
            treap.add(element);
        }
        // Each new element outranks everything before it, so the tree degenerates into a chain.
        assert_eq!(treap.height(), 10);
        assert!(treap.check_treap_invariants());
    }
}
