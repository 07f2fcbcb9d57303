use crate::arena::Handle;
use crate::entry::Entry;
use crate::sync::ReadWriteLock;
use crate::treap::node::{self, Detached, Node, NodeArena};
use crate::treap::{Error, Result, DEFAULT_CHUNK_SIZE};
use log::{debug, trace};
use std::mem;
use std::vec::Vec;

struct Tree<K, P> {
    arena: NodeArena<K, P>,
    root: Option<Handle>,
}

impl<K, P> Tree<K, P> {
    fn new(chunk_size: usize) -> Self {
        Tree {
            arena: NodeArena::new(chunk_size),
            root: None,
        }
    }

    // Rotations can move any node to the top, so the root is found again by walking up from a
    // node that is known to still be in the tree.
    fn reanchor(&mut self, from: Option<Handle>) {
        self.root = match from {
            Some(handle) => Some(node::root_of(&self.arena, handle)),
            None => None,
        };
    }
}

/// A treap that can be shared between threads.
///
/// A treap is a binary search tree ordered by key that also keeps a heap order on priorities:
/// no node has a child with a strictly higher rank than itself, where lower priority values rank
/// higher. With independently random priorities the expected height is logarithmic in the
/// number of entries, without any explicit rebalancing. Equal keys are allowed and are kept as
/// separate entries.
///
/// Every operation runs under a `ReadWriteLock`: queries take it in read mode and may run in
/// parallel, while anything that can restructure the tree takes it in write mode.
///
/// # Examples
///
/// ```
/// use concurrent_treap::{Entry, Treap};
///
/// let t = Treap::new();
/// t.add(Entry::new(50, 30));
/// t.add(Entry::new(30, 20));
/// t.add(Entry::new(20, 10));
///
/// assert_eq!(t.min(), Some(20));
/// assert_eq!(t.max(), Some(50));
/// assert_eq!(t.peek(), Some(Entry::new(20, 10)));
///
/// assert_eq!(t.top(), Some(Entry::new(20, 10)));
/// assert_eq!(t.size(), 2);
/// assert!(t.remove_key(&50));
/// assert!(!t.remove_key(&50));
/// ```
pub struct Treap<K, P> {
    tree: ReadWriteLock<Tree<K, P>>,
}

impl<K, P> Treap<K, P>
where
    K: Ord + Clone,
    P: Ord + Clone,
{
    /// Constructs a new, empty `Treap<K, P>`.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `Treap<K, P>` whose node storage grows by `chunk_size` nodes at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Treap {
            tree: ReadWriteLock::new(Tree::new(chunk_size)),
        }
    }

    /// Inserts an entry. Entries with a key already in the treap are kept alongside the existing
    /// ones, so this always returns `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use concurrent_treap::{Entry, Treap};
    ///
    /// let t = Treap::new();
    /// assert!(t.add(Entry::new(1, 5)));
    /// assert!(t.add(Entry::new(1, 3)));
    /// assert_eq!(t.size(), 2);
    /// ```
    pub fn add(&self, entry: Entry<K, P>) -> bool {
        let mut guard = self.tree.write();
        let tree = &mut *guard;
        let Entry { key, priority } = entry;
        let anchor = match tree.root {
            Some(root) => node::add(&mut tree.arena, root, key, priority),
            None => tree.arena.allocate(Node::new(key, priority, None)),
        };
        tree.reanchor(Some(anchor));
        trace!("added entry, {} nodes", tree.arena.len());
        true
    }

    /// Removes an entry with `key`, whatever its priority. Returns `false` if there is no such
    /// key.
    pub fn remove_key(&self, key: &K) -> bool {
        let mut guard = self.tree.write();
        let tree = &mut *guard;
        let found = match tree.root {
            Some(root) => node::search(&tree.arena, root, key, None),
            None => None,
        };
        match found {
            Some(handle) => {
                let detached = node::detach(&mut tree.arena, handle);
                tree.reanchor(detached.anchor);
                trace!("removed key, {} nodes", tree.arena.len());
                true
            },
            None => false,
        }
    }

    /// Removes the entry matching both the key and the priority of `entry`. Returns `false` if
    /// there is no such entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use concurrent_treap::{Entry, Treap};
    ///
    /// let t = Treap::new();
    /// t.add(Entry::new(1, 5));
    /// assert!(!t.remove(&Entry::new(1, 6)));
    /// assert!(t.remove(&Entry::new(1, 5)));
    /// assert!(t.is_empty());
    /// ```
    pub fn remove(&self, entry: &Entry<K, P>) -> bool {
        let mut guard = self.tree.write();
        let tree = &mut *guard;
        let root = match tree.root {
            Some(root) => root,
            None => return false,
        };
        match node::remove(&mut tree.arena, root, &entry.key, &entry.priority) {
            Some(detached) => {
                tree.reanchor(detached.anchor);
                trace!("removed entry, {} nodes", tree.arena.len());
                true
            },
            None => false,
        }
    }

    /// Changes the priority of the entry matching `old_entry` to the priority of `new_entry`,
    /// moving it up or down to restore the heap order.
    ///
    /// Returns `Ok(false)` if the priorities are equal or no entry matches `old_entry`.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyMismatch` if the two entries have different keys. The treap is left
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use concurrent_treap::{Entry, Treap};
    ///
    /// let t = Treap::new();
    /// t.add(Entry::new(1, 1));
    /// t.add(Entry::new(2, 2));
    ///
    /// assert_eq!(t.update_priority(&Entry::new(2, 2), Entry::new(2, 0)), Ok(true));
    /// assert_eq!(t.peek(), Some(Entry::new(2, 0)));
    /// assert!(t.update_priority(&Entry::new(2, 0), Entry::new(1, 0)).is_err());
    /// ```
    pub fn update_priority(&self, old_entry: &Entry<K, P>, new_entry: Entry<K, P>) -> Result<bool> {
        if old_entry.key != new_entry.key {
            return Err(Error::KeyMismatch);
        }
        if old_entry.priority == new_entry.priority {
            return Ok(false);
        }

        let mut guard = self.tree.write();
        let tree = &mut *guard;
        let found = match tree.root {
            Some(root) => node::search(&tree.arena, root, &old_entry.key, Some(&old_entry.priority)),
            None => None,
        };
        let handle = match found {
            Some(handle) => handle,
            None => return Ok(false),
        };

        let rises = node::outranks(&new_entry.priority, &old_entry.priority);
        tree.arena[handle].priority = new_entry.priority;
        let local_root = if rises {
            node::bubble_up(&mut tree.arena, handle)
        } else {
            node::push_down(&mut tree.arena, handle)
        };
        tree.reanchor(Some(local_root));
        trace!("updated priority, rises: {}", rises);
        Ok(true)
    }

    /// Removes and returns the highest ranked entry, i.e. the one with the lowest priority value.
    /// Returns `None` if the treap is empty.
    pub fn top(&self) -> Option<Entry<K, P>> {
        let mut guard = self.tree.write();
        let tree = &mut *guard;
        let root = tree.root?;
        let Detached { node: removed, anchor } = node::detach(&mut tree.arena, root);
        tree.reanchor(anchor);
        trace!("extracted top entry, {} nodes", tree.arena.len());
        Some(Entry::new(removed.key, removed.priority))
    }

    /// Returns a copy of the highest ranked entry without removing it.
    pub fn peek(&self) -> Option<Entry<K, P>> {
        let tree = self.tree.read();
        tree.root.map(|root| {
            let root_node = &tree.arena[root];
            Entry::new(root_node.key.clone(), root_node.priority.clone())
        })
    }

    /// Returns the minimum key, or `None` if the treap is empty.
    pub fn min(&self) -> Option<K> {
        let tree = self.tree.read();
        tree.root.map(|root| node::min(&tree.arena, root).clone())
    }

    /// Returns the maximum key, or `None` if the treap is empty.
    pub fn max(&self) -> Option<K> {
        let tree = self.tree.read();
        tree.root.map(|root| node::max(&tree.arena, root).clone())
    }

    /// Returns the stored key equal to `key`, or `None` if it is absent.
    pub fn search(&self, key: &K) -> Option<K> {
        let tree = self.tree.read();
        tree.root
            .and_then(|root| node::search(&tree.arena, root, key, None))
            .map(|handle| tree.arena[handle].key.clone())
    }

    /// Checks if an entry with both the key and the priority of `entry` exists.
    pub fn contains(&self, entry: &Entry<K, P>) -> bool {
        let tree = self.tree.read();
        tree.root
            .and_then(|root| node::search(&tree.arena, root, &entry.key, Some(&entry.priority)))
            .is_some()
    }

    /// Returns the number of entries, counted by walking the tree.
    pub fn size(&self) -> usize {
        let tree = self.tree.read();
        tree.root.map_or(0, |root| node::size(&tree.arena, root))
    }

    /// Returns the number of nodes on the longest root-to-leaf path. An empty treap has height 0.
    pub fn height(&self) -> usize {
        let tree = self.tree.read();
        tree.root.map_or(0, |root| node::height(&tree.arena, root))
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().root.is_none()
    }

    /// Returns a copy of every entry in key order.
    pub fn entries(&self) -> Vec<Entry<K, P>> {
        let tree = self.tree.read();
        match tree.root {
            Some(root) => node::in_order(&tree.arena, root)
                .into_iter()
                .map(|handle| {
                    let curr = &tree.arena[handle];
                    Entry::new(curr.key.clone(), curr.priority.clone())
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Removes every entry.
    ///
    /// The tree is detached under the write lock; its links are severed after the lock is
    /// released, since nothing can reach the detached nodes through the treap anymore.
    pub fn clear(&self) {
        let mut guard = self.tree.write();
        let chunk_size = guard.arena.chunk_size();
        let detached = mem::replace(&mut *guard, Tree::new(chunk_size));
        drop(guard);

        let Tree { mut arena, root } = detached;
        if let Some(root) = root {
            let released = node::clean_up(&mut arena, root);
            debug!("cleared treap, released {} nodes", released);
        }
    }

    /// Checks that keys are in order, that parent references are consistent, and that no entry
    /// outranks its parent.
    pub fn check_treap_invariants(&self) -> bool {
        let tree = self.tree.read();
        tree.root
            .map_or(true, |root| node::check_treap_invariants(&tree.arena, root))
    }

    /// Checks only that keys are in order and that parent references are consistent.
    pub fn check_bst_invariants(&self) -> bool {
        let tree = self.tree.read();
        tree.root
            .map_or(true, |root| node::check_bst_invariants(&tree.arena, root))
    }
}

impl<K, P> Default for Treap<K, P>
where
    K: Ord + Clone,
    P: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
