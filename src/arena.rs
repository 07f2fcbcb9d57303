//! Chunked slot allocator used as the backing store for tree nodes.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A stable handle to an object stored in a `TypedArena<T>`.
///
/// Handles are plain values: copying one never copies or claims the object it refers to, which
/// makes them suitable as non-owning back-references between nodes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk: usize,
    slot: usize,
}

enum Slot<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// An allocator for a single type of object that hands out `Handle`s instead of references.
///
/// Storage grows one chunk at a time so existing objects are never moved. Freed slots are
/// threaded onto a free list and reused before any new slot is appended.
///
/// # Examples
///
/// ```
/// use concurrent_treap::arena::TypedArena;
///
/// let mut arena = TypedArena::new(16);
///
/// let x = arena.allocate("a");
/// assert_eq!(arena[x], "a");
///
/// arena[x] = "b";
/// assert_eq!(arena.free(x), "b");
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    free_head: Option<Handle>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
}

impl<T> TypedArena<T> {
    /// Constructs a new, empty `TypedArena<T>` that grows by `chunk_size` slots at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Expected a non-zero chunk size.");
        TypedArena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
        }
    }

    fn slot(&self, handle: Handle) -> Option<&Slot<T>> {
        self.chunks
            .get(handle.chunk)
            .and_then(|chunk| chunk.get(handle.slot))
    }

    fn slot_mut(&mut self, handle: Handle) -> Option<&mut Slot<T>> {
        self.chunks
            .get_mut(handle.chunk)
            .and_then(|chunk| chunk.get_mut(handle.slot))
    }

    /// Stores `value` in the arena and returns its handle.
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;

        if let Some(handle) = self.free_head.take() {
            let slot = self
                .slot_mut(handle)
                .expect("Expected free list to point into the arena.");
            match mem::replace(slot, Slot::Occupied(value)) {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => panic!("Expected free list entry to be vacant."),
            }
            return handle;
        }

        let needs_chunk = match self.chunks.last() {
            Some(chunk) => chunk.len() == self.chunk_size,
            None => true,
        };
        if needs_chunk {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
        }

        let chunk = self.chunks.len() - 1;
        let slots = &mut self.chunks[chunk];
        slots.push(Slot::Occupied(value));
        Handle {
            chunk,
            slot: slots.len() - 1,
        }
    }

    /// Removes the object behind `handle` from the arena and returns it. The slot is reused by
    /// the next allocation.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to a live object.
    pub fn free(&mut self, handle: Handle) -> T {
        let next = self.free_head;
        let slot = self
            .slot_mut(handle)
            .expect("Error: attempting to free a handle outside the arena.");
        match mem::replace(slot, Slot::Vacant(next)) {
            Slot::Occupied(value) => {
                self.free_head = Some(handle);
                self.len -= 1;
                value
            },
            Slot::Vacant(previous) => {
                *slot = Slot::Vacant(previous);
                panic!("Error: attempting to free a vacant slot.");
            },
        }
    }

    /// Returns a reference to the object behind `handle`, or `None` if the slot is vacant or
    /// out of bounds.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slot(handle) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the object behind `handle`, or `None` if the slot is
    /// vacant or out of bounds.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slot_mut(handle) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots added each time the arena grows.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle refers to a vacant slot.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle refers to a vacant slot.")
    }
}
