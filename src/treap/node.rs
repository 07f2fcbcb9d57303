use crate::arena::{Handle, TypedArena};
use std::cmp::{self, Ordering};
use std::vec::Vec;

pub type NodeArena<K, P> = TypedArena<Node<K, P>>;

/// A struct representing an internal node of a treap.
///
/// Children are owned through the arena by exactly one parent (or by the tree if the node is the
/// root). `parent` is an observational back-reference used to find the root again after
/// rotations; it never confers ownership.
pub struct Node<K, P> {
    pub key: K,
    pub priority: P,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
    pub parent: Option<Handle>,
}

/// A node that has been unlinked from the tree, together with a node still in the tree from
/// which the root can be found again. `anchor` is `None` when the tree became empty.
pub struct Detached<K, P> {
    pub node: Node<K, P>,
    pub anchor: Option<Handle>,
}

impl<K, P> Node<K, P> {
    pub fn new(key: K, priority: P, parent: Option<Handle>) -> Self {
        Node {
            key,
            priority,
            left: None,
            right: None,
            parent,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Returns `true` if `first` ranks strictly higher than `second`. Lower values rank higher.
pub fn outranks<P: Ord>(first: &P, second: &P) -> bool {
    first < second
}

pub fn is_left_child<K, P>(arena: &NodeArena<K, P>, handle: Handle) -> bool {
    arena[handle]
        .parent
        .map_or(false, |parent| arena[parent].left == Some(handle))
}

pub fn is_right_child<K, P>(arena: &NodeArena<K, P>, handle: Handle) -> bool {
    arena[handle]
        .parent
        .map_or(false, |parent| arena[parent].right == Some(handle))
}

/// Follows parent references from `handle` up to the node that has no parent.
pub fn root_of<K, P>(arena: &NodeArena<K, P>, mut handle: Handle) -> Handle {
    while let Some(parent) = arena[handle].parent {
        handle = parent;
    }
    handle
}

fn replace_child<K, P>(
    arena: &mut NodeArena<K, P>,
    parent: Handle,
    old_child: Handle,
    new_child: Option<Handle>,
) {
    let parent_node = &mut arena[parent];
    if parent_node.left == Some(old_child) {
        parent_node.left = new_child;
    } else {
        parent_node.right = new_child;
    }
}

/// Rotates the left child of `handle` above it and returns the left child.
///
/// Re-links the rotated-up child, the grandchild that changes sides, and `handle` itself to their
/// new parents, and points the original parent's slot at the rotated-up child.
///
/// # Panics
///
/// Panics if `handle` has no left child.
pub fn rotate_right<K, P>(arena: &mut NodeArena<K, P>, handle: Handle) -> Handle {
    let pivot = arena[handle]
        .left
        .take()
        .expect("Expected left child node to be `Some`.");
    let inner = arena[pivot].right.take();
    let parent = arena[handle].parent;

    arena[handle].left = inner;
    if let Some(inner) = inner {
        arena[inner].parent = Some(handle);
    }

    arena[pivot].right = Some(handle);
    arena[pivot].parent = parent;
    arena[handle].parent = Some(pivot);

    if let Some(parent) = parent {
        replace_child(arena, parent, handle, Some(pivot));
    }
    pivot
}

/// Rotates the right child of `handle` above it and returns the right child.
///
/// # Panics
///
/// Panics if `handle` has no right child.
pub fn rotate_left<K, P>(arena: &mut NodeArena<K, P>, handle: Handle) -> Handle {
    let pivot = arena[handle]
        .right
        .take()
        .expect("Expected right child node to be `Some`.");
    let inner = arena[pivot].left.take();
    let parent = arena[handle].parent;

    arena[handle].right = inner;
    if let Some(inner) = inner {
        arena[inner].parent = Some(handle);
    }

    arena[pivot].left = Some(handle);
    arena[pivot].parent = parent;
    arena[handle].parent = Some(pivot);

    if let Some(parent) = parent {
        replace_child(arena, parent, handle, Some(pivot));
    }
    pivot
}

/// Finds a node with `key` under `root`. If `priority` is given, the node's priority must match
/// as well.
///
/// Equal keys normally sit in the left subtree, but a rotation can lift one duplicate above
/// another, so both subtrees are examined when the key matches and the priority does not.
pub fn search<K, P>(
    arena: &NodeArena<K, P>,
    root: Handle,
    key: &K,
    priority: Option<&P>,
) -> Option<Handle>
where
    K: Ord,
    P: Ord,
{
    let mut pending = vec![root];
    while let Some(curr) = pending.pop() {
        let node = &arena[curr];
        match key.cmp(&node.key) {
            Ordering::Less => pending.extend(node.left),
            Ordering::Greater => pending.extend(node.right),
            Ordering::Equal => {
                if priority.map_or(true, |priority| *priority == node.priority) {
                    return Some(curr);
                }
                pending.extend(node.right);
                pending.extend(node.left);
            },
        }
    }
    None
}

/// Inserts a new leaf under `root` and rotates it up while it outranks its parent. Keys equal to
/// a node's key descend to the left. Returns the new node.
pub fn add<K, P>(arena: &mut NodeArena<K, P>, root: Handle, key: K, priority: P) -> Handle
where
    K: Ord,
    P: Ord,
{
    let mut curr = root;
    let leaf = loop {
        let goes_left = key <= arena[curr].key;
        let next = if goes_left {
            arena[curr].left
        } else {
            arena[curr].right
        };
        match next {
            Some(child) => curr = child,
            None => {
                let leaf = arena.allocate(Node::new(key, priority, Some(curr)));
                if goes_left {
                    arena[curr].left = Some(leaf);
                } else {
                    arena[curr].right = Some(leaf);
                }
                break leaf;
            },
        }
    };
    bubble_up(arena, leaf)
}

/// Rotates `handle` above its parent for as long as it strictly outranks the parent. Returns
/// `handle`, which is then the root of the subtree it rose into.
pub fn bubble_up<K, P: Ord>(arena: &mut NodeArena<K, P>, handle: Handle) -> Handle {
    while let Some(parent) = arena[handle].parent {
        if !outranks(&arena[handle].priority, &arena[parent].priority) {
            break;
        }
        if is_left_child(arena, handle) {
            rotate_right(arena, parent);
        } else {
            debug_assert!(is_right_child(arena, handle));
            rotate_left(arena, parent);
        }
    }
    handle
}

/// Rotates the higher ranked child of `handle` above it for as long as that child strictly
/// outranks `handle`. On a tie between the children the right one is chosen. Returns the node
/// that ends up where `handle` started.
pub fn push_down<K, P: Ord>(arena: &mut NodeArena<K, P>, handle: Handle) -> Handle {
    let mut local_root = handle;
    loop {
        let candidate = {
            let node = &arena[handle];
            match (node.left, node.right) {
                (Some(left), Some(right)) => {
                    if outranks(&arena[left].priority, &arena[right].priority) {
                        left
                    } else {
                        right
                    }
                },
                (Some(child), None) | (None, Some(child)) => child,
                (None, None) => break,
            }
        };

        if !outranks(&arena[candidate].priority, &arena[handle].priority) {
            break;
        }

        let risen = if arena[handle].left == Some(candidate) {
            rotate_right(arena, handle)
        } else {
            rotate_left(arena, handle)
        };
        if local_root == handle {
            local_root = risen;
        }
    }
    local_root
}

/// Unlinks `handle` from the tree and frees its slot.
///
/// While the node has two children, the higher ranked child is rotated above it (the left child
/// only if it strictly outranks the right one). Each rotation moves the node one level down, so
/// at most `height` rotations happen before it has at most one child and can be replaced by it.
pub fn detach<K, P: Ord>(arena: &mut NodeArena<K, P>, handle: Handle) -> Detached<K, P> {
    loop {
        let survivor = match (arena[handle].left, arena[handle].right) {
            (Some(left), Some(right)) => {
                if outranks(&arena[left].priority, &arena[right].priority) {
                    rotate_right(arena, handle);
                } else {
                    rotate_left(arena, handle);
                }
                continue;
            },
            (child, None) | (None, child) => child,
        };

        let parent = arena[handle].parent;
        if let Some(survivor) = survivor {
            arena[survivor].parent = parent;
        }
        if let Some(parent) = parent {
            replace_child(arena, parent, handle, survivor);
        }

        let mut node = arena.free(handle);
        node.left = None;
        node.right = None;
        node.parent = None;
        return Detached {
            node,
            anchor: survivor.or(parent),
        };
    }
}

/// Removes the node matching both `key` and `priority` under `root`. Returns `None` if there is
/// no such node.
pub fn remove<K, P>(
    arena: &mut NodeArena<K, P>,
    root: Handle,
    key: &K,
    priority: &P,
) -> Option<Detached<K, P>>
where
    K: Ord,
    P: Ord,
{
    search(arena, root, key, Some(priority)).map(|handle| detach(arena, handle))
}

/// Severs every child and parent link under `root` and frees the nodes. Returns the number of
/// nodes released.
pub fn clean_up<K, P>(arena: &mut NodeArena<K, P>, root: Handle) -> usize {
    let mut pending = vec![root];
    let mut released = 0;
    while let Some(curr) = pending.pop() {
        let node = &mut arena[curr];
        pending.extend(node.left.take());
        pending.extend(node.right.take());
        node.parent = None;
        arena.free(curr);
        released += 1;
    }
    released
}

pub fn size<K, P>(arena: &NodeArena<K, P>, root: Handle) -> usize {
    let mut pending = vec![root];
    let mut size = 0;
    while let Some(curr) = pending.pop() {
        size += 1;
        pending.extend(arena[curr].left);
        pending.extend(arena[curr].right);
    }
    size
}

pub fn height<K, P>(arena: &NodeArena<K, P>, root: Handle) -> usize {
    let mut pending = vec![(root, 1)];
    let mut height = 0;
    while let Some((curr, depth)) = pending.pop() {
        height = cmp::max(height, depth);
        let node = &arena[curr];
        pending.extend(node.left.map(|child| (child, depth + 1)));
        pending.extend(node.right.map(|child| (child, depth + 1)));
    }
    height
}

pub fn min<K, P>(arena: &NodeArena<K, P>, root: Handle) -> &K {
    let mut curr = root;
    while let Some(left) = arena[curr].left {
        curr = left;
    }
    &arena[curr].key
}

pub fn max<K, P>(arena: &NodeArena<K, P>, root: Handle) -> &K {
    let mut curr = root;
    while let Some(right) = arena[curr].right {
        curr = right;
    }
    &arena[curr].key
}

/// Returns the handles under `root` in key order.
pub fn in_order<K, P>(arena: &NodeArena<K, P>, root: Handle) -> Vec<Handle> {
    let mut order = Vec::new();
    let mut stack = Vec::new();
    let mut curr = Some(root);
    loop {
        while let Some(handle) = curr {
            stack.push(handle);
            curr = arena[handle].left;
        }
        match stack.pop() {
            Some(handle) => {
                order.push(handle);
                curr = arena[handle].right;
            },
            None => break,
        }
    }
    order
}

fn links_are_consistent<K, P>(arena: &NodeArena<K, P>, handle: Handle) -> bool {
    let node = &arena[handle];
    let points_back = |child: Option<Handle>| {
        child.map_or(true, |child| arena[child].parent == Some(handle))
    };
    points_back(node.left) && points_back(node.right)
}

/// Checks that keys under `root` are in order and that every child refers back to its parent.
pub fn check_bst_invariants<K: Ord, P>(arena: &NodeArena<K, P>, root: Handle) -> bool {
    if !arena[root].is_root() {
        return false;
    }
    let order = in_order(arena, root);
    order
        .windows(2)
        .all(|pair| arena[pair[0]].key <= arena[pair[1]].key)
        && order
            .iter()
            .all(|&handle| links_are_consistent(arena, handle))
}

/// Checks the key order under `root` and that no child outranks its parent.
pub fn check_treap_invariants<K, P>(arena: &NodeArena<K, P>, root: Handle) -> bool
where
    K: Ord,
    P: Ord,
{
    if !check_bst_invariants(arena, root) {
        return false;
    }
    in_order(arena, root).into_iter().all(|handle| {
        let node = &arena[handle];
        let respects_heap = |child: Option<Handle>| {
            child.map_or(true, |child| {
                !outranks(&arena[child].priority, &node.priority)
            })
        };
        respects_heap(node.left) && respects_heap(node.right)
    })
}
