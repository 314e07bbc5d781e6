// =============================================================================
// Node Arena
// =============================================================================
//
// Every node of a tree lives in one `Vec` of slots and is addressed by a
// `NodeId`. Erased nodes leave a hole that is recorded on a free list and
// reused by the next allocation. `RbTree::compact` rebuilds a dense arena when
// the holes are worth reclaiming.

use std::ops::{Index, IndexMut};

use crate::node::{Node, NodeId};

// =============================================================================
// Configuration
// =============================================================================

/// Largest number of slots (live nodes plus holes) a single arena can address.
pub const MAX_NODES: usize = u32::MAX as usize;

/// Node arena with a LIFO free list of vacated slots.
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(MAX_NODES)),
            free: Vec::new(),
        }
    }

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of vacated slots awaiting reuse.
    #[inline]
    pub(crate) fn holes(&self) -> usize {
        self.free.len()
    }

    /// Heap bytes reserved by the arena.
    pub(crate) fn capacity_bytes(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Option<Node<K, V>>>()
            + self.free.capacity() * std::mem::size_of::<NodeId>()
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        // Trailing holes can be dropped outright; interior ones need `compact`.
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        let len = self.slots.len();
        self.free.retain(|id| id.index() < len);
        self.slots.shrink_to_fit();
        self.free.shrink_to_fit();
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(id) = self.free.pop() {
            debug_assert!(self.slots[id.index()].is_none());
            self.slots[id.index()] = Some(node);
            return id;
        }
        let id = NodeId::from_index(self.slots.len());
        self.slots.push(Some(node));
        id
    }

    /// Vacate a slot and hand back its node.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.slots[id.index()]
            .take()
            .expect("freeing a vacant arena slot");
        self.free.push(id);
        node
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable access to two distinct nodes at once.
    pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<K, V>, &mut Node<K, V>) {
        let (ai, bi) = (a.index(), b.index());
        assert_ne!(ai, bi, "pair_mut needs two distinct nodes");
        let (lo, hi, swapped) = if ai < bi { (ai, bi, false) } else { (bi, ai, true) };
        let (head, tail) = self.slots.split_at_mut(hi);
        let lo_node = head[lo].as_mut().expect("vacant arena slot");
        let hi_node = tail[0].as_mut().expect("vacant arena slot");
        if swapped {
            (hi_node, lo_node)
        } else {
            (lo_node, hi_node)
        }
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        self.slots[id.index()].as_ref().expect("vacant arena slot")
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.slots[id.index()].as_mut().expect("vacant arena slot")
    }
}

impl<K, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Colour;

    fn leaf(k: u32) -> Node<u32, u32> {
        Node::leaf(k, k * 10, Colour::Red, None)
    }

    #[test]
    fn test_alloc_reuses_holes() {
        let mut a = NodeArena::new();
        let x = a.alloc(leaf(1));
        let y = a.alloc(leaf(2));
        let z = a.alloc(leaf(3));
        assert_eq!(a.live(), 3);

        let freed = a.free(y);
        assert_eq!(freed.key, 2);
        assert_eq!(a.live(), 2);
        assert_eq!(a.holes(), 1);
        assert!(a.get(y).is_none());

        let w = a.alloc(leaf(4));
        assert_eq!(w, y);
        assert_eq!(a.holes(), 0);
        assert_eq!(a[x].key, 1);
        assert_eq!(a[w].value, 40);
        assert_eq!(a[z].key, 3);
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut a = NodeArena::new();
        let x = a.alloc(leaf(1));
        let y = a.alloc(leaf(2));

        let (p, q) = a.pair_mut(y, x);
        assert_eq!((p.key, q.key), (2, 1));
        std::mem::swap(&mut p.key, &mut q.key);
        assert_eq!(a[x].key, 2);
        assert_eq!(a[y].key, 1);
    }

    #[test]
    fn test_shrink_drops_trailing_holes() {
        let mut a = NodeArena::new();
        let x = a.alloc(leaf(1));
        let y = a.alloc(leaf(2));
        let z = a.alloc(leaf(3));
        a.free(z);
        a.free(y);
        a.shrink_to_fit();
        assert_eq!(a.live(), 1);
        assert_eq!(a.holes(), 0);
        assert_eq!(a[x].key, 1);
        assert_eq!(a.alloc(leaf(9)), y);
    }
}
