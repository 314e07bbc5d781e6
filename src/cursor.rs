// =============================================================================
// Cursors and iterators
// =============================================================================
//
// A cursor is a (tree, position) pair that walks parent/child links on its own.
// It borrows the tree, so no mutation can invalidate it while it is alive.

use std::fmt;
use std::iter::FusedIterator;

use crate::node::{Colour, NodeRef};
use crate::tree::RbTree;

/// A read-only position in an [`RbTree`]: a node, or the past-the-end sentinel.
///
/// Stepping forward from the maximum lands on the sentinel and stays there;
/// stepping backward from the sentinel lands on the maximum, so a reverse walk
/// can start from `end()`. Stepping backward from the minimum also lands on
/// the sentinel.
pub struct Cursor<'a, K, V> {
    tree: &'a RbTree<K, V>,
    at: NodeRef,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(tree: &'a RbTree<K, V>, at: NodeRef) -> Self {
        Self { tree, at }
    }

    /// The referenced position.
    #[inline]
    pub fn node(&self) -> NodeRef {
        self.at
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.at.is_end()
    }

    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(|(k, _)| k)
    }

    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(|(_, v)| v)
    }

    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        let node = &tree.nodes[self.at.id()?];
        Some((&node.key, &node.value))
    }

    /// Colour of the referenced node; `None` at the sentinel.
    pub fn colour(&self) -> Option<Colour> {
        self.at.id().map(|id| self.tree.nodes[id].colour)
    }

    /// Advance to the in-order successor.
    pub fn move_next(&mut self) {
        if let NodeRef::Real(id) = self.at {
            self.at = self.tree.successor(id);
        }
    }

    /// Retreat to the in-order predecessor.
    pub fn move_prev(&mut self) {
        self.at = match self.at {
            NodeRef::Real(id) => self.tree.predecessor(id),
            NodeRef::End => self.tree.root.map(|r| self.tree.max_node(r)).into(),
        };
    }

    /// A cursor one step forward, leaving `self` in place.
    pub fn successor(&self) -> Self {
        let mut next = *self;
        next.move_next();
        next
    }

    /// A cursor one step backward, leaving `self` in place.
    pub fn predecessor(&self) -> Self {
        let mut prev = *self;
        prev.move_prev();
        prev
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.at == other.at
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry() {
            Some((k, v)) => f.debug_tuple("Cursor").field(k).field(v).finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}

/// Borrowing in-order iterator over the entries of an [`RbTree`].
pub struct Iter<'a, K, V> {
    tree: &'a RbTree<K, V>,
    front: NodeRef,
    back: NodeRef,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(tree: &'a RbTree<K, V>) -> Self {
        Self {
            tree,
            front: tree.root.map(|r| tree.min_node(r)).into(),
            back: tree.root.map(|r| tree.max_node(r)).into(),
            remaining: tree.len,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front.id()?;
        self.front = self.tree.successor(id);
        self.remaining -= 1;
        let tree = self.tree;
        let node = &tree.nodes[id];
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back.id()?;
        self.back = self.tree.predecessor(id);
        self.remaining -= 1;
        let tree = self.tree;
        let node = &tree.nodes[id];
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Keys of an [`RbTree`] in ascending order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Values of an [`RbTree`] in key order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// Owning in-order iterator, produced by `RbTree::into_iter`.
pub struct IntoIter<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(entries: Vec<(K, V)>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
