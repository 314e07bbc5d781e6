// =============================================================================
// Key-only facade
// =============================================================================

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;

use crate::cursor::{Cursor, IntoIter, Keys};
use crate::error::Result;
use crate::tree::RbTree;
use crate::validate::Stats;

/// An ordered set backed by an [`RbTree`] with unit values.
///
/// Inserting a key that is already present is a no-op: the stored key is kept
/// and `insert` reports `false`.
///
/// ```rust
/// use rbtree_rs::RbSet;
///
/// let mut set: RbSet<u32> = [4, 2, 6].into_iter().collect();
/// assert!(!set.insert(2));
/// assert!(set.erase(&4));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![2, 6]);
/// ```
pub struct RbSet<K> {
    tree: RbTree<K, ()>,
}

impl<K> RbSet<K> {
    pub fn new() -> Self {
        Self { tree: RbTree::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: RbTree::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn height(&self) -> usize {
        self.tree.height()
    }

    pub fn memory_usage(&self) -> usize {
        self.tree.memory_usage()
    }

    pub fn shrink_to_fit(&mut self) {
        self.tree.shrink_to_fit();
    }

    pub fn begin(&self) -> Cursor<'_, K, ()> {
        self.tree.begin()
    }

    pub fn end(&self) -> Cursor<'_, K, ()> {
        self.tree.end()
    }

    pub fn iter(&self) -> SetIter<'_, K> {
        SetIter {
            inner: self.tree.keys(),
        }
    }

    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(|(k, _)| k)
    }

    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(|(k, _)| k)
    }
}

impl<K: Ord> RbSet<K> {
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// See [`RbTree::compact`].
    pub fn compact(&mut self) -> usize {
        self.tree.compact()
    }

    /// Add `key`. Returns `false`, leaving the set untouched, if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.tree.insert_leaf(key, ()).is_ok()
    }

    /// Remove `key`. Returns whether it was present.
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.erase(key).is_some()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(key)
    }

    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, ()>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key)
    }

    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, ()>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.lower_bound(key)
    }

    pub fn validate(&self) -> Result<Stats> {
        self.tree.validate()
    }
}

impl<K> Default for RbSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone> Clone for RbSet<K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.tree.clone_from(&source.tree);
    }
}

impl<K: fmt::Debug> fmt::Debug for RbSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: PartialEq> PartialEq for RbSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq> Eq for RbSet<K> {}

impl<K: Ord> FromIterator<K> for RbSet<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut set = RbSet::new();
        set.extend(iter);
        set
    }
}

impl<K: Ord> Extend<K> for RbSet<K> {
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for RbSet<K> {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, K> IntoIterator for &'a RbSet<K> {
    type Item = &'a K;
    type IntoIter = SetIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> IntoIterator for RbSet<K> {
    type Item = K;
    type IntoIter = SetIntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        SetIntoIter {
            inner: self.tree.into_iter(),
        }
    }
}

/// Borrowing iterator over an [`RbSet`] in ascending order.
pub struct SetIter<'a, K> {
    inner: Keys<'a, K, ()>,
}

impl<K> Clone for SetIter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K> Iterator for SetIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K> DoubleEndedIterator for SetIter<'a, K> {
    fn next_back(&mut self) -> Option<&'a K> {
        self.inner.next_back()
    }
}

impl<K> ExactSizeIterator for SetIter<'_, K> {}

impl<K> FusedIterator for SetIter<'_, K> {}

/// Owning iterator over an [`RbSet`] in ascending order.
pub struct SetIntoIter<K> {
    inner: IntoIter<K, ()>,
}

impl<K> Iterator for SetIntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for SetIntoIter<K> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, ())| k)
    }
}

impl<K> ExactSizeIterator for SetIntoIter<K> {}

impl<K> FusedIterator for SetIntoIter<K> {}
