// =============================================================================
// Red-black tree engine
// =============================================================================

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

use crate::arena::NodeArena;
use crate::cursor::{Cursor, IntoIter, Iter, Keys, Values};
use crate::node::{Colour, Direction, Node, NodeId, NodeRef};

/// An ordered map backed by a red-black tree whose nodes live in an arena.
///
/// Keys are kept in ascending `Ord` order. Insert, erase and lookup are
/// `O(log n)`; the tree height never exceeds `2 * log2(n + 1)`.
///
/// Lookups that can miss come in two flavours: the `Option`-returning
/// [`get`](Self::get) family, and the cursor-returning [`find`](Self::find) /
/// [`lower_bound`](Self::lower_bound), which return [`end`](Self::end) on a
/// miss.
///
/// ```rust
/// use rbtree_rs::RbTree;
///
/// let mut tree = RbTree::new();
/// tree.insert(3, "c");
/// tree.insert(1, "a");
/// tree.insert(2, "b");
///
/// assert_eq!(tree.get(&2), Some(&"b"));
/// assert_eq!(tree.lower_bound(&0).key(), Some(&1));
/// assert!(tree.find(&9) == tree.end());
///
/// let keys: Vec<_> = tree.keys().copied().collect();
/// assert_eq!(keys, vec![1, 2, 3]);
/// ```
pub struct RbTree<K, V> {
    pub(crate) nodes: NodeArena<K, V>,
    /// The sentinel's left link.
    pub(crate) root: Option<NodeId>,
    pub(crate) len: usize,
}

impl<K, V> RbTree<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
            len: 0,
        }
    }

    /// Create an empty tree with room for `capacity` nodes before the arena reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cached height of the whole tree (0 when empty).
    #[inline]
    pub fn height(&self) -> usize {
        usize::from(self.height_of(self.root))
    }

    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity_bytes()
    }

    pub fn shrink_to_fit(&mut self) {
        let before = self.nodes.capacity_bytes();
        self.nodes.shrink_to_fit();
        log::trace!(
            "shrink_to_fit: {} -> {} arena bytes",
            before,
            self.nodes.capacity_bytes()
        );
    }

    // -------------------------------------------------------------------------
    // Cursors and iteration
    // -------------------------------------------------------------------------

    /// Cursor at the smallest key, or `end()` when empty.
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, self.root.map(|r| self.min_node(r)).into())
    }

    /// The past-the-end cursor.
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, NodeRef::End)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.begin().entry()
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        let last = self.root.map(|r| self.max_node(r))?;
        let node = &self.nodes[last];
        Some((&node.key, &node.value))
    }

    // -------------------------------------------------------------------------
    // Navigation helpers shared with cursors and rotations
    // -------------------------------------------------------------------------

    #[inline]
    pub(crate) fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.nodes[id].is_red())
    }

    /// Which slot of `parent` holds `child`.
    #[inline]
    pub(crate) fn direction_of(&self, child: NodeId, parent: NodeId) -> Direction {
        if self.nodes[parent][Direction::Left] == Some(child) {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// Point whatever referenced `old` (a parent slot, or the root link) at `new`.
    pub(crate) fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let dir = self.direction_of(old, parent);
                self.nodes[parent][dir] = new;
            }
        }
    }

    pub(crate) fn min_node(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id][Direction::Left] {
            id = left;
        }
        id
    }

    pub(crate) fn max_node(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.nodes[id][Direction::Right] {
            id = right;
        }
        id
    }

    /// In-order neighbour of `id` toward `dir` (Right = successor).
    pub(crate) fn step(&self, id: NodeId, dir: Direction) -> NodeRef {
        if let Some(sub) = self.nodes[id][dir] {
            let far = match dir {
                Direction::Right => self.min_node(sub),
                Direction::Left => self.max_node(sub),
            };
            return NodeRef::Real(far);
        }
        // Climb until we leave a subtree through its `dir.opposite()` side.
        let mut cur = id;
        while let Some(parent) = self.nodes[cur].parent {
            if self.nodes[parent][dir.opposite()] == Some(cur) {
                return NodeRef::Real(parent);
            }
            cur = parent;
        }
        NodeRef::End
    }

    #[inline]
    pub(crate) fn successor(&self, id: NodeId) -> NodeRef {
        self.step(id, Direction::Right)
    }

    #[inline]
    pub(crate) fn predecessor(&self, id: NodeId) -> NodeRef {
        self.step(id, Direction::Left)
    }

    /// Node ids in ascending key order.
    pub(crate) fn inorder_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len);
        let mut cur: NodeRef = self.root.map(|r| self.min_node(r)).into();
        while let NodeRef::Real(id) = cur {
            out.push(id);
            cur = self.successor(id);
        }
        out
    }
}

impl<K: Ord, V> RbTree<K, V> {
    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    pub(crate) fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            cur = match key.cmp(node.key.borrow()) {
                Ordering::Less => node[Direction::Left],
                Ordering::Greater => node[Direction::Right],
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Cursor at `key`, or `end()` if the key is absent.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self, self.find_node(key).into())
    }

    /// Cursor at the first key not less than `key`, or `end()` if every key is smaller.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(mut cur) = self.root else {
            return self.end();
        };
        // Descend as far as the search path goes.
        loop {
            let node = &self.nodes[cur];
            let next = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Cursor::new(self, NodeRef::Real(cur)),
                Ordering::Less => match node[Direction::Left] {
                    Some(left) => left,
                    None => return Cursor::new(self, NodeRef::Real(cur)),
                },
                Ordering::Greater => match node[Direction::Right] {
                    Some(right) => right,
                    None => break,
                },
            };
            cur = next;
        }
        // `cur` is smaller than `key`: climb past ancestors that are not greater.
        while let Some(parent) = self.nodes[cur].parent {
            let parent_key: &Q = self.nodes[parent].key.borrow();
            if key < parent_key {
                return Cursor::new(self, NodeRef::Real(parent));
            }
            cur = parent;
        }
        self.end()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|id| &self.nodes[id].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find_node(key)?;
        Some(&mut self.nodes[id].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    // -------------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------------

    /// Insert a key/value pair. An existing key keeps its stored key and gets
    /// the new value; the previous value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.insert_leaf(key, value) {
            Ok(_) => None,
            Err((id, _, value)) => Some(std::mem::replace(&mut self.nodes[id].value, value)),
        }
    }

    /// Link a new node for `key` and rebalance, or hand the pair back alongside
    /// the node that already holds an equal key.
    pub(crate) fn insert_leaf(&mut self, key: K, value: V) -> Result<NodeId, (NodeId, K, V)> {
        let Some(mut cur) = self.root else {
            let id = self.nodes.alloc(Node::leaf(key, value, Colour::Black, None));
            self.root = Some(id);
            self.len = 1;
            self.check_invariants();
            return Ok(id);
        };

        let dir = loop {
            let dir = match key.cmp(&self.nodes[cur].key) {
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
                Ordering::Equal => return Err((cur, key, value)),
            };
            match self.nodes[cur][dir] {
                Some(next) => cur = next,
                None => break dir,
            }
        };

        let id = self.nodes.alloc(Node::leaf(key, value, Colour::Red, Some(cur)));
        self.nodes[cur][dir] = Some(id);
        self.len += 1;
        self.refresh_heights_from(Some(cur));
        self.insert_fixup(id);
        self.check_invariants();
        Ok(id)
    }

    /// Repair a Red node `x` that may sit under a Red parent.
    fn insert_fixup(&mut self, mut x: NodeId) {
        loop {
            let Some(parent) = self.nodes[x].parent else {
                self.nodes[x].colour = Colour::Black;
                return;
            };
            if !self.nodes[parent].is_red() {
                return;
            }
            let Some(grandparent) = self.nodes[parent].parent else {
                self.nodes[parent].colour = Colour::Black;
                return;
            };

            let parent_dir = self.direction_of(parent, grandparent);
            let uncle = self.nodes[grandparent][parent_dir.opposite()];
            if let Some(uncle) = uncle.filter(|&u| self.nodes[u].is_red()) {
                // Push the blackness down from the grandparent and retry there.
                self.nodes[grandparent].colour = Colour::Red;
                self.nodes[parent].colour = Colour::Black;
                self.nodes[uncle].colour = Colour::Black;
                x = grandparent;
                continue;
            }

            // Black or missing uncle: lift the parent side over the grandparent.
            // A zig-zag shape makes this a big rotation lifting `x` itself.
            let top = self.rotate(grandparent, parent_dir.opposite());
            self.nodes[top].colour = Colour::Black;
            self.nodes[grandparent].colour = Colour::Red;
            return;
        }
    }

    // -------------------------------------------------------------------------
    // Erasure
    // -------------------------------------------------------------------------

    /// Remove `key`, returning its value. Absent keys leave the tree untouched.
    pub fn erase<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.find_node(key)?;
        let (_, value) = self.remove_node(target);
        Some(value)
    }

    /// Remove the entry stored at `target` and return it.
    pub(crate) fn remove_node(&mut self, mut target: NodeId) -> (K, V) {
        // Two children: the successor has no left child, so moving its entry
        // up leaves exactly one node with at most one child to unlink.
        if let [Some(_), Some(right)] = self.nodes[target].child {
            let successor = self.min_node(right);
            let (t, s) = self.nodes.pair_mut(target, successor);
            std::mem::swap(&mut t.key, &mut s.key);
            std::mem::swap(&mut t.value, &mut s.value);
            target = successor;
        }

        let parent = self.nodes[target].parent;
        match self.nodes[target].only_child() {
            Some(child) => {
                // A lone child has black-height 0 below it, so it is a Red leaf
                // and its parent is Black.
                debug_assert_eq!(self.nodes[target].colour, Colour::Black);
                debug_assert!(self.nodes[child].is_red());
                debug_assert_eq!(self.nodes[child].child, [None, None]);
                self.nodes[child].parent = parent;
                self.nodes[child].colour = Colour::Black;
                self.replace_child(parent, target, Some(child));
                self.refresh_heights_from(parent);
            }
            None if parent.is_none() => {
                self.root = None;
            }
            None => {
                if self.nodes[target].colour == Colour::Black {
                    self.nodes[target].colour = Colour::DoubleBlack;
                    self.erase_fixup(target);
                }
                // Fixup rotations may have re-parented the leaf.
                let parent = self.nodes[target].parent;
                self.replace_child(parent, target, None);
                self.refresh_heights_from(parent);
            }
        }

        self.len -= 1;
        let node = self.nodes.free(target);
        self.check_invariants();
        (node.key, node.value)
    }

    /// Resolve the DoubleBlack marker on `x`.
    fn erase_fixup(&mut self, mut x: NodeId) {
        while let Some(parent) = self.nodes[x].parent {
            let dir = self.direction_of(x, parent);
            let sibling_dir = dir.opposite();
            // `x` carries at least one black unit, so the sibling side is non-empty.
            let sibling = self.nodes[parent][sibling_dir]
                .expect("double-black node without a sibling");

            if self.nodes[sibling].is_red() {
                self.rotate_small(parent, dir);
                self.nodes[sibling].colour = Colour::Black;
                self.nodes[parent].colour = Colour::Red;
                continue;
            }

            let near = self.nodes[sibling][dir];
            let far = self.nodes[sibling][sibling_dir];

            if let Some(far) = far.filter(|&f| self.nodes[f].is_red()) {
                let parent_colour = self.nodes[parent].colour;
                self.rotate_small(parent, dir);
                self.nodes[sibling].colour = parent_colour;
                self.nodes[parent].colour = Colour::Black;
                self.nodes[far].colour = Colour::Black;
                self.nodes[x].colour = Colour::Black;
                return;
            }

            if let Some(near) = near.filter(|&n| self.nodes[n].is_red()) {
                // Turn the inner Red nephew into an outer one; the next pass
                // takes the branch above.
                self.rotate_small(sibling, sibling_dir);
                self.nodes[near].colour = Colour::Black;
                self.nodes[sibling].colour = Colour::Red;
                continue;
            }

            self.nodes[sibling].colour = Colour::Red;
            self.nodes[x].colour = Colour::Black;
            if self.nodes[parent].is_red() {
                self.nodes[parent].colour = Colour::Black;
                return;
            }
            self.nodes[parent].colour = Colour::DoubleBlack;
            x = parent;
        }
        self.nodes[x].colour = Colour::Black;
    }

    // -------------------------------------------------------------------------
    // Whole-tree maintenance
    // -------------------------------------------------------------------------

    /// Drop every entry. The arena keeps its allocation.
    pub fn clear(&mut self) {
        log::trace!("clearing tree of {} entries", self.len);
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.check_invariants();
    }

    /// Rebuild the arena so that live nodes occupy a dense prefix, dropping the
    /// holes left behind by erasures. Shape and colours are preserved; cursors
    /// and node ids taken before the call are meaningless afterwards.
    ///
    /// Returns the number of nodes relocated.
    pub fn compact(&mut self) -> usize {
        let holes = self.nodes.holes();
        let moved = if holes == 0 {
            0
        } else {
            let mut old = std::mem::take(&mut self.nodes);
            let mut fresh = NodeArena::with_capacity(self.len);
            self.root = mirror_graph(self.root, &mut fresh, |id| old.free(id));
            self.nodes = fresh;
            log::debug!(
                "compacted arena: {} live nodes relocated, {} holes dropped",
                self.len,
                holes
            );
            self.len
        };
        self.check_invariants();
        moved
    }

    #[inline]
    fn check_invariants(&self) {
        #[cfg(feature = "paranoid")]
        if let Err(err) = self.validate() {
            panic!("red-black invariant broken: {err}");
        }
    }
}

/// Pre-order copy of the graph under `root` into `dst`. `take` supplies each
/// source node; its links are read for traversal and then rewritten.
pub(crate) fn mirror_graph<K, V>(
    root: Option<NodeId>,
    dst: &mut NodeArena<K, V>,
    mut take: impl FnMut(NodeId) -> Node<K, V>,
) -> Option<NodeId> {
    let root = root?;
    let mut new_root = None;
    let mut stack = vec![(root, None, Direction::Left)];
    while let Some((src, parent, dir)) = stack.pop() {
        let mut node = take(src);
        let [left, right] = node.child;
        node.parent = parent;
        node.child = [None, None];
        let id = dst.alloc(node);
        match parent {
            Some(parent) => dst[parent][dir] = Some(id),
            None => new_root = Some(id),
        }
        if let Some(right) = right {
            stack.push((right, Some(id), Direction::Right));
        }
        if let Some(left) = left {
            stack.push((left, Some(id), Direction::Left));
        }
    }
    new_root
}

impl<K, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone> Clone for RbTree<K, V> {
    fn clone(&self) -> Self {
        let mut nodes = NodeArena::with_capacity(self.len);
        let root = mirror_graph(self.root, &mut nodes, |id| self.nodes[id].clone());
        Self {
            nodes,
            root,
            len: self.len,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.nodes.clear();
        self.root = mirror_graph(source.root, &mut self.nodes, |id| source.nodes[id].clone());
        self.len = source.len;
        self.check_invariants();
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RbTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for RbTree<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for RbTree<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = RbTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for RbTree<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RbTree<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, Q, V> Index<&Q> for RbTree<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V> IntoIterator for &'a RbTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for RbTree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let order = self.inorder_ids();
        let entries: Vec<(K, V)> = order
            .into_iter()
            .map(|id| {
                let node = self.nodes.free(id);
                (node.key, node.value)
            })
            .collect();
        IntoIter::new(entries)
    }
}

#[cfg(test)]
impl<K: Ord, V> RbTree<K, V> {
    /// Plain BST insertion with no rebalancing; every node is Black. Lets
    /// tests build exact shapes.
    pub(crate) fn link_leaf_unbalanced(&mut self, key: K, value: V) -> NodeId {
        let mut parent = None;
        let mut dir = Direction::Left;
        let mut cur = self.root;
        while let Some(id) = cur {
            parent = Some(id);
            dir = if key < self.nodes[id].key {
                Direction::Left
            } else {
                Direction::Right
            };
            cur = self.nodes[id][dir];
        }
        let id = self.nodes.alloc(Node::leaf(key, value, Colour::Black, parent));
        match parent {
            Some(p) => self.nodes[p][dir] = Some(id),
            None => self.root = Some(id),
        }
        self.len += 1;
        self.refresh_heights_from(parent);
        id
    }
}
