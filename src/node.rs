// =============================================================================
// Node graph vocabulary
// =============================================================================

use std::ops::{Index, IndexMut};

/// Stable index of a node inside a tree's arena.
///
/// Ids are only meaningful for the tree that handed them out, and an id may be
/// reused after the node it named is erased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index).expect("node arena exceeds u32 index space");
        Self(raw)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A position in a tree: either a real node or the past-the-end sentinel.
///
/// `End` is the logical parent of the root. It follows the maximum in forward
/// order and is where reverse traversal starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// A content-holding node.
    Real(NodeId),
    /// The sentinel.
    End,
}

impl NodeRef {
    /// Whether this is the sentinel.
    #[inline]
    pub fn is_end(self) -> bool {
        matches!(self, NodeRef::End)
    }

    /// The node id, or `None` for the sentinel.
    #[inline]
    pub fn id(self) -> Option<NodeId> {
        match self {
            NodeRef::Real(id) => Some(id),
            NodeRef::End => None,
        }
    }
}

impl From<Option<NodeId>> for NodeRef {
    #[inline]
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(NodeRef::End, NodeRef::Real)
    }
}

/// Node colour. `DoubleBlack` only exists while an erase fixup is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colour {
    /// Inserted nodes start Red.
    Red,
    /// Counts toward black-height.
    Black,
    /// A Black node that is one black unit short relative to its sibling.
    DoubleBlack,
}

/// Which child slot of a parent a node hangs from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub(crate) fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Links are plain ids. `parent` is `None` for the root, whose logical parent
/// is the sentinel.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) colour: Colour,
    /// Cached subtree height (leaf = 1). Diagnostic, and input to the rotation
    /// shape heuristic; never consulted for correctness.
    pub(crate) height: u8,
    pub(crate) parent: Option<NodeId>,
    pub(crate) child: [Option<NodeId>; 2],
}

impl<K, V> Node<K, V> {
    pub(crate) fn leaf(key: K, value: V, colour: Colour, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value,
            colour,
            height: 1,
            parent,
            child: [None, None],
        }
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.colour == Colour::Red
    }

    /// The single child of a node with at most one child.
    #[inline]
    pub(crate) fn only_child(&self) -> Option<NodeId> {
        self.child[0].or(self.child[1])
    }
}

impl<K, V> Index<Direction> for Node<K, V> {
    type Output = Option<NodeId>;

    #[inline]
    fn index(&self, dir: Direction) -> &Self::Output {
        match dir {
            Direction::Left => &self.child[0],
            Direction::Right => &self.child[1],
        }
    }
}

impl<K, V> IndexMut<Direction> for Node<K, V> {
    #[inline]
    fn index_mut(&mut self, dir: Direction) -> &mut Self::Output {
        match dir {
            Direction::Left => &mut self.child[0],
            Direction::Right => &mut self.child[1],
        }
    }
}
