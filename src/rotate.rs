// =============================================================================
// Rotation primitives
// =============================================================================
//
// A rotation "in direction `dir`" at `top` lifts the subtree hanging on the
// side opposite `dir` above `top`, which sinks toward `dir`:
//
//   small, dir = Left            big, dir = Left
//
//     top            c             top                m
//    /   \          / \           /   \             /   \
//   a     c   =>  top  e         a     c    =>   top     c
//        / \      / \                 / \        / \    / \
//       d   e    a   d               m   e      a   x  y   e
//                                   / \
//                                  x   y
//
// Both keep the in-order sequence, fix the parent (or root) link of the new
// subtree top, and refresh cached heights of every node whose subtree changed.

use crate::node::{Direction, NodeId};
use crate::tree::RbTree;

/// Which primitive a rebalancing rotation uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RotationShape {
    /// One node rises (zig-zig).
    Small,
    /// The inner grandchild rises over both its parent and grandparent (zig-zag).
    Big,
}

impl<K, V> RbTree<K, V> {
    /// Rotate at `top` toward `dir`, picking the shape with [`Self::rotation_shape`].
    /// Returns the new subtree top.
    pub(crate) fn rotate(&mut self, top: NodeId, dir: Direction) -> NodeId {
        match self.rotation_shape(top, dir) {
            RotationShape::Small => self.rotate_small(top, dir),
            RotationShape::Big => self.rotate_big(top, dir),
        }
    }

    /// The rising child's inner grandchild decides the shape: a Red inner one
    /// over a non-Red outer one means zig-zag. With no Red grandchild the
    /// taller side wins, ties going to the small rotation.
    pub(crate) fn rotation_shape(&self, top: NodeId, dir: Direction) -> RotationShape {
        let Some(riser) = self.nodes[top][dir.opposite()] else {
            return RotationShape::Small;
        };
        let inner = self.nodes[riser][dir];
        let outer = self.nodes[riser][dir.opposite()];
        match (self.is_red(inner), self.is_red(outer)) {
            (true, false) => RotationShape::Big,
            (_, true) => RotationShape::Small,
            (false, false) if self.height_of(inner) > self.height_of(outer) => RotationShape::Big,
            (false, false) => RotationShape::Small,
        }
    }

    pub(crate) fn rotate_small(&mut self, top: NodeId, dir: Direction) -> NodeId {
        let parent = self.nodes[top].parent;
        let riser = self.nodes[top][dir.opposite()]
            .expect("rotation needs a child opposite the rotation direction");
        let middle = self.nodes[riser][dir];

        self.nodes[top][dir.opposite()] = middle;
        if let Some(middle) = middle {
            self.nodes[middle].parent = Some(top);
        }
        self.nodes[riser][dir] = Some(top);
        self.nodes[top].parent = Some(riser);
        self.nodes[riser].parent = parent;
        self.replace_child(parent, top, Some(riser));

        self.update_height(top);
        self.update_height(riser);
        self.refresh_heights_from(parent);
        riser
    }

    pub(crate) fn rotate_big(&mut self, top: NodeId, dir: Direction) -> NodeId {
        let parent = self.nodes[top].parent;
        let child = self.nodes[top][dir.opposite()]
            .expect("rotation needs a child opposite the rotation direction");
        let riser = self.nodes[child][dir].expect("big rotation needs an inner grandchild");
        let toward = self.nodes[riser][dir];
        let away = self.nodes[riser][dir.opposite()];

        self.nodes[top][dir.opposite()] = toward;
        if let Some(toward) = toward {
            self.nodes[toward].parent = Some(top);
        }
        self.nodes[child][dir] = away;
        if let Some(away) = away {
            self.nodes[away].parent = Some(child);
        }
        self.nodes[riser][dir] = Some(top);
        self.nodes[riser][dir.opposite()] = Some(child);
        self.nodes[top].parent = Some(riser);
        self.nodes[child].parent = Some(riser);
        self.nodes[riser].parent = parent;
        self.replace_child(parent, top, Some(riser));

        self.update_height(top);
        self.update_height(child);
        self.update_height(riser);
        self.refresh_heights_from(parent);
        riser
    }

    #[inline]
    pub(crate) fn height_of(&self, id: Option<NodeId>) -> u8 {
        id.map_or(0, |id| self.nodes[id].height)
    }

    /// Recompute one node's cached height from its children. Returns whether it changed.
    pub(crate) fn update_height(&mut self, id: NodeId) -> bool {
        let [left, right] = self.nodes[id].child;
        let h = self
            .height_of(left)
            .max(self.height_of(right))
            .saturating_add(1);
        let node = &mut self.nodes[id];
        let changed = node.height != h;
        node.height = h;
        changed
    }

    /// Walk toward the root refreshing cached heights until one stops changing.
    pub(crate) fn refresh_heights_from(&mut self, mut cur: Option<NodeId>) {
        while let Some(id) = cur {
            if !self.update_height(id) {
                break;
            }
            cur = self.nodes[id].parent;
        }
    }
}
