// =============================================================================
// Invariant checking
// =============================================================================

use crate::error::{InvariantError, Result};
use crate::node::{Colour, NodeId};
use crate::tree::RbTree;

/// Shape statistics gathered by a successful [`RbTree::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Number of entries.
    pub entries: usize,
    /// Black nodes on every root-to-leaf path.
    pub black_height: usize,
    /// Longest root-to-leaf path, in nodes.
    pub height: usize,
    pub red_nodes: usize,
    /// Vacated arena slots awaiting reuse.
    pub arena_holes: usize,
}

impl<K: Ord, V> RbTree<K, V> {
    /// Check every structural invariant of the tree:
    ///
    /// * keys are strictly increasing in order,
    /// * the root is Black and no Red node has a Red child,
    /// * every path from a node down to a leaf has the same number of Black nodes,
    /// * parent links mirror child links and cached heights are current,
    /// * `len()` matches both the reachable node count and the arena.
    ///
    /// Returns shape statistics on success.
    pub fn validate(&self) -> Result<Stats> {
        let result = self.check_tree();
        if let Err(err) = &result {
            log::debug!("red-black validation failed: {err}");
        }
        result
    }

    fn check_tree(&self) -> Result<Stats> {
        let mut stats = Stats {
            entries: self.len,
            arena_holes: self.nodes.holes(),
            ..Stats::default()
        };
        let mut reachable = 0usize;

        if let Some(root) = self.root {
            if self.nodes.get(root).is_some_and(|n| n.is_red()) {
                return Err(InvariantError::RedRoot);
            }
            let mut walk = Walk {
                reachable: &mut reachable,
                red_nodes: 0,
            };
            let (black_height, height) = self.check_subtree(root, None, None, None, 0, &mut walk)?;
            stats.red_nodes = walk.red_nodes;
            stats.black_height = black_height;
            stats.height = usize::from(height);
        }

        if reachable != self.len {
            return Err(InvariantError::CountMismatch {
                reachable,
                len: self.len,
            });
        }
        if self.nodes.live() != self.len {
            return Err(InvariantError::ArenaLeak {
                live: self.nodes.live(),
                len: self.len,
            });
        }
        Ok(stats)
    }

    /// Returns `(black_height, height)` of the subtree at `id`. `lower`/`upper`
    /// are exclusive key bounds inherited from the ancestors.
    fn check_subtree<'t>(
        &'t self,
        id: NodeId,
        parent: Option<NodeId>,
        lower: Option<&'t K>,
        upper: Option<&'t K>,
        depth: usize,
        walk: &mut Walk<'_>,
    ) -> Result<(usize, u8)> {
        *walk.reachable += 1;
        // A cycle or a shared child would otherwise recurse forever.
        if *walk.reachable > self.len {
            return Err(InvariantError::CountMismatch {
                reachable: *walk.reachable,
                len: self.len,
            });
        }

        let node = self
            .nodes
            .get(id)
            .ok_or(InvariantError::BrokenParentLink { depth })?;
        if node.parent != parent {
            return Err(InvariantError::BrokenParentLink { depth });
        }
        match node.colour {
            Colour::DoubleBlack => return Err(InvariantError::LingeringDoubleBlack { depth }),
            Colour::Red => {
                walk.red_nodes += 1;
                if self.is_red(parent) {
                    return Err(InvariantError::ConsecutiveReds { depth });
                }
            }
            Colour::Black => {}
        }
        if lower.is_some_and(|lo| node.key <= *lo) || upper.is_some_and(|hi| node.key >= *hi) {
            return Err(InvariantError::OutOfOrder { depth });
        }

        let [left, right] = node.child;
        let (left_blacks, left_height) = match left {
            Some(left) => self.check_subtree(left, Some(id), lower, Some(&node.key), depth + 1, walk)?,
            None => (0, 0),
        };
        let (right_blacks, right_height) = match right {
            Some(right) => self.check_subtree(right, Some(id), Some(&node.key), upper, depth + 1, walk)?,
            None => (0, 0),
        };

        if left_blacks != right_blacks {
            return Err(InvariantError::UnbalancedBlacks {
                depth,
                left: left_blacks,
                right: right_blacks,
            });
        }
        let actual = left_height.max(right_height).saturating_add(1);
        if node.height != actual {
            return Err(InvariantError::StaleHeight {
                depth,
                cached: node.height,
                actual,
            });
        }

        let own = usize::from(node.colour == Colour::Black);
        Ok((left_blacks + own, actual))
    }
}

struct Walk<'a> {
    reachable: &'a mut usize,
    red_nodes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Direction, Node};

    fn balanced(keys: &[u32]) -> RbTree<u32, ()> {
        let mut t = RbTree::new();
        for &k in keys {
            t.insert(k, ());
        }
        t.validate().unwrap();
        t
    }

    #[test]
    fn test_stats() {
        let t = balanced(&[1, 2, 3, 4, 5, 6, 7]);
        let stats = t.validate().unwrap();
        assert_eq!(stats.entries, 7);
        assert_eq!(stats.height, t.height());
        assert!(stats.black_height >= 2);
        assert_eq!(stats.arena_holes, 0);

        let empty: RbTree<u32, ()> = RbTree::new();
        assert_eq!(empty.validate().unwrap(), Stats::default());
    }

    #[test]
    fn test_red_root() {
        let mut t = balanced(&[1]);
        let root = t.root.unwrap();
        t.nodes[root].colour = Colour::Red;
        assert_eq!(t.validate(), Err(InvariantError::RedRoot));
    }

    #[test]
    fn test_consecutive_reds() {
        let mut t = balanced(&[2, 1, 3]);
        let four = t.link_leaf_unbalanced(4, ());
        t.nodes[four].colour = Colour::Red;
        assert_eq!(
            t.validate(),
            Err(InvariantError::ConsecutiveReds { depth: 2 })
        );
    }

    #[test]
    fn test_unbalanced_blacks() {
        let mut t = RbTree::new();
        t.link_leaf_unbalanced(2u32, ());
        t.link_leaf_unbalanced(1, ());
        assert_eq!(
            t.validate(),
            Err(InvariantError::UnbalancedBlacks {
                depth: 0,
                left: 1,
                right: 0
            })
        );
    }

    #[test]
    fn test_out_of_order() {
        let mut t = balanced(&[1, 2, 3]);
        let left = t.nodes[t.root.unwrap()][Direction::Left].unwrap();
        t.nodes[left].key = 5;
        assert_eq!(t.validate(), Err(InvariantError::OutOfOrder { depth: 1 }));
    }

    #[test]
    fn test_stale_height() {
        let mut t = balanced(&[1, 2, 3]);
        let root = t.root.unwrap();
        t.nodes[root].height = 7;
        assert_eq!(
            t.validate(),
            Err(InvariantError::StaleHeight {
                depth: 0,
                cached: 7,
                actual: 2
            })
        );
    }

    #[test]
    fn test_broken_parent_link() {
        let mut t = balanced(&[1, 2, 3]);
        let right = t.nodes[t.root.unwrap()][Direction::Right].unwrap();
        t.nodes[right].parent = None;
        assert_eq!(
            t.validate(),
            Err(InvariantError::BrokenParentLink { depth: 1 })
        );
    }

    #[test]
    fn test_lingering_double_black() {
        let mut t = balanced(&[1, 2, 3]);
        let root = t.root.unwrap();
        t.nodes[root].colour = Colour::DoubleBlack;
        assert_eq!(
            t.validate(),
            Err(InvariantError::LingeringDoubleBlack { depth: 0 })
        );
    }

    #[test]
    fn test_count_and_arena_mismatch() {
        let mut t = balanced(&[1, 2, 3]);
        t.len += 1;
        assert_eq!(
            t.validate(),
            Err(InvariantError::CountMismatch {
                reachable: 3,
                len: 4
            })
        );
        t.len -= 1;

        t.nodes.alloc(Node::leaf(9, (), Colour::Black, None));
        assert_eq!(
            t.validate(),
            Err(InvariantError::ArenaLeak { live: 4, len: 3 })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = InvariantError::UnbalancedBlacks {
            depth: 3,
            left: 2,
            right: 1,
        };
        assert_eq!(
            err.to_string(),
            "unbalanced black-height at depth 3: left 2, right 1"
        );
        assert_eq!(InvariantError::RedRoot.to_string(), "root node is red");
    }
}
