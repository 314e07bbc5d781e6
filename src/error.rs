//! Invariant violations reported by [`RbTree::validate`](crate::RbTree::validate).
//!
//! None of these can be produced by the public API; seeing one means the tree
//! was corrupted by a bug in this crate.

use thiserror::Error;

/// A broken red-black or bookkeeping invariant. `depth` counts edges from the root.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("root node is red")]
    RedRoot,

    #[error("red node with a red parent at depth {depth}")]
    ConsecutiveReds { depth: usize },

    #[error("unbalanced black-height at depth {depth}: left {left}, right {right}")]
    UnbalancedBlacks {
        depth: usize,
        left: usize,
        right: usize,
    },

    #[error("key out of order at depth {depth}")]
    OutOfOrder { depth: usize },

    #[error("parent link does not mirror child link at depth {depth}")]
    BrokenParentLink { depth: usize },

    #[error("stale cached height at depth {depth}: cached {cached}, actual {actual}")]
    StaleHeight {
        depth: usize,
        cached: u8,
        actual: u8,
    },

    #[error("double-black marker left behind at depth {depth}")]
    LingeringDoubleBlack { depth: usize },

    #[error("reached {reachable} nodes from the root but len is {len}")]
    CountMismatch { reachable: usize, len: usize },

    #[error("arena holds {live} live nodes but len is {len}")]
    ArenaLeak { live: usize, len: usize },
}

/// Result alias for invariant checks.
pub type Result<T> = std::result::Result<T, InvariantError>;
