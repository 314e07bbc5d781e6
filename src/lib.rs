//! # rbtree-rs
//!
//! An ordered map ([`RbTree`]) and ordered set ([`RbSet`]) built on a
//! red-black tree whose nodes live in an index-addressed arena.
//!
//! Positions are exposed as bidirectional [`Cursor`]s: `find` and
//! `lower_bound` return one, and a miss is the past-the-end cursor `end()`.
//! Stepping backward from `end()` reaches the largest key, so reverse walks
//! need no special casing.
//!
//! ## Example
//!
//! ```rust
//! use rbtree_rs::RbTree;
//!
//! let mut tree = RbTree::new();
//! for k in [4, 2, 6, 1, 3, 5, 7] {
//!     tree.insert(k, k * 10);
//! }
//! assert_eq!(tree.erase(&4), Some(40));
//!
//! let mut cursor = tree.lower_bound(&4);
//! assert_eq!(cursor.key(), Some(&5));
//! cursor.move_prev();
//! assert_eq!(cursor.entry(), Some((&3, &30)));
//!
//! tree.validate().unwrap();
//! ```
//!
//! ## Features
//!
//! * `paranoid`: run [`RbTree::validate`] after every mutation and panic on
//!   the first broken invariant.

#![forbid(unsafe_code)]

mod arena;
mod cursor;
pub mod error;
mod node;
mod rotate;
mod set;
mod tree;
mod validate;

pub use arena::MAX_NODES;
pub use cursor::{Cursor, IntoIter, Iter, Keys, Values};
pub use error::InvariantError;
pub use node::{Colour, NodeId, NodeRef};
pub use set::{RbSet, SetIntoIter, SetIter};
pub use tree::RbTree;
pub use validate::Stats;

#[cfg(test)]
mod proptests;
