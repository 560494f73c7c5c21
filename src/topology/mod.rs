//! Topology rearrangements on labeled trees.
//!
//! Both operations come in two forms:
//! - free functions ([root_at], [nearest_neighbor_interchange]) borrow a tree
//!   and return a rearranged copy, leaving the input untouched
//! - methods ([Tree::rooted_at](crate::Tree::rooted_at),
//!   [Tree::interchanged](crate::Tree::interchanged)) consume a tree and
//!   rearrange it in place

mod nni;
mod reroot;

pub use nni::{Direction, nearest_neighbor_interchange};
pub use reroot::root_at;
