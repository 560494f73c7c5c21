//! Rootwick is a library to rearrange labeled phylogenetic trees given as
//! Newick strings.
//!
//! This crate parses Newick strings into an arena-based tree, names every
//! anonymous node, and offers two topology rearrangements:
//! - Rerooting: move the root onto the edge above any node while keeping the
//!   unrooted topology (the set of leaf bipartitions).
//! - Nearest-neighbor interchange (NNI): exchange two subtrees across an
//!   internal edge, the basic move of tree-search heuristics.
//!
//! Core functionality provided:
//! - Newick: Parse and write single Newick strings, keeping internal node
//!   names, comments after labels, and branch lengths as written.
//! - Labeling: [NodeLabeler] gives anonymous nodes deterministic unique names
//!   (`Edge1`, `Edge2`, ... and `Root`), since rearrangements address nodes by name.
//! - Tree model: [Tree] stores [Node]s in an arena with parent and child
//!   indices, and a name index kept in sync by [Tree::rename].
//! - Rearrangements never touch the input tree; they work on a copy.
//!
//! Limitations:
//! - Rearrangements expect internal nodes other than the root to be bifurcating
//! - Branch lengths are carried along but never recomputed
//!
//! # Example
//! ```
//! use rootwick::{Direction, Tree, nearest_neighbor_interchange, root_at};
//!
//! let tree = Tree::from_text("(((A,B),(C,D)),E);", None).unwrap();
//! assert_eq!(tree.serialize(), "(((A,B)Edge2,(C,D)Edge3)Edge1,E)Root;");
//!
//! let rerooted = root_at(&tree, "C").unwrap();
//! assert_eq!(rerooted.serialize(), "(C,(((A,B)Edge2,E)Edge1,D)Edge3)Root;");
//! assert_eq!(rerooted.bipartitions(), tree.bipartitions());
//!
//! let swapped = nearest_neighbor_interchange(&tree, "Edge2", Direction::First).unwrap().unwrap();
//! assert_eq!(swapped.serialize(), "((((C,D)Edge3,B)Edge2,A)Edge1,E)Root;");
//! ```

pub mod error;
pub mod model;
pub mod newick;
pub mod parser;
pub mod topology;

pub use crate::error::TreeError;
pub use crate::model::{Node, NodeIndex, NodeLabeler, Tree};
pub use crate::parser::ParsingError;
pub use crate::topology::{Direction, nearest_neighbor_interchange, root_at};

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string using default settings, returning a labeled [Tree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree, TreeError> {
    newick::parse_str(newick)
}
