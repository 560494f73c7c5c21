//! Data model for labeled phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Node]s referenced by [NodeIndex]. A node knows its parent index and its
//! ordered child indices; the tree keeps a name index so that nodes can be
//! addressed by name.
//!
//! # Naming
//! The rearrangements in [crate::topology] address nodes by name, so every
//! node of a [Tree] is named. [NodeLabeler] assigns deterministic names to
//! anonymous nodes when a tree is built.

pub mod labeler;
pub mod node;
pub mod tree;

pub use labeler::NodeLabeler;
pub use node::{BranchLength, Node};
pub use tree::{NodeIndex, PostOrderIter, PreOrderIter, Split, Tree};
