//! Node module for phylogenetic tree representation.

use crate::model::tree::NodeIndex;
use std::fmt;
use std::ops::Deref;

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// Represents a node (vertex) in a rooted phylogenetic tree.
///
/// A node is
/// - the **root** if it has no parent,
/// - a **leaf** if it has no children,
/// - **internal** otherwise.
///
/// # Invariants (maintained by [Tree](crate::model::Tree))
/// - `index` is the position of the node in the arena
/// - `parent` is `None` exactly for the root
/// - every child lists this node as its parent
/// - `name` is unique within the tree once labeling ran
#[derive(PartialEq, Debug, Clone)]
pub struct Node {
    /// Index of this node in the tree arena
    pub(crate) index: NodeIndex,
    /// Name; empty if anonymous (before labeling)
    pub(crate) name: String,
    /// Index of the parent node, `None` for the root
    pub(crate) parent: Option<NodeIndex>,
    /// Ordered indices of child nodes
    pub(crate) children: Vec<NodeIndex>,
    /// Length of the edge to the parent, kept as written
    pub(crate) branch_length: Option<BranchLength>,
    /// Bracketed comment that followed the label, without brackets
    pub(crate) comment: Option<String>,
}

impl Node {
    pub(crate) fn new(
        index: NodeIndex,
        name: String,
        children: Vec<NodeIndex>,
        branch_length: Option<BranchLength>,
        comment: Option<String>,
    ) -> Self {
        Node {
            index,
            name,
            parent: None,
            children,
            branch_length,
            comment,
        }
    }

    /// Returns the index of this node.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the name of this node (empty if anonymous).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether this node has a name.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns the ordered child indices (empty for a leaf).
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Returns the number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns the branch length to the parent, if any.
    pub fn branch_length(&self) -> Option<&BranchLength> {
        self.branch_length.as_ref()
    }

    /// Returns the comment attached to this node, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns `true` if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node has children.
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns `true` if this node is the root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the slot of `child` among this node's children.
    pub(crate) fn child_slot(&self, child: NodeIndex) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }
}


// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree.
///
/// The value is guaranteed to be finite. The text it was parsed from is kept,
/// so that writing a tree reproduces the input exactly (`1.50` stays `1.50`).
#[derive(Debug, Clone, PartialEq)]
pub struct BranchLength {
    value: f64,
    raw: String,
}

impl BranchLength {
    /// Parses a branch length from its textual form.
    ///
    /// # Returns
    /// `None` if `raw` is not a finite number.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: f64 = raw.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(BranchLength { value, raw: raw.to_string() })
    }

    /// Returns the text this branch length is written as.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.value
    }
}

impl fmt::Display for BranchLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
