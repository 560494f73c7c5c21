//! Tree module for phylogenetic tree representation.
//!
//! This module provides the core data structures for representing labeled phylogenetic trees:
//! - [Tree]: The main tree structure using the arena pattern, with a name index.
//! - [NodeIndex] is used to index nodes.
//! - [Split] is one side of a leaf bipartition.

use crate::error::TreeError;
use crate::model::labeler::NodeLabeler;
use crate::model::node::{BranchLength, Node};
use crate::newick::{NewickParser, writer};
use crate::parser::byte_parser::ByteParser;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: NodeIndex = usize::MAX;

/// One side of a leaf bipartition, as the set of leaf names on that side.
pub type Split = BTreeSet<String>;


// =#========================================================================#=
// TREE
// =#========================================================================#=
/// A rooted phylogenetic tree represented using the arena pattern on [Node].
///
/// Nodes are stored in a contiguous vector and referenced by [NodeIndex].
/// Parent links are plain indices, so the graph has no reference cycles and
/// cloning a tree yields a fully independent copy.
///
/// # Structure
/// - All nodes are stored in the arena; no node is ever removed
/// - Index of root is maintained
/// - Every node has a unique name once constructed through [Tree::from_text];
///   a name index maps names to nodes and is kept in sync by [Tree::rename]
/// - The root may have any number of children (multifurcating root for unrooted trees),
///   rearrangements expect all other internal nodes to be bifurcating
///
/// # Example
/// ```
/// use rootwick::Tree;
///
/// let tree = Tree::from_text("(((A,B)e1,(C,D)e2)e3,E);", None).unwrap();
/// assert_eq!(tree.name(), "Root");
/// assert_eq!(tree.num_leaves(), 5);
/// assert!(tree.contains("e2"));
/// assert_eq!(tree.serialize(), "(((A,B)e1,(C,D)e2)e3,E)Root;");
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,

    /// Index of the root of this tree
    root_index: NodeIndex,

    /// Name -> index of every named node
    name_index: HashMap<String, NodeIndex>,

    /// Labeling configuration this tree was built with
    labeler: NodeLabeler,
}

// ============================================================================
// Construction (pub + crate)
// ============================================================================
impl Tree {
    /// Parses a Newick string into a tree, names all anonymous nodes with the
    /// default [NodeLabeler], and optionally overrides the name of the root
    /// (an empty override is ignored).
    ///
    /// # Errors
    /// * [TreeError::Parsing] if `text` is not valid Newick
    /// * [TreeError::DuplicateName] if two nodes share a name
    pub fn from_text(text: &str, name: Option<&str>) -> Result<Tree, TreeError> {
        Self::from_text_with(text, name, NodeLabeler::default())
    }

    /// Same as [Tree::from_text] with an explicit labeling configuration.
    ///
    /// # Example
    /// ```
    /// use rootwick::{NodeLabeler, Tree};
    ///
    /// let labeler = NodeLabeler::new().with_prefix("e").with_root_name("r");
    /// let tree = Tree::from_text_with("((a,b),c)", None, labeler).unwrap();
    /// assert_eq!(tree.serialize(), "((a,b)e1,c)r;");
    /// ```
    pub fn from_text_with(text: &str, name: Option<&str>, labeler: NodeLabeler) -> Result<Tree, TreeError> {
        let mut newick_parser = NewickParser::new().with_labeler(labeler);
        if let Some(name) = name {
            newick_parser = newick_parser.with_tree_name(name);
        }

        let mut byte_parser = ByteParser::for_str(text);
        newick_parser.parse_str(&mut byte_parser)
    }

    /// Copies a tree by writing it to Newick and parsing it again,
    /// so the copy shares nothing with this tree.
    pub fn copy(&self) -> Result<Tree, TreeError> {
        Self::from_text_with(&self.serialize(), None, self.labeler.clone())
    }

    /// Creates an empty tree; nodes are added bottom-up with [Tree::add_node].
    pub(crate) fn with_labeler(labeler: NodeLabeler) -> Self {
        Tree {
            nodes: Vec::new(),
            root_index: NO_ROOT_SET_INDEX,
            name_index: HashMap::new(),
            labeler,
        }
    }

    /// Adds a node with the given (already added) children and returns its index.
    ///
    /// Sets the parent of each child to the new node. The name index is not
    /// updated; call [Tree::rebuild_name_index] once all nodes are named.
    pub(crate) fn add_node(
        &mut self,
        name: String,
        children: Vec<NodeIndex>,
        branch_length: Option<BranchLength>,
        comment: Option<String>,
    ) -> NodeIndex {
        let index = self.nodes.len();
        for &child in &children {
            self.nodes[child].parent = Some(index);
        }
        self.nodes.push(Node::new(index, name, children, branch_length, comment));
        index
    }

    /// Adds a new named node above the given children and registers its name.
    ///
    /// # Errors
    /// [TreeError::DuplicateName] if the name is taken.
    pub(crate) fn add_named_node(&mut self, name: String, children: Vec<NodeIndex>) -> Result<NodeIndex, TreeError> {
        if self.name_index.contains_key(&name) {
            return Err(TreeError::DuplicateName(name));
        }
        let index = self.add_node(name.clone(), children, None, None);
        self.name_index.insert(name, index);
        Ok(index)
    }

    /// Sets the root of the tree.
    pub(crate) fn set_root(&mut self, index: NodeIndex) {
        self.root_index = index;
    }

    /// Returns a mutable reference to the name of a node, bypassing the name index.
    pub(crate) fn name_mut(&mut self, index: NodeIndex) -> &mut String {
        &mut self.nodes[index].name
    }

    /// Rebuilds the name index from scratch.
    ///
    /// # Errors
    /// [TreeError::DuplicateName] if two nodes share a name.
    pub(crate) fn rebuild_name_index(&mut self) -> Result<(), TreeError> {
        let mut name_index = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !node.is_named() {
                continue;
            }
            if name_index.insert(node.name.clone(), node.index).is_some() {
                return Err(TreeError::DuplicateName(node.name.clone()));
            }
        }
        self.name_index = name_index;
        Ok(())
    }
}

// ============================================================================
// Getters / Lookup (pub)
// ============================================================================
impl Tree {
    /// Returns the name of the tree, which is the name of its root.
    pub fn name(&self) -> &str {
        self.root().name()
    }

    /// Returns the labeling configuration of this tree.
    pub fn labeler(&self) -> &NodeLabeler {
        &self.labeler
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> NodeIndex {
        self.root_index
    }

    /// Returns a reference to the root node.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Node {
        &self[self.root_index]
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self[index]
    }

    /// Returns the node with the given name.
    ///
    /// # Errors
    /// [TreeError::NotFound] if no node has this name.
    pub fn lookup(&self, name: &str) -> Result<&Node, TreeError> {
        self.index_of(name).map(|index| &self[index])
    }

    /// Returns the index of the node with the given name.
    ///
    /// # Errors
    /// [TreeError::NotFound] if no node has this name.
    pub fn index_of(&self, name: &str) -> Result<NodeIndex, TreeError> {
        self.name_index.get(name)
            .copied()
            .ok_or_else(|| TreeError::NotFound(name.to_string()))
    }

    /// Returns whether a node with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    /// Renames a node, keeping name lookups in sync:
    /// afterwards the node is found under `new_name` but not under `old_name`.
    ///
    /// # Errors
    /// * [TreeError::NotFound] if no node is named `old_name`
    /// * [TreeError::DuplicateName] if another node is already named `new_name`
    pub fn rename(&mut self, old_name: &str, new_name: impl Into<String>) -> Result<(), TreeError> {
        let new_name = new_name.into();
        let index = self.index_of(old_name)?;
        if new_name == old_name {
            return Ok(());
        }
        if new_name.is_empty() {
            return Err(TreeError::precondition("node names must not be empty"));
        }
        if self.name_index.contains_key(&new_name) {
            return Err(TreeError::DuplicateName(new_name));
        }

        self.name_index.remove(old_name);
        self.name_index.insert(new_name.clone(), index);
        self.nodes[index].name = new_name;
        Ok(())
    }

    /// Returns the number of nodes in this tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the leaf names in pre-order.
    pub fn leaf_names(&self) -> Vec<&str> {
        self.pre_order_iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.name())
            .collect()
    }

    /// Returns the names of all leaves in the subtree rooted at `index`.
    pub fn leaf_set(&self, index: NodeIndex) -> BTreeSet<&str> {
        let mut leaves = BTreeSet::new();
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            let node = &self[current];
            if node.is_leaf() {
                leaves.insert(node.name());
            } else {
                stack.extend_from_slice(node.children());
            }
        }
        leaves
    }

    /// Returns the non-trivial leaf bipartitions induced by the edges of this tree,
    /// which describe its unrooted topology.
    ///
    /// Each bipartition is represented by the side *not* containing the
    /// lexicographically smallest leaf name, so that the result does not depend
    /// on where the tree is rooted. Splits separating a single leaf are omitted.
    pub fn bipartitions(&self) -> BTreeSet<Split> {
        let all_leaves = self.leaf_set(self.root_index);
        let num_leaves = all_leaves.len();
        let Some(&smallest) = all_leaves.first() else {
            return BTreeSet::new();
        };

        // Leaf sets bottom-up
        let mut below: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); self.nodes.len()];
        for node in self.post_order_iter() {
            let mut set = BTreeSet::new();
            if node.is_leaf() {
                set.insert(node.name());
            } else {
                for &child in node.children() {
                    set.extend(below[child].iter().copied());
                }
            }
            below[node.index()] = set;
        }

        let mut splits = BTreeSet::new();
        for node in self.pre_order_iter().filter(|n| !n.is_root()) {
            let side = &below[node.index()];
            if side.len() < 2 || num_leaves - side.len() < 2 {
                continue;
            }

            let split: Split = if side.contains(smallest) {
                all_leaves.difference(side).map(|s| s.to_string()).collect()
            } else {
                side.iter().map(|s| s.to_string()).collect()
            };
            splits.insert(split);
        }

        splits
    }

    /// Returns whether every internal node besides the root has exactly two children.
    pub fn is_bifurcating(&self) -> bool {
        self.nodes.iter()
            .filter(|n| n.is_internal() && n.index() != self.root_index)
            .all(|n| n.num_children() == 2)
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is valid and the root has no parent
    /// - All node indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this node as a child exactly once
    /// - Every node is reachable from the root exactly once
    /// - Names are non-empty, unique, and match the name index
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        // Check root index is set and within bounds
        if self.root_index >= self.nodes.len() {
            return false;
        }

        // Root must not have a parent
        if self.nodes[self.root_index].parent.is_some() {
            return false;
        }

        for (index, node) in self.nodes.iter().enumerate() {
            // Check node index matches its arena position
            if node.index != index {
                return false;
            }

            // Check children point back to this node as parent
            for &child in &node.children {
                if child >= self.nodes.len() || self.nodes[child].parent != Some(index) {
                    return false;
                }
            }

            // Check parent references
            match node.parent {
                None if index != self.root_index => return false,
                None => {}
                Some(parent) => {
                    if parent >= self.nodes.len() {
                        return false;
                    }
                    let occurrences = self.nodes[parent].children.iter()
                        .filter(|&&c| c == index)
                        .count();
                    if occurrences != 1 {
                        return false;
                    }
                }
            }

            // Check name and name index
            if !node.is_named() || self.name_index.get(&node.name) != Some(&index) {
                return false;
            }
        }

        if self.name_index.len() != self.nodes.len() {
            return false;
        }

        // Check all nodes reachable exactly once (guards against cycles)
        let mut visited = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.root_index];
        while let Some(index) = stack.pop() {
            if !visited.insert(index) {
                return false;
            }
            stack.extend_from_slice(&self.nodes[index].children);
        }

        visited.len() == self.nodes.len()
    }
}

impl std::ops::Index<NodeIndex> for Tree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

// ============================================================================
// Surgery helpers (crate)
// ============================================================================
impl Tree {
    /// Replaces `old_child` by `new_child` in the children of `parent`, keeping its slot.
    ///
    /// Parent links are left to the caller.
    pub(crate) fn replace_child(&mut self, parent: NodeIndex, old_child: NodeIndex, new_child: NodeIndex) -> Result<(), TreeError> {
        let slot = self.nodes[parent].child_slot(old_child).ok_or_else(|| {
            TreeError::precondition(format!(
                "'{}' is not a child of '{}'", self.nodes[old_child].name, self.nodes[parent].name
            ))
        })?;
        self.nodes[parent].children[slot] = new_child;
        Ok(())
    }

    pub(crate) fn set_parent(&mut self, index: NodeIndex, parent: NodeIndex) {
        self.nodes[index].parent = Some(parent);
    }

    pub(crate) fn set_children(&mut self, index: NodeIndex, children: Vec<NodeIndex>) {
        self.nodes[index].children = children;
    }

    pub(crate) fn branch_length_mut(&mut self, index: NodeIndex) -> &mut Option<BranchLength> {
        &mut self.nodes[index].branch_length
    }

    /// Returns the two children of a bifurcating node.
    ///
    /// # Errors
    /// [TreeError::PreconditionViolation] if the node does not have exactly two children.
    pub(crate) fn two_children(&self, index: NodeIndex) -> Result<[NodeIndex; 2], TreeError> {
        match self.nodes[index].children.as_slice() {
            &[left, right] => Ok([left, right]),
            children => Err(TreeError::precondition(format!(
                "node '{}' has {} children, expected 2", self.nodes[index].name, children.len()
            ))),
        }
    }

    /// Returns the children of `parent` other than `child`, in order.
    pub(crate) fn siblings_of(&self, parent: NodeIndex, child: NodeIndex) -> Vec<NodeIndex> {
        self.nodes[parent].children.iter()
            .copied()
            .filter(|&c| c != child)
            .collect()
    }
}

// ============================================================================
// Traversal, Printing (pub)
// ============================================================================
impl Tree {
    /// Returns all nodes in pre-order (parents before children, children in order).
    ///
    /// The sequence is computed anew on each call.
    pub fn preorder(&self) -> Vec<&Node> {
        self.pre_order_iter().collect()
    }

    /// Returns all nodes in post-order (children before parents).
    ///
    /// The sequence is computed anew on each call.
    pub fn postorder(&self) -> Vec<&Node> {
        self.post_order_iter().collect()
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Returns an iterator over the tree in post-order (children before parents).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns the Newick representation of this tree, terminated by `;`.
    pub fn serialize(&self) -> String {
        writer::to_newick(self)
    }

    /// Returns a box-drawing representation of the tree.
    ///
    /// # Example Output
    /// ```text
    /// Root
    ///   ├─ Edge1 (0.3)
    ///   │   ├─ A (0.1)
    ///   │   └─ B (0.2)
    ///   └─ C (0.4)
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.is_root_set() {
            return out;
        }

        // (index, prefix, is_last), children pushed in reverse to render them in order
        let mut stack = vec![(self.root_index, String::new(), true)];
        while let Some((index, prefix, is_last)) = stack.pop() {
            let node = &self[index];

            let connector = if prefix.is_empty() { "" } else if is_last { "└─ " } else { "├─ " };
            out.push_str(&prefix);
            out.push_str(connector);
            out.push_str(node.name());
            if let Some(branch_length) = node.branch_length() {
                out.push_str(&format!(" ({branch_length})"));
            }
            out.push('\n');

            let child_prefix = if prefix.is_empty() {
                "  ".to_string()
            } else {
                format!("{}{}   ", prefix, if is_last { " " } else { "│" })
            };

            let num_children = node.num_children();
            for (i, &child) in node.children().iter().enumerate().rev() {
                stack.push((child, child_prefix.clone(), i + 1 == num_children));
            }
        }
        out
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Tree \"{}\">", self.name())
    }
}


// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree[index];

            if children_visited || node.is_leaf() {
                return Some(node);
            }

            self.stack.push((index, true));
            // Push children in reverse, so first child is processed first
            for &child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree[index];

        // Push children in reverse, so first child is processed first
        self.stack.extend(node.children().iter().rev());

        Some(node)
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Node;
    type IntoIter = PreOrderIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.pre_order_iter()
    }
}
