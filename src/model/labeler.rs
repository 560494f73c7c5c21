//! Deterministic naming of anonymous nodes.
//!
//! Rearrangements address nodes by name, so every node needs a unique one.
//! Newick strings usually only name leaves; [NodeLabeler] fills in the rest.

use crate::error::TreeError;
use crate::model::tree::{NodeIndex, Tree};
use std::collections::HashSet;
use tracing::trace;

/// Default prefix of generated node names
pub const DEFAULT_NODE_NAME_PREFIX: &str = "Edge";

/// Default name given to an anonymous root
pub const DEFAULT_ROOT_NAME: &str = "Root";

/// Names anonymous nodes in a single pre-order pass.
///
/// An anonymous root gets the configured root name; any other anonymous node
/// gets `prefix` followed by a counter that starts at 1 and increases with each
/// anonymous non-root node in pre-order. Without a root name, the root takes
/// part in the counting like any other node. Named nodes are never changed,
/// and a generated name that is already used in the tree is skipped.
///
/// # Configuration
/// * `with_prefix(prefix)` - Prefix of generated names (default `"Edge"`)
/// * `with_root_name(name)` - Name for an anonymous root (default `"Root"`)
/// * `without_root_name()` - Count the root like other anonymous nodes
///
/// # Example
/// ```
/// use rootwick::{NodeLabeler, Tree};
///
/// let tree = Tree::from_text_with("((a,b),c)", None, NodeLabeler::new().without_root_name()).unwrap();
/// assert_eq!(tree.serialize(), "((a,b)Edge2,c)Edge1;");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLabeler {
    node_name_prefix: String,
    root_name: Option<String>,
}

impl Default for NodeLabeler {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeLabeler {
    /// Creates a labeler with prefix `"Edge"` and root name `"Root"`.
    pub fn new() -> Self {
        Self {
            node_name_prefix: DEFAULT_NODE_NAME_PREFIX.to_string(),
            root_name: Some(DEFAULT_ROOT_NAME.to_string()),
        }
    }

    /// Sets the prefix of generated names.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.node_name_prefix = prefix.into();
        self
    }

    /// Sets the name given to an anonymous root; an empty name acts like [NodeLabeler::without_root_name].
    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        let root_name = root_name.into();
        self.root_name = if root_name.is_empty() { None } else { Some(root_name) };
        self
    }

    /// Lets an anonymous root be numbered like any other anonymous node.
    pub fn without_root_name(mut self) -> Self {
        self.root_name = None;
        self
    }

    /// Returns the prefix of generated names.
    pub fn prefix(&self) -> &str {
        &self.node_name_prefix
    }

    /// Returns the name given to an anonymous root, if any.
    pub fn root_name(&self) -> Option<&str> {
        self.root_name.as_deref()
    }

    /// Names all anonymous nodes of `tree` and refreshes its name lookup.
    ///
    /// Running it again on a labeled tree changes nothing.
    ///
    /// # Returns
    /// The number of nodes that received a name.
    ///
    /// # Errors
    /// [TreeError::DuplicateName] if the configured root name clashes with an existing name.
    pub fn label(&self, tree: &mut Tree) -> Result<usize, TreeError> {
        let num_labeled = self.label_nodes(tree);
        if num_labeled > 0 {
            tree.rebuild_name_index()?;
        }
        Ok(num_labeled)
    }

    /// Names all anonymous nodes without touching the name index.
    pub(crate) fn label_nodes(&self, tree: &mut Tree) -> usize {
        let mut taken: HashSet<String> = tree.pre_order_iter()
            .filter(|n| n.is_named())
            .map(|n| n.name().to_string())
            .collect();

        // Fix the visiting order before renaming
        let order: Vec<(NodeIndex, bool)> = tree.pre_order_iter()
            .filter(|n| !n.is_named())
            .map(|n| (n.index(), n.is_root()))
            .collect();

        let mut count = 0;
        for &(index, is_root) in &order {
            let name = match (&self.root_name, is_root) {
                (Some(root_name), true) => root_name.clone(),
                _ => self.next_counter_name(&mut count, &taken),
            };
            trace!(index, name = name.as_str(), "labeling anonymous node");
            taken.insert(name.clone());
            *tree.name_mut(index) = name;
        }

        order.len()
    }

    /// Returns the first `prefix + n` name (counting from 1) not used in `tree`.
    pub fn next_free_name(&self, tree: &Tree) -> String {
        let mut count = 0;
        loop {
            count += 1;
            let candidate = format!("{}{}", self.node_name_prefix, count);
            if !tree.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn next_counter_name(&self, count: &mut usize, taken: &HashSet<String>) -> String {
        loop {
            *count += 1;
            let candidate = format!("{}{}", self.node_name_prefix, count);
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
    }
}
