//! Rerooting by path reversal.

use crate::error::TreeError;
use crate::model::{NodeIndex, Tree};
use tracing::{debug, instrument, trace};

/// Returns a copy of `tree` rooted on the edge above the node named `node_name`.
///
/// The result has the same leaf bipartitions (the same unrooted topology) as
/// `tree`, and the named node is a child of the root. `tree` itself is not
/// modified. See [Tree::rooted_at] for details.
///
/// # Example
/// ```
/// use rootwick::{Tree, root_at};
///
/// let tree = Tree::from_text("(((A,B)e1,(C,D)e2)e3,E)root;", None).unwrap();
/// let rerooted = root_at(&tree, "A").unwrap();
/// assert_eq!(rerooted.serialize(), "(A,((E,(C,D)e2)e3,B)e1)root;");
/// assert_eq!(rerooted.bipartitions(), tree.bipartitions());
/// ```
#[instrument(level = "debug", skip(tree), fields(tree = tree.name()))]
pub fn root_at(tree: &Tree, node_name: &str) -> Result<Tree, TreeError> {
    tree.clone().rooted_at(node_name)
}

impl Tree {
    /// Reroots this tree on the edge above the node named `node_name`.
    ///
    /// The root node is reused as the new root: it is placed between the
    /// target node and its former parent, and the parent links on the path
    /// from there up to the old root are reversed. Where the old root was, its
    /// two child subtrees are joined directly.
    ///
    /// If the old root has three or more children (an unrooted tree), the
    /// children not on the path are first grouped under a new node, named by
    /// the tree's [NodeLabeler](crate::NodeLabeler), so that no bipartition is
    /// lost.
    ///
    /// Branch lengths stay with their edges: along the reversed path a length
    /// moves to the new lower end of its edge. The former parent of the target
    /// loses its length, as its edge is split by the root, and the edge
    /// joining the two old root subtrees keeps the length of the subtree that
    /// did not contain the target.
    ///
    /// If the target is already a child of the root, the tree is returned as is.
    ///
    /// # Errors
    /// * [TreeError::NotFound] if there is no node named `node_name`
    /// * [TreeError::PreconditionViolation] if the target is the root, or the
    ///   root has fewer than two children
    pub fn rooted_at(mut self, node_name: &str) -> Result<Tree, TreeError> {
        let node = self.index_of(node_name)?;
        let root = self.root_index();

        let Some(ancestor) = self[node].parent() else {
            return Err(TreeError::precondition(format!("'{node_name}' is already the root")));
        };
        if self[root].num_children() < 2 {
            return Err(TreeError::precondition(format!(
                "root '{}' has {} child(ren), rerooting needs at least 2", self.name(), self[root].num_children()
            )));
        }
        if ancestor == root {
            debug!(node = node_name, "parent is already the root, nothing to do");
            return Ok(self);
        }

        // Path from the parent of node up to the root child containing node
        let path = self.path_below_root(ancestor);
        let part_a = path[path.len() - 1];
        let part_b = self.detach_other_root_children(part_a)?;
        debug!(
            node = node_name,
            path_len = path.len(),
            part_a = self[part_a].name(),
            part_b = self[part_b].name(),
            "rerooting"
        );

        self.shift_branch_lengths_up(&path);

        // Old root becomes new root between node and its former parent
        self.set_children(root, vec![node, ancestor]);
        self.set_parent(node, root);

        // Reverse parent links along the path
        for (i, &current) in path.iter().enumerate() {
            let below = if i == 0 { node } else { path[i - 1] };
            let above = path.get(i + 1).copied().unwrap_or(part_b);
            let new_parent = if i == 0 { root } else { path[i - 1] };

            self.replace_child(current, below, above)?;
            self.set_parent(current, new_parent);
            trace!(node = self[current].name(), new_parent = self[new_parent].name(), "reversed edge");
        }
        self.set_parent(part_b, part_a);

        Ok(self)
    }

    /// Returns the ancestors of `start`, starting with itself, up to the child of the root.
    fn path_below_root(&self, start: NodeIndex) -> Vec<NodeIndex> {
        let root = self.root_index();
        let mut path = vec![start];
        let mut current = start;
        while let Some(parent) = self[current].parent() {
            if parent == root {
                break;
            }
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Returns the single subtree formed by all root children except `part_a`.
    ///
    /// With a bifurcating root this is the sibling of `part_a`; otherwise the
    /// siblings are grouped under a newly created node.
    fn detach_other_root_children(&mut self, part_a: NodeIndex) -> Result<NodeIndex, TreeError> {
        let others = self.siblings_of(self.root_index(), part_a);
        if let [part_b] = others.as_slice() {
            return Ok(*part_b);
        }

        let name = self.labeler().next_free_name(self);
        debug!(name = name.as_str(), num_grouped = others.len(), "grouping children of multifurcating root");
        self.add_named_node(name, others)
    }

    /// Moves each branch length on `path` one node up; the first node loses its length
    /// and the length of the last node is dropped.
    fn shift_branch_lengths_up(&mut self, path: &[NodeIndex]) {
        let mut carried = self.branch_length_mut(path[0]).take();
        for &index in &path[1..] {
            std::mem::swap(self.branch_length_mut(index), &mut carried);
        }
    }
}
