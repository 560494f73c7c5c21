//! Newick format writing for labeled trees.

use crate::model::{NodeIndex, Tree};
use crate::newick::defs::{NEWICK_QUOTE_TRIGGERS, STRUCTURE_CHARS_PER_NODE};
use std::borrow::Cow;

/// Returns the Newick representation of this tree with closing semicolon.
///
/// Node names are escaped if necessary, comments are written back in brackets
/// after the name, and branch lengths are written exactly as they were parsed.
///
/// # Example
/// ```
/// use rootwick::Tree;
/// use rootwick::newick::to_newick;
///
/// let tree = Tree::from_text("(('Little Spotted Kiwi':1.0,'Great Spotted Kiwi':1.0)Apteryx:0.5,Okarito:1.5)Root;", None).unwrap();
/// assert_eq!(to_newick(&tree), "(('Little Spotted Kiwi':1.0,'Great Spotted Kiwi':1.0)Apteryx:0.5,Okarito:1.5)Root;");
/// ```
pub fn to_newick(tree: &Tree) -> String {
    let mut newick = String::with_capacity(estimate_newick_len(tree));
    if tree.is_root_set() {
        build_newick(tree, &mut newick, tree.root_index());
    }
    newick.push(';');
    newick
}

/// Returns the Newick representation of the subtree rooted at `index`, without closing semicolon.
pub fn subtree_to_newick(tree: &Tree, index: NodeIndex) -> String {
    let mut newick = String::new();
    build_newick(tree, &mut newick, index);
    newick
}

/// Step of the Newick writer: a subtree still to write, the closing part of an
/// internal node (`)` and label), or a child separator.
enum WriteStep {
    Open(NodeIndex),
    Close(NodeIndex),
    Separator,
}

/// Helper for building the Newick string without recursion
fn build_newick(tree: &Tree, newick: &mut String, index: NodeIndex) {
    let mut stack = vec![WriteStep::Open(index)];

    while let Some(step) = stack.pop() {
        match step {
            WriteStep::Open(index) => {
                let node = tree.node(index);
                if node.is_leaf() {
                    write_node_suffix(tree, newick, index);
                    continue;
                }

                newick.push('(');
                stack.push(WriteStep::Close(index));
                // Push children in reverse, so first child is written first
                for (i, &child) in node.children().iter().enumerate().rev() {
                    stack.push(WriteStep::Open(child));
                    if i > 0 {
                        stack.push(WriteStep::Separator);
                    }
                }
            }
            WriteStep::Close(index) => {
                newick.push(')');
                write_node_suffix(tree, newick, index);
            }
            WriteStep::Separator => newick.push(','),
        }
    }
}

/// Writes label, comment and branch length of a node
fn write_node_suffix(tree: &Tree, newick: &mut String, index: NodeIndex) {
    let node = tree.node(index);
    newick.push_str(&escape_label(node.name()));

    if let Some(comment) = node.comment() {
        newick.push('[');
        newick.push_str(comment);
        newick.push(']');
    }

    if let Some(branch_length) = node.branch_length() {
        newick.push(':');
        newick.push_str(branch_length.as_str());
    }
}

/// Estimates the length of the Newick string of a tree.
fn estimate_newick_len(tree: &Tree) -> usize {
    tree.pre_order_iter()
        .map(|node| {
            node.name().len()
                + node.branch_length().map_or(0, |bl| bl.as_str().len())
                + node.comment().map_or(0, |c| c.len() + 2)
                + STRUCTURE_CHARS_PER_NODE
        })
        .sum::<usize>()
        + 1
}

/// Escapes a label for use in Newick strings.
///
/// Labels containing whitespace or Newick punctuation are wrapped in single
/// quotes, with internal single quotes doubled. Other labels are returned as-is.
///
/// # Examples
/// ```
/// # use rootwick::newick::writer::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> Cow<'_, str> {
    let needs_quotes = label.chars()
        .any(|c| c.is_whitespace() || NEWICK_QUOTE_TRIGGERS.contains(&c));
    if !needs_quotes {
        return Cow::Borrowed(label);
    }

    let mut escaped = String::with_capacity(label.len() + 4);
    escaped.push('\'');
    for ch in label.chars() {
        if ch == '\'' {
            escaped.push('\'');
        }
        escaped.push(ch);
    }
    escaped.push('\'');
    Cow::Owned(escaped)
}
