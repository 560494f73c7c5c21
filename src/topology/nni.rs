//! Nearest-neighbor interchange (NNI).
//!
//! An internal edge separates four subtrees: `a` and `b` below the near end
//! of the edge, `c` and `d` on the far side. An interchange exchanges one
//! subtree of each side; [Direction] selects which pair.

use crate::error::TreeError;
use crate::model::{NodeIndex, Tree};
use tracing::{debug, instrument};

/// Which pair of subtrees an interchange exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// Exchange `a` and `c`
    #[default]
    First,
    /// Exchange `b` and `c`
    Second,
    /// Exchange `a` and `d`
    Third,
}

/// Positions in `[a, b]` and `[c, d]` of the subtrees exchanged, by direction.
const SWAP_TABLE: [(usize, usize); 3] = [(0, 0), (1, 0), (0, 1)];

impl Direction {
    /// All directions, in order.
    pub const ALL: [Direction; 3] = [Direction::First, Direction::Second, Direction::Third];

    fn exchanged_slots(self) -> (usize, usize) {
        SWAP_TABLE[self as usize]
    }
}

impl TryFrom<u8> for Direction {
    type Error = TreeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::First),
            2 => Ok(Direction::Second),
            3 => Ok(Direction::Third),
            _ => Err(TreeError::precondition(format!("NNI direction must be 1, 2 or 3, got {value}"))),
        }
    }
}

/// Returns a copy of `tree` with one nearest-neighbor interchange applied
/// around the edge above the node named `node_name`.
///
/// `tree` itself is not modified. See [Tree::interchanged] for details.
///
/// # Returns
/// * `Ok(Some(tree))` - The rearranged tree
/// * `Ok(None)` - The edge has a leaf on its far side, so there is nothing to exchange
///
/// # Example
/// ```
/// use rootwick::{Direction, Tree, nearest_neighbor_interchange};
///
/// let tree = Tree::from_text("((A,B)x,(C,D)y)r;", None).unwrap();
/// let swapped = nearest_neighbor_interchange(&tree, "x", Direction::First).unwrap().unwrap();
/// assert_eq!(swapped.serialize(), "((C,B)x,(A,D)y)r;");
/// ```
#[instrument(level = "debug", skip(tree), fields(tree = tree.name()))]
pub fn nearest_neighbor_interchange(tree: &Tree, node_name: &str, direction: Direction) -> Result<Option<Tree>, TreeError> {
    tree.clone().interchanged(node_name, direction)
}

impl Tree {
    /// Applies a nearest-neighbor interchange around the edge between the node
    /// named `node_name` and its parent.
    ///
    /// The node must be internal with two children `a` and `b`. The far side
    /// of the edge is determined as follows:
    /// - Parent is a bifurcating root: `c` and `d` are the children of the other
    ///   root child; if that is a leaf, there is nothing to exchange and `None`
    ///   is returned.
    /// - Parent is a root with three children: `c` and `d` are the two siblings.
    /// - Otherwise: `c` is the sibling and `d` is the rest of the tree above the
    ///   parent. As `d` contains the root, exchanging `a` and `d` is carried out as
    ///   the exchange of `b` and `c`, which gives the same unrooted tree while
    ///   keeping the root in place.
    ///
    /// # Errors
    /// * [TreeError::NotFound] if there is no node named `node_name`
    /// * [TreeError::PreconditionViolation] if the node is the root or a leaf,
    ///   a node around the edge is not bifurcating, or the root has four or
    ///   more children
    pub fn interchanged(mut self, node_name: &str, direction: Direction) -> Result<Option<Tree>, TreeError> {
        let node = self.index_of(node_name)?;
        let Some(parent) = self[node].parent() else {
            return Err(TreeError::precondition(format!("NNI on root '{node_name}'")));
        };
        if self[node].is_leaf() {
            return Err(TreeError::precondition(format!("NNI on leaf '{node_name}'")));
        }

        let near = self.two_children(node)?;
        let (mut near_slot, mut far_slot) = direction.exchanged_slots();

        let (far_anchor, far) = if parent == self.root_index() {
            let siblings = self.siblings_of(parent, node);
            match siblings.as_slice() {
                &[other] => {
                    if self[other].is_leaf() {
                        debug!(node = node_name, other = self[other].name(), "far side is a leaf, nothing to exchange");
                        return Ok(None);
                    }
                    (other, self.two_children(other)?)
                }
                &[first, second] => (parent, [first, second]),
                _ => {
                    return Err(TreeError::precondition(format!(
                        "root '{}' has {} children, NNI needs 2 or 3", self.name(), siblings.len() + 1
                    )));
                }
            }
        } else {
            let siblings = self.siblings_of(parent, node);
            let &[sibling] = siblings.as_slice() else {
                return Err(TreeError::precondition(format!(
                    "node '{}' has {} children, expected 2", self[parent].name(), siblings.len() + 1
                )));
            };
            if far_slot == 1 {
                near_slot = 1 - near_slot;
                far_slot = 0;
            }
            (parent, [sibling, parent])
        };

        let a = near[near_slot];
        let c = far[far_slot];
        debug!(
            node = node_name,
            ?direction,
            near = self[a].name(),
            far = self[c].name(),
            "exchanging subtrees"
        );
        self.exchange_subtrees(node, a, far_anchor, c)?;

        Ok(Some(self))
    }

    /// Exchanges subtree `a` (child of `ab`) with subtree `c` (child of `cd`),
    /// each taking the other's slot.
    fn exchange_subtrees(&mut self, ab: NodeIndex, a: NodeIndex, cd: NodeIndex, c: NodeIndex) -> Result<(), TreeError> {
        self.replace_child(ab, a, c)?;
        self.replace_child(cd, c, a)?;
        self.set_parent(a, cd);
        self.set_parent(c, ab);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_table_pairs() {
        assert_eq!(Direction::First.exchanged_slots(), (0, 0));
        assert_eq!(Direction::Second.exchanged_slots(), (1, 0));
        assert_eq!(Direction::Third.exchanged_slots(), (0, 1));
    }

    #[test]
    fn test_direction_from_number() {
        assert_eq!(Direction::try_from(1).unwrap(), Direction::First);
        assert_eq!(Direction::try_from(3).unwrap(), Direction::Third);
        assert!(matches!(Direction::try_from(0), Err(TreeError::PreconditionViolation(_))));
        assert!(matches!(Direction::try_from(4), Err(TreeError::PreconditionViolation(_))));
    }

    #[test]
    fn test_default_direction_is_first() {
        assert_eq!(Direction::default(), Direction::First);
    }
}
