use rootwick::{Direction, Tree, TreeError, nearest_neighbor_interchange};
use rstest::rstest;

const BALANCED: &str = "(((A,B)e1,(C,D)e2)e3,E)root;";
const ROOT_EDGE: &str = "((A,B)x,(C,D)y)r;";
const UNROOTED: &str = "((A,B)x,C,D)r;";

fn interchange(newick: &str, node_name: &str, direction: Direction) -> Option<Tree> {
    let tree = Tree::from_text(newick, None).unwrap();
    nearest_neighbor_interchange(&tree, node_name, direction).unwrap()
}

// --- TESTS RESULTING NEWICK ---
#[rstest]
#[case::first(Direction::First, "((C,B)x,(A,D)y)r;")]
#[case::second(Direction::Second, "((A,C)x,(B,D)y)r;")]
#[case::third(Direction::Third, "((D,B)x,(C,A)y)r;")]
fn test_nni_across_root_edge(#[case] direction: Direction, #[case] expected: &str) {
    let swapped = interchange(ROOT_EDGE, "x", direction).unwrap();
    assert_eq!(swapped.serialize(), expected);
}

#[rstest]
#[case::first(Direction::First, "((((C,D)e2,B)e1,A)e3,E)root;")]
#[case::second(Direction::Second, "(((A,(C,D)e2)e1,B)e3,E)root;")]
#[case::third(Direction::Third, "(((A,(C,D)e2)e1,B)e3,E)root;")]
fn test_nni_below_root(#[case] direction: Direction, #[case] expected: &str) {
    let swapped = interchange(BALANCED, "e1", direction).unwrap();
    assert_eq!(swapped.serialize(), expected);
}

#[rstest]
#[case::first(Direction::First, "((C,B)x,A,D)r;")]
#[case::second(Direction::Second, "((A,C)x,B,D)r;")]
#[case::third(Direction::Third, "((D,B)x,C,A)r;")]
fn test_nni_at_trifurcating_root(#[case] direction: Direction, #[case] expected: &str) {
    let swapped = interchange(UNROOTED, "x", direction).unwrap();
    assert_eq!(swapped.serialize(), expected);
}

#[test]
fn test_direction_from_number() {
    let tree = Tree::from_text(ROOT_EDGE, None).unwrap();
    let direction = Direction::try_from(2).unwrap();
    let swapped = nearest_neighbor_interchange(&tree, "x", direction).unwrap().unwrap();
    assert_eq!(swapped.serialize(), "((A,C)x,(B,D)y)r;");
}

// --- TESTS NO-OP ---
#[test]
fn test_far_side_leaf() {
    for direction in Direction::ALL {
        assert!(interchange(BALANCED, "e3", direction).is_none());
    }
}

// --- TESTS INVARIANTS ---
#[rstest]
fn test_nni_is_local(
    #[values(Direction::First, Direction::Second, Direction::Third)] direction: Direction,
    #[values((BALANCED, "e1", "e3"), (BALANCED, "e2", "e3"), (ROOT_EDGE, "x", "y"), (ROOT_EDGE, "y", "x"))]
    case: (&str, &str, &str),
) {
    let (newick, node_name, far_anchor) = case;
    let tree = Tree::from_text(newick, None).unwrap();
    let swapped = nearest_neighbor_interchange(&tree, node_name, direction).unwrap().unwrap();

    assert!(swapped.is_valid());
    assert!(swapped.is_bifurcating());
    assert_eq!(swapped.num_nodes(), tree.num_nodes());
    assert_eq!(swapped.root().name(), tree.root().name());
    assert_ne!(swapped.bipartitions(), tree.bipartitions());

    // Only the two ends of the edge change their subtrees
    for node in tree.preorder() {
        let other = swapped.lookup(node.name()).unwrap();
        assert_eq!(other.num_children(), node.num_children());
        if node.name() != node_name && node.name() != far_anchor {
            assert_eq!(
                swapped.leaf_set(other.index()),
                tree.leaf_set(node.index()),
                "subtree of {} changed", node.name()
            );
        }
    }
}

#[test]
fn test_unrooted_neighbors_at_root_edge() {
    let tree = Tree::from_text(ROOT_EDGE, None).unwrap();
    let topologies: Vec<_> = Direction::ALL
        .iter()
        .map(|&direction| interchange(ROOT_EDGE, "x", direction).unwrap().bipartitions())
        .collect();

    // Exchanging a with d gives the same unrooted tree as exchanging b with c
    assert_eq!(topologies[1], topologies[2]);
    assert_ne!(topologies[0], topologies[1]);
    assert!(topologies.iter().all(|splits| *splits != tree.bipartitions()));
}

#[test]
fn test_input_untouched() {
    let tree = Tree::from_text(BALANCED, None).unwrap();
    let _ = nearest_neighbor_interchange(&tree, "e1", Direction::First).unwrap();
    assert_eq!(tree.serialize(), BALANCED);
}

#[test]
fn test_consuming_and_borrowing_agree() {
    let tree = Tree::from_text(BALANCED, None).unwrap();
    let borrowed = nearest_neighbor_interchange(&tree, "e2", Direction::Second).unwrap().unwrap();
    let consumed = tree.interchanged("e2", Direction::Second).unwrap().unwrap();
    assert_eq!(borrowed.serialize(), consumed.serialize());
}

// --- TESTS ERRORS ---
#[test]
fn test_unknown_node() {
    let tree = Tree::from_text(BALANCED, None).unwrap();
    let result = nearest_neighbor_interchange(&tree, "Z", Direction::First);
    assert!(matches!(result, Err(TreeError::NotFound(name)) if name == "Z"));
}

#[rstest]
#[case::leaf(BALANCED, "A")]
#[case::root(BALANCED, "root")]
#[case::root_with_four_children("((A,B)x,C,D,E)r;", "x")]
#[case::multifurcating_node("((A,B,C)x,D)r;", "x")]
#[case::multifurcating_far_side("((A,B)x,(C,D,E)y)r;", "x")]
fn test_precondition_violations(#[case] newick: &str, #[case] node_name: &str) {
    let tree = Tree::from_text(newick, None).unwrap();
    let result = nearest_neighbor_interchange(&tree, node_name, Direction::First);
    assert!(matches!(result, Err(TreeError::PreconditionViolation(_))), "{result:?}");
}

#[test]
fn test_invalid_direction_number() {
    assert!(matches!(Direction::try_from(0), Err(TreeError::PreconditionViolation(_))));
    assert!(matches!(Direction::try_from(4), Err(TreeError::PreconditionViolation(_))));
}
