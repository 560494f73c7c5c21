use rootwick::{Tree, TreeError, root_at};
use rstest::rstest;

const BALANCED: &str = "(((A,B)e1,(C,D)e2)e3,E)root;";
const CATERPILLAR: &str = "((((A,B)n1,C)n2,D)n3,(E,F)n4)r;";

fn assert_rooted_at(tree: &Tree, rerooted: &Tree, node_name: &str) {
    assert!(rerooted.is_valid());
    assert_eq!(rerooted.bipartitions(), tree.bipartitions());
    assert_eq!(rerooted.num_leaves(), tree.num_leaves());
    assert_eq!(rerooted.name(), tree.name());

    let node = rerooted.lookup(node_name).unwrap();
    assert_eq!(node.parent(), Some(rerooted.root_index()));
}

// --- TESTS RESULTING NEWICK ---
#[rstest]
#[case("A", "(A,((E,(C,D)e2)e3,B)e1)root;")]
#[case("B", "(B,(A,(E,(C,D)e2)e3)e1)root;")]
#[case("C", "(C,(((A,B)e1,E)e3,D)e2)root;")]
#[case("e1", BALANCED)]
#[case("e3", BALANCED)]
#[case("E", BALANCED)]
fn test_root_at_balanced(#[case] node_name: &str, #[case] expected: &str) {
    let tree = Tree::from_text(BALANCED, None).unwrap();
    let rerooted = root_at(&tree, node_name).unwrap();
    assert_eq!(rerooted.serialize(), expected);
}

#[test]
fn test_root_at_deep_leaf() {
    let tree = Tree::from_text(CATERPILLAR, None).unwrap();
    let rerooted = root_at(&tree, "A").unwrap();
    assert_eq!(rerooted.serialize(), "(A,((((E,F)n4,D)n3,C)n2,B)n1)r;");
}

// --- TESTS INVARIANTS ---
#[rstest]
fn test_topology_preserved(
    #[values(BALANCED, CATERPILLAR, "((A,B)x,C,D)r;", "((A,(B,C)y)x,(D,E)z,(F,G)w)r;")] newick: &str,
) {
    let tree = Tree::from_text(newick, None).unwrap();
    for node in tree.preorder().into_iter().filter(|n| !n.is_root()) {
        let rerooted = root_at(&tree, node.name()).unwrap();
        assert_rooted_at(&tree, &rerooted, node.name());

        if node.parent() == Some(tree.root_index()) {
            assert_eq!(rerooted.serialize(), tree.serialize());
        } else {
            assert_eq!(rerooted.root().num_children(), 2);
        }
    }
}

#[test]
fn test_repeated_rerooting() {
    let tree = Tree::from_text(CATERPILLAR, None).unwrap();
    let mut current = tree.clone();
    for name in ["A", "F", "n2", "D", "B", "n4"] {
        current = current.rooted_at(name).unwrap();
        assert_rooted_at(&tree, &current, name);
    }
}

#[test]
fn test_input_untouched() {
    let tree = Tree::from_text(BALANCED, None).unwrap();
    let _ = root_at(&tree, "A").unwrap();
    assert_eq!(tree.serialize(), BALANCED);
    assert!(tree.is_valid());
}

#[test]
fn test_consuming_and_borrowing_agree() {
    let tree = Tree::from_text(CATERPILLAR, None).unwrap();
    let borrowed = root_at(&tree, "C").unwrap();
    let consumed = tree.rooted_at("C").unwrap();
    assert_eq!(borrowed.serialize(), consumed.serialize());
}

// --- TESTS MULTIFURCATING ROOT ---
#[test]
fn test_multifurcating_root_grouped() {
    let tree = Tree::from_text("((A,B)x,C,D)r;", None).unwrap();
    let rerooted = root_at(&tree, "A").unwrap();
    assert_eq!(rerooted.serialize(), "(A,((C,D)Edge1,B)x)r;");
    assert_eq!(rerooted.num_nodes(), tree.num_nodes() + 1);
    assert_eq!(rerooted.bipartitions(), tree.bipartitions());
    assert!(rerooted.is_valid());
}

#[test]
fn test_multifurcating_root_group_name_is_free() {
    let tree = Tree::from_text("((A,B)Edge1,C,D);", None).unwrap();
    let rerooted = root_at(&tree, "A").unwrap();
    assert_eq!(rerooted.serialize(), "(A,((C,D)Edge2,B)Edge1)Root;");
}

// --- TESTS BRANCH LENGTHS ---
#[test]
fn test_branch_lengths_follow_edges() {
    let tree = Tree::from_text("(((A:1,B:2)e1:3,(C:4,D:5)e2:6)e3:7,E:8)root;", None).unwrap();
    let rerooted = root_at(&tree, "A").unwrap();
    assert_eq!(rerooted.serialize(), "(A:1,((E:8,(C:4,D:5)e2:6)e3:3,B:2)e1)root;");
}

// --- TESTS ERRORS ---
#[test]
fn test_unknown_node() {
    let tree = Tree::from_text(BALANCED, None).unwrap();
    assert!(matches!(root_at(&tree, "Z"), Err(TreeError::NotFound(name)) if name == "Z"));
}

#[test]
fn test_root_at_root() {
    let tree = Tree::from_text(BALANCED, None).unwrap();
    assert!(matches!(root_at(&tree, "root"), Err(TreeError::PreconditionViolation(_))));
}

#[test]
fn test_root_with_single_child() {
    let tree = Tree::from_text("((A,B)x)r;", None).unwrap();
    assert!(matches!(root_at(&tree, "A"), Err(TreeError::PreconditionViolation(_))));
}

#[test]
fn test_root_at_deep_caterpillar() {
    let num_leaves = 3000;
    let mut newick = "(".repeat(num_leaves - 1);
    newick.push_str("L1");
    for i in 2..=num_leaves {
        newick.push_str(&format!(",L{i})"));
    }

    let tree = Tree::from_text(&newick, None).unwrap();
    let rerooted = root_at(&tree, "L1").unwrap();
    assert!(rerooted.is_valid());
    assert_eq!(rerooted.num_nodes(), tree.num_nodes());
    assert!(rerooted.serialize().starts_with("(L1,"));
}
