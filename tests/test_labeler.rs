use rootwick::newick::NewickParser;
use rootwick::parser::byte_parser::ByteParser;
use rootwick::{NodeLabeler, Tree, TreeError};
use rstest::rstest;
use std::collections::HashSet;

#[rstest]
#[case::defaults(NodeLabeler::new(), "((a,b)Edge1,c)Root;")]
#[case::numbered_root(NodeLabeler::new().without_root_name(), "((a,b)Edge2,c)Edge1;")]
#[case::empty_root_name(NodeLabeler::new().with_root_name(""), "((a,b)Edge2,c)Edge1;")]
#[case::custom(NodeLabeler::new().with_prefix("e").with_root_name("r"), "((a,b)e1,c)r;")]
fn test_labeling(#[case] labeler: NodeLabeler, #[case] expected: &str) {
    let tree = Tree::from_text_with("((a,b),c)", None, labeler).unwrap();
    assert_eq!(tree.serialize(), expected);
}

#[test]
fn test_labeler_accessors() {
    let labeler = NodeLabeler::default();
    assert_eq!(labeler.prefix(), "Edge");
    assert_eq!(labeler.root_name(), Some("Root"));

    let labeler = labeler.with_prefix("n").without_root_name();
    assert_eq!(labeler.prefix(), "n");
    assert_eq!(labeler.root_name(), None);
}

#[test]
fn test_counter_in_preorder() {
    let tree = Tree::from_text("(((A,B),(C,D)),(E,F));", None).unwrap();
    assert_eq!(tree.serialize(), "(((A,B)Edge2,(C,D)Edge3)Edge1,(E,F)Edge4)Root;");
}

#[test]
fn test_named_nodes_untouched() {
    let tree = Tree::from_text("((a,b)x,(c,d));", None).unwrap();
    assert_eq!(tree.serialize(), "((a,b)x,(c,d)Edge1)Root;");
}

#[test]
fn test_taken_names_skipped() {
    let tree = Tree::from_text("((a,b),(c,d)Edge1);", None).unwrap();
    assert_eq!(tree.serialize(), "((a,b)Edge2,(c,d)Edge1)Root;");
    assert!(tree.is_valid());
}

#[test]
fn test_root_name_collision() {
    let result = Tree::from_text("((Root,b),c);", None);
    assert!(matches!(result, Err(TreeError::DuplicateName(name)) if name == "Root"));
}

#[test]
fn test_labeling_is_deterministic() {
    let newick = "((((a,b),c),(d,(e,f))),((g,h),i));";
    let first = Tree::from_text(newick, None).unwrap();
    let second = Tree::from_text(newick, None).unwrap();
    assert_eq!(first.serialize(), second.serialize());
}

#[test]
fn test_all_names_unique() {
    let tree = Tree::from_text("((((a,b),c),(d,(e,f))),((g,h),i),(,));", None).unwrap();
    let names: HashSet<&str> = tree.preorder().iter().map(|n| n.name()).collect();
    assert_eq!(names.len(), tree.num_nodes());
    assert!(names.iter().all(|name| !name.is_empty()));
    assert!(tree.is_valid());
}

#[test]
fn test_label_is_idempotent() {
    let mut tree = Tree::from_text("((a,b),c)", None).unwrap();
    let before = tree.serialize();

    assert_eq!(NodeLabeler::new().label(&mut tree).unwrap(), 0);
    assert_eq!(NodeLabeler::new().with_prefix("other").label(&mut tree).unwrap(), 0);
    assert_eq!(tree.serialize(), before);
}

#[test]
fn test_name_override_after_labeling() {
    // Without a root name the root uses up the first number before being renamed
    let tree = Tree::from_text_with("((a,b),c)", Some("T"), NodeLabeler::new().without_root_name()).unwrap();
    assert_eq!(tree.serialize(), "((a,b)Edge2,c)T;");
}

#[test]
fn test_next_free_name() {
    let tree = Tree::from_text("((a,b),c)", None).unwrap();
    assert_eq!(tree.labeler().next_free_name(&tree), "Edge2");

    let tree = Tree::from_text("((a,b)Edge2,c)", None).unwrap();
    assert_eq!(tree.labeler().next_free_name(&tree), "Edge1");
}

#[test]
fn test_parser_with_labeler() {
    let mut byte_parser = ByteParser::for_str("((a,b),(c,d));");
    let tree = NewickParser::new()
        .with_labeler(NodeLabeler::new().with_prefix("n"))
        .parse_str(&mut byte_parser)
        .unwrap();
    assert_eq!(tree.serialize(), "((a,b)n1,(c,d)n2)Root;");
    assert_eq!(tree.labeler().prefix(), "n");
}
