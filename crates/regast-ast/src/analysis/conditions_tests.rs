use super::conditions::lowest_common_ancestor;
use crate::test_utils::{analyzed, body, build, root_term};

#[test]
fn condition_groups_are_registered() {
    let ast = analyzed("(x)(y)(?(2)a|b)");

    assert!(ast.condition_groups().contains(2));
    assert!(!ast.condition_groups().contains(1));
    assert!(ast.properties().conditional_back_references);
}

#[test]
fn reference_beside_its_definition() {
    let ast = analyzed("(x)(?(1)a|b)");

    assert!(!ast.properties().conditional_references_into_look_aheads);
}

#[test]
fn reference_inside_look_ahead() {
    let ast = analyzed("(x)(?=(?(1)a|b))");
    assert!(ast.properties().conditional_references_into_look_aheads);
}

#[test]
fn definition_inside_look_ahead() {
    let ast = analyzed("(?=(x))(?(1)a|b)");
    assert!(ast.properties().conditional_references_into_look_aheads);
}

#[test]
fn both_sites_in_the_same_look_ahead() {
    let ast = analyzed("(?=(x)(?(1)a|b))c");
    assert!(!ast.properties().conditional_references_into_look_aheads);
}

#[test]
fn conditional_group_reads_empty_else_branch() {
    let ast = analyzed("(x)?(?(1)a)");
    let conditional = root_term(&ast, 1);
    let group = ast.group(conditional);

    assert_eq!(group.size(), 2);
    assert!(ast.node(conditional).may_match_empty_string());
    assert_eq!(ast.node(conditional).min_path(), 0);
}

#[test]
#[should_panic(expected = "condition group 2 has no capture group definition")]
fn missing_definition_panics() {
    analyzed("(x)(?(2)a|b)");
}

#[test]
fn common_ancestor_of_siblings_is_their_sequence() {
    let ast = build("(a)(b)");
    let first = root_term(&ast, 0);
    let second = root_term(&ast, 1);
    let seq = ast.node(first).parent().unwrap();

    assert_eq!(lowest_common_ancestor(&ast, first, second), seq);
    assert_eq!(lowest_common_ancestor(&ast, first, first), first);
    assert_eq!(lowest_common_ancestor(&ast, seq, second), seq);
}

#[test]
fn common_ancestor_spans_subtree_roots() {
    let ast = build("(?=(a))b");
    let look = root_term(&ast, 0);
    let inner = body(&ast, look);

    assert_eq!(lowest_common_ancestor(&ast, inner, look), look);
    let seq = ast.node(look).parent().unwrap();
    assert_eq!(lowest_common_ancestor(&ast, inner, root_term(&ast, 1)), seq);
}

#[test]
#[should_panic(expected = "have no common ancestor")]
fn detached_nodes_have_no_common_ancestor() {
    let mut ast = build("a");
    let detached = ast.create_group().unwrap();
    lowest_common_ancestor(&ast, ast.root(), detached);
}
