use std::collections::HashSet;

use crate::nodes::NodeKind;
use crate::test_utils::{analyzed, body, build, descendants, root_term};

#[test]
fn deep_copy_is_semantically_equal() {
    for pattern in ["abc", "a(b|c)*d", "(?<=x)y+?", "(?>a|)\\1$", "(?(1)a|b)(x)"] {
        let mut ast = build(pattern);
        let root = ast.root();
        let copy = ast.copy_recursive(root).unwrap();
        assert!(ast.equals_semantic(root, &ast, copy), "{pattern}");
    }
}

#[test]
fn deep_copy_uses_fresh_handles() {
    let mut ast = build("a(b|c)*(?=d)");
    let root = ast.root();
    let copy = ast.copy_recursive(root).unwrap();

    let original: HashSet<_> = descendants(&ast, root).into_iter().collect();
    let copied = descendants(&ast, copy);
    assert_eq!(copied.len(), original.len());
    assert!(copied.iter().all(|id| !original.contains(id)));
    assert!(copied.iter().all(|&id| ast.node(id).id().is_none()));
    assert_eq!(ast.node(copy).parent(), None);
}

#[test]
fn copied_capture_group_is_another_owner() {
    let mut ast = build("(a)b");
    let group = root_term(&ast, 0);
    let copy = ast.copy_recursive(group).unwrap();

    assert_eq!(ast.capture_group_owners(1), &[group, copy]);
    assert_eq!(ast.number_of_capture_groups(), 2);
}

#[test]
fn shallow_copy_keeps_payload_only() {
    let mut ast = analyzed("(?:ab)*?c");
    let group = root_term(&ast, 0);
    let copy = ast.copy(group).unwrap();

    let node = ast.node(copy);
    assert!(ast.group(copy).is_empty());
    assert_eq!(node.parent(), None);
    let q = node.quantifier().unwrap();
    assert!(q.equals_semantic(ast.node(group).quantifier().unwrap()));
    assert_eq!(q.index(), None);
    assert_eq!(q.zero_width_index(), None);
    assert_eq!(node.max_path(), 0);
    assert!(!node.has_loops());
    assert_eq!(ast.group(copy).is_loop(), ast.group(group).is_loop());
}

#[test]
fn copied_subtree_root_gets_own_sentinels() {
    let mut ast = build("(?=ab)");
    let look = root_term(&ast, 0);
    let copy = ast.copy_recursive(look).unwrap();

    let original = ast.subtree_root(look);
    let copied = ast.subtree_root(copy);
    assert_ne!(original.match_found(), copied.match_found());
    assert_ne!(body(&ast, look), body(&ast, copy));
    let NodeKind::MatchFound(found) = ast.node(copied.match_found()).kind() else {
        panic!("match-found sentinel");
    };
    assert_eq!(found.next(), Some(body(&ast, copy)));
}

#[test]
fn structural_differences_are_detected() {
    let pairs = [
        ("ab", "ac"),
        ("a*", "a+"),
        ("a*", "a*?"),
        ("a|b", "a|b|c"),
        ("(a)", "(?:a)"),
        ("(?=a)", "(?!a)"),
        ("(?=a)", "(?<=a)"),
        ("\\1(a)", "\\2(a)(b)"),
    ];
    for (x, y) in pairs {
        let (a, b, same) = (build(x), build(y), build(x));
        assert!(!a.equals_semantic(a.root(), &b, b.root()), "{x} vs {y}");
        assert!(a.equals_semantic(a.root(), &same, same.root()), "{x}");
    }
}

#[test]
fn equality_ignores_analysis() {
    let checked = analyzed("a{2,}(b|c)");
    let plain = build("a{2,}(b|c)");
    assert!(checked.equals_semantic(checked.root(), &plain, plain.root()));
}
