use crate::test_utils::{analyzed, analyzed_with};
use crate::AstOptions;

#[test]
fn literal_pattern_has_no_properties() {
    let ast = analyzed("abc");
    assert_eq!(ast.properties(), &Default::default());
}

#[test]
fn character_classes_skip_single_code_points() {
    assert!(!analyzed("abc").properties().char_classes);
    assert!(!analyzed("[a]").properties().char_classes);
    assert!(analyzed("a|[bc]").properties().char_classes);
    assert!(analyzed(".").properties().char_classes);
}

#[test]
fn dead_nodes_do_not_contribute() {
    let ast = analyzed("a|[]");
    assert!(!ast.properties().char_classes);
    assert!(!ast.properties().alternations);

    let ast = analyzed("a|[]\\1");
    assert!(!ast.properties().back_references);
}

#[test]
fn properties_serialize_by_field_name() {
    let ast = analyzed("(a)\\1");
    let value = serde_json::to_value(ast.properties()).unwrap();

    assert_eq!(value["back_references"], true);
    assert_eq!(value["loops"], false);
    assert_eq!(value["forward_references"], false);
}

#[test]
fn quantifier_facts() {
    let props = analyzed("a{2}b*").properties().clone();
    assert!(props.quantifiers);
    assert!(props.loops);
    assert!(!props.large_counted_repetitions);

    assert!(analyzed("a{41}").properties().large_counted_repetitions);
    assert!(!analyzed("a{40}").properties().large_counted_repetitions);
    assert!(analyzed("a{1,41}").properties().large_counted_repetitions);

    let options = AstOptions::new().large_counted_repetition(100);
    assert!(!analyzed_with("a{41}", options).properties().large_counted_repetitions);
}

#[test]
fn back_reference_facts() {
    let props = analyzed("\\1(a)").properties().clone();
    assert!(props.back_references);
    assert!(props.forward_references);
    assert!(!props.nested_back_references);

    let props = analyzed("(a\\1)").properties().clone();
    assert!(props.nested_back_references);
    assert!(!props.forward_references);

    assert!(analyzed("(a)(?<=\\1)").properties().back_references_in_look_behind);
}

#[test]
fn look_ahead_facts() {
    let props = analyzed("(?!a)b").properties().clone();
    assert!(props.look_ahead_assertions);
    assert!(props.negative_look_ahead_assertions);
    assert!(!props.complex_look_ahead_assertions);
    assert!(props.has_look_around_assertions());
    assert!(props.has_negative_look_around_assertions());

    assert!(analyzed("(?=a+)b").properties().complex_look_ahead_assertions);
    assert!(analyzed("(?=a|b)c").properties().complex_look_ahead_assertions);
}

#[test]
fn look_behind_facts() {
    let props = analyzed("(?<=ab)c").properties().clone();
    assert!(props.look_behind_assertions);
    assert!(!props.non_literal_look_behind_assertions);
    assert!(!props.negative_look_behind_assertions);

    assert!(analyzed("(?<=a|b)c").properties().non_literal_look_behind_assertions);
    assert!(analyzed("(?<!a)c").properties().negative_look_behind_assertions);

    let props = analyzed("(?<=(?<=a)b)c").properties().clone();
    assert!(props.nested_look_behind_assertions);
    assert!(props.non_literal_look_behind_assertions);
}

#[test]
fn capture_groups_in_look_arounds() {
    assert!(analyzed("(?=(a))").properties().capture_groups_in_look_around_assertions);
    assert!(analyzed("(?<=(a))").properties().capture_groups_in_look_around_assertions);
    assert!(!analyzed("(a)(?=b)").properties().capture_groups_in_look_around_assertions);
}

#[test]
fn atomic_groups_respect_flag() {
    assert!(analyzed("(?>a)").properties().atomic_groups);

    let options = AstOptions::new().ignore_atomic_groups(true);
    assert!(!analyzed_with("(?>a)", options).properties().atomic_groups);
}

#[test]
fn subexpression_calls() {
    assert!(analyzed("(a)\\g<1>").properties().subexpression_calls);
}

#[test]
fn empty_capture_groups() {
    let props = analyzed("()a").properties().clone();
    assert!(props.empty_capture_groups);
    assert!(!props.empty_capture_groups_in_loops);

    let props = analyzed("(?:()a)*").properties().clone();
    assert!(props.empty_capture_groups);
    assert!(props.empty_capture_groups_in_loops);

    assert!(!analyzed("(a)").properties().empty_capture_groups);
    assert!(!analyzed("").properties().empty_capture_groups);
}
