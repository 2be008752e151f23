//! Invariant checks excluded from coverage reports.
//!
//! These guard structural guarantees the producer and the passes rely on.
//! A failure is a bug, never a property of the input pattern.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::nodes::{Node, NodeId, NodeKind};

#[inline]
pub fn assert_id_unassigned(node: &Node, id: u32) {
    if let Some(old) = node.id {
        panic!(
            "node numbering: {} already has id {old}, refusing {id} \
             (every node is numbered exactly once)",
            node.kind.name()
        );
    }
}

#[inline]
pub fn node_index_fits(index: usize) -> u32 {
    u32::try_from(index).unwrap_or_else(|_| {
        panic!("ast: node index {index} exceeds u32 (max_nodes is capped at u32::MAX)")
    })
}

#[inline]
pub fn expect_kind<'a, T>(found: Option<&'a T>, node: NodeId, expected: &str) -> &'a T {
    found.unwrap_or_else(|| panic!("ast: {node:?} is not a {expected} (callers check the kind)"))
}

#[inline]
pub fn expect_kind_mut<'a, T>(found: Option<&'a mut T>, node: NodeId, expected: &str) -> &'a mut T {
    found.unwrap_or_else(|| panic!("ast: {node:?} is not a {expected} (callers check the kind)"))
}

#[inline]
pub fn assert_quantifiable(kind: &NodeKind) {
    assert!(
        kind.is_quantifiable(),
        "ast: {} cannot carry a quantifier (parser only quantifies terms)",
        kind.name()
    );
}

#[inline]
pub fn assert_term(kind: &NodeKind) {
    assert!(
        kind.is_term(),
        "ast: {} cannot be a sequence term (parser only appends terms)",
        kind.name()
    );
}

#[inline]
pub fn assert_conditional_room(alternatives: usize) {
    assert!(
        alternatives < 2,
        "ast: conditional back-reference group already has two alternatives \
         (parser rejects a third branch)"
    );
}

#[inline]
pub fn assert_conditional_complete(node: NodeId, alternatives: usize) {
    assert!(
        alternatives == 2,
        "properties: conditional back-reference group {node:?} has {alternatives} alternatives \
         (parser adds the empty else-branch)"
    );
}

#[inline]
pub fn assert_quantifier_ordered(min: u32, max: Option<u32>) {
    if let Some(max) = max {
        assert!(
            min <= max,
            "ast: quantifier {{{min},{max}}} is inverted (parser rejects inverted bounds)"
        );
    }
}

#[inline]
pub fn assert_properties_pending(calculated: bool) {
    assert!(
        !calculated,
        "properties: pass already ran (the producer invokes it exactly once)"
    );
}

#[inline]
pub fn assert_properties_calculated(calculated: bool) {
    assert!(
        calculated,
        "prefix: properties pass has not run (producer must analyze before synthesis)"
    );
}

#[inline]
pub fn ensure_root(root: Option<NodeId>) -> NodeId {
    root.expect("ast: root group not set (parser sets the root before analysis)")
}

#[inline]
pub fn ensure_body(body: Option<NodeId>, node: NodeId) -> NodeId {
    body.unwrap_or_else(|| {
        panic!("ast: subtree root {node:?} has no body (parser sets bodies on pop)")
    })
}

#[inline]
pub fn assert_capture_group_registered(group_number: u32, registered: usize) {
    assert!(
        (group_number as usize) <= registered,
        "ast: capture group {group_number} skips numbers, only {registered} registered \
         (parser numbers groups in order)"
    );
}

#[inline]
pub fn missing_condition_group(group_number: u32) -> ! {
    panic!(
        "properties: condition group {group_number} has no capture group definition \
         (parser validates conditional references)"
    )
}

#[inline]
pub fn no_common_ancestor(a: NodeId, b: NodeId) -> ! {
    panic!("properties: {a:?} and {b:?} have no common ancestor (all sites hang off the root)")
}

#[inline]
pub fn assert_prefix_not_created(created: bool) {
    assert!(
        !created,
        "prefix: wrapper already synthesized (prefix is created at most once)"
    );
}
