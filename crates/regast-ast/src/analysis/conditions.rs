//! Conditional back-reference groups.
//!
//! The reverse sweep registers condition group numbers before the forward
//! sweep, so the forward sweep can record where those groups are defined.
//! Validation then relates every definition and reference site through
//! their lowest common ancestor.

use tracing::debug;

use super::props::ConditionSites;
use crate::ast::RegexAst;
use crate::invariants;
use crate::nodes::{NodeId, NodeKind};

/// Walk the tree last-to-first and record every condition group number.
pub(crate) fn register_condition_groups(ast: &mut RegexAst) {
    let mut stack = vec![ast.root_node];
    let mut found = Vec::new();
    while let Some(id) = stack.pop() {
        if let NodeKind::ConditionalGroup(c) = &ast.node(id).kind {
            found.push(c.referenced_group);
        }
        // Pushing in order pops children last-first.
        stack.extend(ast.children(id));
    }
    for n in found {
        ast.condition_groups.insert(n);
    }
}

pub(crate) fn validate(ast: &mut RegexAst, sites: &ConditionSites) {
    for n in ast.condition_groups.to_vec() {
        let definitions: Vec<NodeId> = sites
            .definitions
            .iter()
            .filter(|(g, _)| *g == n)
            .map(|&(_, id)| id)
            .collect();
        if definitions.is_empty() {
            invariants::missing_condition_group(n);
        }
        let references = sites
            .references
            .iter()
            .filter(|(g, _)| *g == n)
            .map(|&(_, id)| id);
        let all: Vec<NodeId> = definitions.iter().copied().chain(references).collect();

        let ancestor = all[1..]
            .iter()
            .fold(all[0], |acc, &site| lowest_common_ancestor(ast, acc, site));
        let into_look_ahead = all
            .iter()
            .any(|&site| crosses_look_ahead(ast, site, ancestor));
        if into_look_ahead {
            debug!(group = n, ancestor = ?ancestor, "conditional reference into look-ahead");
            ast.properties.conditional_references_into_look_aheads = true;
        }
    }
}

fn ancestors(ast: &RegexAst, id: NodeId) -> Vec<NodeId> {
    let mut chain = vec![id];
    let mut current = id;
    while let Some(parent) = ast.node(current).parent {
        chain.push(parent);
        current = parent;
    }
    chain
}

/// Deepest node that is `a` or an ancestor of `a`, and likewise for `b`.
pub(crate) fn lowest_common_ancestor(ast: &RegexAst, a: NodeId, b: NodeId) -> NodeId {
    let chain_a = ancestors(ast, a);
    let chain_b = ancestors(ast, b);
    let mut found = None;
    for (x, y) in chain_a.iter().rev().zip(chain_b.iter().rev()) {
        if x != y {
            break;
        }
        found = Some(*x);
    }
    found.unwrap_or_else(|| invariants::no_common_ancestor(a, b))
}

/// Whether a look-ahead lies strictly between `site` and `ancestor`.
fn crosses_look_ahead(ast: &RegexAst, site: NodeId, ancestor: NodeId) -> bool {
    let mut current = Some(site);
    while let Some(id) = current {
        if id == ancestor {
            return false;
        }
        if matches!(ast.node(id).kind, NodeKind::LookAhead(_)) {
            return true;
        }
        current = ast.node(id).parent;
    }
    false
}
