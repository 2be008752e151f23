//! May-match-empty flags.
//!
//! Kept apart from the path arithmetic: zero-width quantifier checks and
//! back-reference handling ask "can this match empty at all", which the
//! path bounds of unbounded loops do not answer.

use crate::ast::RegexAst;
use crate::nodes::{NodeId, NodeKind};

pub(crate) fn run(ast: &mut RegexAst) {
    // Reversed pre-order puts every child before its parent.
    let mut order = Vec::new();
    let mut stack = vec![ast.root_node];
    while let Some(id) = stack.pop() {
        order.push(id);
        // Children are visited even below dead nodes so every node gets a flag.
        stack.extend(ast.children(id));
    }
    for &id in order.iter().rev() {
        mark(ast, id);
    }
}

fn mark(ast: &mut RegexAst, id: NodeId) {
    let children = ast.children(id);
    let node = ast.node(id);
    let optional = node.quantifier.is_some_and(|q| q.min == 0);
    let empty = |&child: &NodeId| ast.node(child).may_match_empty_string();

    let own = match Shape::of(&node.kind) {
        Shape::Consuming => false,
        Shape::ZeroWidth => true,
        Shape::All => children.iter().all(empty),
        Shape::Any => children
            .iter()
            .any(|child| !ast.node(*child).is_dead() && empty(child)),
    };
    let result = !node.is_dead() && (own || optional);
    ast.node_mut(id).set_may_match_empty_string(result);
}

#[derive(Clone, Copy)]
enum Shape {
    Consuming,
    ZeroWidth,
    /// Every child must match empty.
    All,
    /// Some live child must match empty.
    Any,
}

impl Shape {
    fn of(kind: &NodeKind) -> Shape {
        match kind {
            NodeKind::CharacterClass(_) => Shape::Consuming,
            NodeKind::BackReference(_)
            | NodeKind::PositionAssertion(_)
            | NodeKind::SubexpressionCall(_)
            | NodeKind::MatchFound(_)
            | NodeKind::LookAhead(_)
            | NodeKind::LookBehind(_) => Shape::ZeroWidth,
            NodeKind::Sequence(_) | NodeKind::AtomicGroup(_) | NodeKind::Root(_) => Shape::All,
            NodeKind::Group(_) | NodeKind::ConditionalGroup(_) => Shape::Any,
        }
    }
}
