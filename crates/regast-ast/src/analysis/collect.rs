//! Aggregate `RegexProperties` from live nodes.

use super::literal_length;
use crate::ast::RegexAst;
use crate::nodes::{ConditionalGroup, NodeId, NodeKind};

#[derive(Clone, Copy, Default)]
struct Context {
    in_look_ahead: bool,
    in_look_behind: bool,
    in_loop: bool,
}

pub(crate) fn run(ast: &mut RegexAst) {
    let root = ast.root_node;
    let mut props = std::mem::take(&mut ast.properties);
    let large = ast.options.limits.large_counted_repetition;
    let ignore_atomic_groups = ast.options.flags.ignore_atomic_groups;

    let mut stack = vec![(root, Context::default())];
    while let Some((id, mut ctx)) = stack.pop() {
        let node = ast.node(id);
        if node.is_dead() {
            continue;
        }

        if let Some(q) = node.quantifier {
            props.quantifiers = true;
            if q.is_infinite() {
                props.loops = true;
                ctx.in_loop = true;
            }
            if q.min > large || q.max.is_some_and(|max| max > large) {
                props.large_counted_repetitions = true;
            }
        }

        match &node.kind {
            NodeKind::Group(group) | NodeKind::ConditionalGroup(ConditionalGroup { group, .. }) => {
                if matches!(node.kind, NodeKind::ConditionalGroup(_)) {
                    props.conditional_back_references = true;
                }
                let live = group
                    .alternatives
                    .iter()
                    .filter(|&&alt| !ast.node(alt).is_dead())
                    .count();
                if live > 1 {
                    props.alternations = true;
                }
                ctx.in_loop |= group.is_loop;
                if let Some(n) = group.group_number {
                    if ctx.in_look_ahead || ctx.in_look_behind {
                        props.capture_groups_in_look_around_assertions = true;
                    }
                    if n > 0 && node.is_always_empty() {
                        props.empty_capture_groups = true;
                        if ctx.in_loop {
                            props.empty_capture_groups_in_loops = true;
                        }
                    }
                }
            }
            NodeKind::CharacterClass(class) => {
                if !class.set.is_single() {
                    props.char_classes = true;
                }
            }
            NodeKind::BackReference(reference) => {
                props.back_references = true;
                if ctx.in_look_behind {
                    props.back_references_in_look_behind = true;
                }
                if reference.nested {
                    props.nested_back_references = true;
                }
                if reference.forward {
                    props.forward_references = true;
                }
            }
            NodeKind::LookAhead(look) => {
                props.look_ahead_assertions = true;
                if look.negated {
                    props.negative_look_ahead_assertions = true;
                }
                if !is_literal(ast, look.root.body) {
                    props.complex_look_ahead_assertions = true;
                }
                ctx.in_look_ahead = true;
            }
            NodeKind::LookBehind(look) => {
                props.look_behind_assertions = true;
                if look.negated {
                    props.negative_look_behind_assertions = true;
                }
                if ctx.in_look_behind {
                    props.nested_look_behind_assertions = true;
                }
                if !is_literal(ast, look.root.body) {
                    props.non_literal_look_behind_assertions = true;
                }
                ctx.in_look_behind = true;
            }
            NodeKind::AtomicGroup(_) => {
                if !ignore_atomic_groups {
                    props.atomic_groups = true;
                }
            }
            NodeKind::SubexpressionCall(_) => props.subexpression_calls = true,
            NodeKind::Sequence(_)
            | NodeKind::PositionAssertion(_)
            | NodeKind::MatchFound(_)
            | NodeKind::Root(_) => {}
        }

        stack.extend(ast.children(id).into_iter().rev().map(|child| (child, ctx)));
    }

    ast.properties = props;
}

fn is_literal(ast: &RegexAst, body: Option<NodeId>) -> bool {
    body.is_some_and(|body| literal_length(ast, body).is_some())
}
