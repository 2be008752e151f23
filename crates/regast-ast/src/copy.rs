//! Node duplication and structural comparison.
//!
//! Used by quantifier unrolling and case-fold expansion, which duplicate
//! subtrees inside the same AST and then check the result still means the
//! same thing.

use crate::ast::RegexAst;
use crate::nodes::{Group, NodeId, NodeKind, Quantifier};
use crate::Result;

impl RegexAst {
    /// Duplicate one node: payload and quantifier, no children, no parent,
    /// no id, no analysis results. Subtree roots get fresh sentinels and no
    /// body; capture groups become additional owners of their number.
    pub fn copy(&mut self, id: NodeId) -> Result<NodeId> {
        let original = self.node(id);
        let quantifier = original
            .quantifier
            .map(|q| Quantifier::new(q.min, q.max, q.greedy));
        let flags = original.flags;
        let copied = match original.kind.clone() {
            NodeKind::Group(g) => {
                let copy = self.alloc(NodeKind::Group(shallow_group(&g)))?;
                if let Some(n) = g.group_number {
                    self.register_capture_group(n, copy);
                }
                copy
            }
            NodeKind::ConditionalGroup(c) => {
                self.create_conditional_back_reference_group(c.referenced_group)?
            }
            NodeKind::Sequence(_) => self.create_sequence()?,
            NodeKind::CharacterClass(c) => self.alloc(NodeKind::CharacterClass(c))?,
            NodeKind::BackReference(b) => {
                self.create_back_reference(&b.group_numbers, b.ignore_case)?
            }
            NodeKind::PositionAssertion(p) => self.create_position_assertion(p.kind)?,
            NodeKind::LookAhead(la) => self.create_look_ahead(la.negated)?,
            NodeKind::LookBehind(la) => self.create_look_behind(la.negated)?,
            NodeKind::AtomicGroup(_) => self.create_atomic_group()?,
            NodeKind::SubexpressionCall(s) => self.create_subexpression_call(s.group_number)?,
            NodeKind::MatchFound(_) => self.create_match_found()?,
            NodeKind::Root(_) => self.alloc_subtree_root(NodeKind::Root)?,
        };
        let node = self.node_mut(copied);
        node.quantifier = quantifier;
        node.flags = flags;
        node.clear_analysis();
        Ok(copied)
    }

    /// Deep copy of a subtree with fresh handles throughout.
    pub fn copy_recursive(&mut self, id: NodeId) -> Result<NodeId> {
        let top = self.copy(id)?;
        let mut work = vec![(id, top)];
        while let Some((original, copy)) = work.pop() {
            for child in self.children(original) {
                let child_copy = self.copy(child)?;
                self.attach(copy, child_copy)?;
                work.push((child, child_copy));
            }
        }
        Ok(top)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        match self.node(parent).kind {
            NodeKind::Group(_) | NodeKind::ConditionalGroup(_) => self.add_alternative(parent, child),
            NodeKind::Sequence(_) => self.add_term(parent, child),
            _ => {
                self.set_body(parent, child);
                Ok(())
            }
        }
    }

    /// Structural equality of `a` in this AST and `b` in `other`, ignoring
    /// handles, ids, quantifier indices and analysis results.
    pub fn equals_semantic(&self, a: NodeId, other: &RegexAst, b: NodeId) -> bool {
        let mut work = vec![(a, b)];
        while let Some((a, b)) = work.pop() {
            let (x, y) = (self.node(a), other.node(b));
            let quantifiers_match = match (&x.quantifier, &y.quantifier) {
                (None, None) => true,
                (Some(p), Some(q)) => p.equals_semantic(q),
                _ => false,
            };
            if !quantifiers_match || !payload_equal(&x.kind, &y.kind) {
                return false;
            }
            let (xs, ys) = (self.children(a), other.children(b));
            if xs.len() != ys.len() {
                return false;
            }
            work.extend(xs.into_iter().zip(ys));
        }
        true
    }
}

fn shallow_group(g: &Group) -> Group {
    Group {
        alternatives: Vec::new(),
        group_number: g.group_number,
        is_loop: g.is_loop,
        enclosed_capture_groups_low: 0,
        enclosed_capture_groups_high: 0,
        expanded_quantifier: g.expanded_quantifier,
        expanded_quantifier_empty_guard: g.expanded_quantifier_empty_guard,
    }
}

fn payload_equal(x: &NodeKind, y: &NodeKind) -> bool {
    match (x, y) {
        (NodeKind::Group(a), NodeKind::Group(b)) => a.group_number == b.group_number,
        (NodeKind::ConditionalGroup(a), NodeKind::ConditionalGroup(b)) => {
            a.referenced_group == b.referenced_group
        }
        (NodeKind::Sequence(_), NodeKind::Sequence(_)) => true,
        (NodeKind::CharacterClass(a), NodeKind::CharacterClass(b)) => a.set == b.set,
        (NodeKind::BackReference(a), NodeKind::BackReference(b)) => {
            a.group_numbers == b.group_numbers && a.ignore_case == b.ignore_case
        }
        (NodeKind::PositionAssertion(a), NodeKind::PositionAssertion(b)) => a.kind == b.kind,
        (NodeKind::LookAhead(a), NodeKind::LookAhead(b))
        | (NodeKind::LookBehind(a), NodeKind::LookBehind(b)) => a.negated == b.negated,
        (NodeKind::SubexpressionCall(a), NodeKind::SubexpressionCall(b)) => {
            a.group_number == b.group_number
        }
        (NodeKind::AtomicGroup(_), NodeKind::AtomicGroup(_))
        | (NodeKind::MatchFound(_), NodeKind::MatchFound(_))
        | (NodeKind::Root(_), NodeKind::Root(_)) => true,
        _ => false,
    }
}
