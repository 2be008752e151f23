//! Forward sweep: path bounds, dead marking, anchor domination, flag
//! propagation, quantifier indexing and prefix lengths.
//!
//! Every subtree root is walked in its own direction. The root, look-ahead
//! and atomic-group bodies are walked forward; look-behind bodies are walked
//! last-term-first, with paths counted from the assertion backwards.

use regast_core::CompactBitSet;
use tracing::trace;

use super::literal_length;
use crate::ast::RegexAst;
use crate::flags::{Flag, NodeFlags};
use crate::invariants;
use crate::nodes::{NodeId, NodeKind, PositionKind};

/// Path bounds in consumed characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    min: u32,
    max: u32,
}

impl Span {
    const ZERO: Span = Span { min: 0, max: 0 };

    fn of(ast: &RegexAst, id: NodeId) -> Span {
        let node = ast.node(id);
        Span {
            min: node.min_path,
            max: node.max_path,
        }
    }

    fn advance(self, min: u32, max: u32) -> Span {
        Span {
            min: self.min.saturating_add(min),
            max: self.max.saturating_add(max),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

/// Where conditional groups and their condition groups occur.
#[derive(Debug, Default)]
pub(crate) struct ConditionSites {
    /// `(group number, capture group)` for every condition group owner.
    pub(crate) definitions: Vec<(u32, NodeId)>,
    /// `(referenced group, conditional group)`.
    pub(crate) references: Vec<(u32, NodeId)>,
}

/// What entering a node needs to know before mutating it.
#[derive(Clone, Copy)]
enum Step {
    Group,
    Sequence,
    CharacterClass { empty: bool },
    BackReference,
    Position(PositionKind),
    SubexpressionCall,
    MatchFound,
    LookAhead,
    LookBehind,
    Subtree,
}

impl Step {
    fn of(kind: &NodeKind) -> Step {
        match kind {
            NodeKind::Group(_) | NodeKind::ConditionalGroup(_) => Step::Group,
            NodeKind::Sequence(_) => Step::Sequence,
            NodeKind::CharacterClass(class) => Step::CharacterClass {
                empty: class.set.is_empty(),
            },
            NodeKind::BackReference(_) => Step::BackReference,
            NodeKind::PositionAssertion(assertion) => Step::Position(assertion.kind),
            NodeKind::SubexpressionCall(_) => Step::SubexpressionCall,
            NodeKind::MatchFound(_) => Step::MatchFound,
            NodeKind::LookAhead(_) => Step::LookAhead,
            NodeKind::LookBehind(_) => Step::LookBehind,
            NodeKind::AtomicGroup(_) | NodeKind::Root(_) => Step::Subtree,
        }
    }
}

/// Pending work for the sweep. Children are pushed above their parent's
/// leave task, so a parent always finishes after its whole subtree.
enum Task {
    Enter {
        id: NodeId,
        entry: Span,
        dir: Direction,
    },
    /// Sequence terms are entered one at a time: each term starts where the
    /// previous one ended.
    Sequence {
        id: NodeId,
        entry: Span,
        dir: Direction,
        terms: Vec<NodeId>,
        next: usize,
    },
    Leave {
        id: NodeId,
        entry: Span,
        dir: Direction,
        leave: Leave,
    },
}

#[derive(Clone, Copy)]
enum Leave {
    Group { outer_captures: Option<(u32, u32)> },
    LookAhead,
    LookBehind,
    Subtree,
}

struct Walker<'a> {
    ast: &'a mut RegexAst,
    tasks: Vec<Task>,
    open_groups: CompactBitSet,
    closed_groups: CompactBitSet,
    /// Capture numbers seen below the current group, as `(low, high)`.
    captures_seen: Option<(u32, u32)>,
    sites: ConditionSites,
}

pub(crate) fn run(ast: &mut RegexAst) -> ConditionSites {
    let root_node = ast.root_node;
    let mut walker = Walker {
        ast,
        tasks: vec![Task::Enter {
            id: root_node,
            entry: Span::ZERO,
            dir: Direction::Forward,
        }],
        open_groups: CompactBitSet::new(),
        closed_groups: CompactBitSet::new(),
        captures_seen: None,
        sites: ConditionSites::default(),
    };
    while let Some(task) = walker.tasks.pop() {
        match task {
            Task::Enter { id, entry, dir } => walker.enter(id, entry, dir),
            Task::Sequence {
                id,
                entry,
                dir,
                terms,
                next,
            } => walker.step_sequence(id, entry, dir, terms, next),
            Task::Leave {
                id,
                entry,
                dir,
                leave,
            } => {
                let end = match leave {
                    Leave::Group { outer_captures } => walker.leave_group(id, entry, outer_captures),
                    Leave::LookAhead => walker.leave_look_ahead(id, entry),
                    Leave::LookBehind => walker.leave_look_behind(id, entry, dir),
                    Leave::Subtree => walker.leave_subtree(id),
                };
                walker.finish(id, entry, end);
            }
        }
    }
    walker.sites
}

impl Walker<'_> {
    fn enter(&mut self, id: NodeId, entry: Span, dir: Direction) {
        self.index_quantifier(id);
        let step = Step::of(&self.ast.node(id).kind);
        let end = match step {
            Step::Group => {
                self.enter_group(id, entry, dir);
                return;
            }
            Step::Sequence => {
                let mut terms = self.ast.sequence(id).terms().to_vec();
                if dir == Direction::Reverse {
                    terms.reverse();
                }
                self.tasks.push(Task::Sequence {
                    id,
                    entry,
                    dir,
                    terms,
                    next: 0,
                });
                return;
            }
            Step::LookAhead => {
                self.descend(id, entry, dir, Leave::LookAhead, entry, Direction::Forward);
                return;
            }
            Step::LookBehind => {
                self.descend(id, entry, dir, Leave::LookBehind, Span::ZERO, Direction::Reverse);
                return;
            }
            Step::Subtree => {
                self.descend(id, entry, dir, Leave::Subtree, entry, dir);
                return;
            }
            Step::CharacterClass { empty } => {
                if empty {
                    self.mark_dead(id);
                }
                entry.advance(1, 1)
            }
            Step::BackReference => self.visit_back_reference(id, entry),
            Step::Position(kind) => self.visit_position_assertion(id, kind, entry, dir),
            Step::SubexpressionCall => entry.advance(0, 1),
            Step::MatchFound => entry,
        };
        self.finish(id, entry, end);
    }

    /// Schedule a subtree root's body, then its leave step.
    fn descend(
        &mut self,
        id: NodeId,
        entry: Span,
        dir: Direction,
        leave: Leave,
        body_entry: Span,
        body_dir: Direction,
    ) {
        let body = self.body_of(id);
        self.tasks.push(Task::Leave {
            id,
            entry,
            dir,
            leave,
        });
        self.tasks.push(Task::Enter {
            id: body,
            entry: body_entry,
            dir: body_dir,
        });
    }

    fn index_quantifier(&mut self, id: NodeId) {
        let next = self.ast.quantifiers.len() as u32;
        let node = self.ast.node_mut(id);
        let Some(quantifier) = node.quantifier.as_mut() else {
            return;
        };
        if quantifier.index.is_some() {
            return;
        }
        quantifier.index = Some(next);
        let registered = *quantifier;
        self.ast.quantifiers.push(registered);
        trace!(node = ?id, index = next, "quantifier indexed");
    }

    fn mark_dead(&mut self, id: NodeId) {
        trace!(node = ?id, kind = self.ast.node(id).kind.name(), "dead");
        self.ast.node_mut(id).set_dead(true);
    }

    /// Apply the quantifier to one occurrence's bounds and record the result.
    fn finish(&mut self, id: NodeId, entry: Span, end: Span) {
        let contribution = Span {
            min: end.min.saturating_sub(entry.min),
            max: end.max.saturating_sub(entry.max),
        };
        let Some(quantifier) = self.ast.node(id).quantifier else {
            let node = self.ast.node_mut(id);
            node.min_path = end.min;
            node.max_path = end.max;
            node.set_always_empty(!node.is_dead() && contribution == Span::ZERO);
            return;
        };

        let node = self.ast.node_mut(id);
        node.set_has_quantifiers(true);
        let iterations = quantifier.max.unwrap_or(quantifier.min.max(1));
        let min = entry
            .min
            .saturating_add(contribution.min.saturating_mul(quantifier.min));
        let max = entry
            .max
            .saturating_add(contribution.max.saturating_mul(iterations))
            .max(min);
        let zero_width = contribution.min == 0;
        node.min_path = min;
        node.max_path = max;
        node.set_always_empty(!node.is_dead() && min == entry.min && max == entry.max);
        if quantifier.min == 0 {
            node.set_starts_with_caret(false);
            node.set_ends_with_dollar(false);
        }
        if quantifier.is_infinite() {
            node.set_has_loops(true);
            if let Some(group) = node.kind.as_group_mut() {
                group.is_loop = true;
            }
        }
        if zero_width && !node.is_dead() {
            self.register_zero_width(id);
        }
    }

    fn register_zero_width(&mut self, id: NodeId) {
        let next = self.ast.zero_width_quantifiables.len() as u32;
        let node = self.ast.node_mut(id);
        let Some(quantifier) = node.quantifier.as_mut() else {
            return;
        };
        if quantifier.zero_width_index.is_some() {
            return;
        }
        quantifier.zero_width_index = Some(next);
        let index = quantifier.index;
        self.ast.zero_width_quantifiables.push(id);
        if let Some(registered) = index.and_then(|i| self.ast.quantifiers.get_mut(i as usize)) {
            registered.zero_width_index = Some(next);
        }
        trace!(node = ?id, index = next, "zero-width quantifiable");
    }

    /// Enter the next term of a sequence, or finish it once every term is done.
    fn step_sequence(
        &mut self,
        id: NodeId,
        entry: Span,
        dir: Direction,
        terms: Vec<NodeId>,
        next: usize,
    ) {
        let Some(&term) = terms.get(next) else {
            let end = self.leave_sequence(id, entry, dir, &terms);
            self.finish(id, entry, end);
            return;
        };
        let term_entry = match next.checked_sub(1) {
            Some(previous) => Span::of(self.ast, terms[previous]),
            None => entry,
        };
        self.tasks.push(Task::Sequence {
            id,
            entry,
            dir,
            terms,
            next: next + 1,
        });
        self.tasks.push(Task::Enter {
            id: term,
            entry: term_entry,
            dir,
        });
    }

    fn leave_sequence(&mut self, id: NodeId, entry: Span, dir: Direction, terms: &[NodeId]) -> Span {
        let mut current = entry;
        let mut dead = false;
        let mut inherited = NodeFlags::EMPTY;
        let mut leading_anchor = false;
        let mut prefix = (0u32, 0u32);
        for &term in terms {
            let before = current;
            current = Span::of(self.ast, term);
            let node = self.ast.node(term);
            dead |= node.is_dead();
            inherited = inherited.union(node.flags);
            let leads = match dir {
                Direction::Forward => node.starts_with_caret(),
                Direction::Reverse => node.ends_with_dollar(),
            };
            leading_anchor |= leads && before.max == 0;
            prefix.0 = prefix.0.max(node.prefix_length_min);
            prefix.1 = prefix.1.max(node.prefix_length_max);
        }
        // Trailing anchors need the final bound, so they take a second look.
        let trailing_anchor = terms.iter().any(|&term| {
            let node = self.ast.node(term);
            let trails = match dir {
                Direction::Forward => node.ends_with_dollar(),
                Direction::Reverse => node.starts_with_caret(),
            };
            trails && node.max_path == current.max
        });

        let node = self.ast.node_mut(id);
        node.inherit(inherited);
        let (starts, ends) = match dir {
            Direction::Forward => (leading_anchor, trailing_anchor),
            Direction::Reverse => (trailing_anchor, leading_anchor),
        };
        node.set_starts_with_caret(starts);
        node.set_ends_with_dollar(ends);
        node.set_prefix_length(prefix.0, prefix.1);
        if dead {
            self.mark_dead(id);
        }
        current
    }

    fn enter_group(&mut self, id: NodeId, entry: Span, dir: Direction) {
        let (alternatives, group_number, conditional) = {
            let node = self.ast.node(id);
            let group = invariants::expect_kind(node.kind.as_group(), id, "group");
            let conditional = match &node.kind {
                NodeKind::ConditionalGroup(c) => Some(c.referenced_group),
                _ => None,
            };
            (group.alternatives.clone(), group.group_number, conditional)
        };

        if let Some(referenced) = conditional {
            invariants::assert_conditional_complete(id, alternatives.len());
            self.sites.references.push((referenced, id));
        }
        if let Some(n) = group_number {
            if self.ast.condition_groups.contains(n) {
                self.sites.definitions.push((n, id));
            }
            self.open_groups.insert(n);
        }
        let outer_captures = self.captures_seen.take();

        self.tasks.push(Task::Leave {
            id,
            entry,
            dir,
            leave: Leave::Group { outer_captures },
        });
        for &alternative in alternatives.iter().rev() {
            self.tasks.push(Task::Enter {
                id: alternative,
                entry,
                dir,
            });
        }
    }

    fn leave_group(&mut self, id: NodeId, entry: Span, outer_captures: Option<(u32, u32)>) -> Span {
        let (alternatives, group_number) = {
            let group = invariants::expect_kind(self.ast.node(id).kind.as_group(), id, "group");
            (group.alternatives.clone(), group.group_number)
        };

        let mut bounds: Option<Span> = None;
        let mut inherited = NodeFlags::EMPTY;
        let mut anchors = NodeFlags::ANCHORS;
        let mut prefix: Option<(u32, u32)> = None;
        let mut live = 0usize;
        for &alternative in &alternatives {
            let node = self.ast.node(alternative);
            if node.is_dead() {
                continue;
            }
            live += 1;
            let span = Span::of(self.ast, alternative);
            bounds = Some(match bounds {
                None => span,
                Some(b) => Span {
                    min: b.min.min(span.min),
                    max: b.max.max(span.max),
                },
            });
            inherited = inherited.union(node.flags);
            anchors = anchors.intersection(node.flags);
            prefix = Some(match prefix {
                None => (node.prefix_length_min, node.prefix_length_max),
                Some((lo, hi)) => (lo.min(node.prefix_length_min), hi.max(node.prefix_length_max)),
            });
        }

        let inner_captures = self.captures_seen.take();
        let enclosed = match (inner_captures, group_number) {
            (Some((low, high)), _) => (low, high + 1),
            (None, Some(n)) => (n + 1, n + 1),
            (None, None) => (0, 0),
        };
        self.captures_seen = merge_captures(outer_captures, inner_captures);
        if let Some(n) = group_number {
            self.captures_seen = merge_captures(self.captures_seen, Some((n, n)));
            self.open_groups.remove(n);
            self.closed_groups.insert(n);
        }

        let node = self.ast.node_mut(id);
        node.inherit(inherited);
        if live > 0 {
            node.flags = node.flags.union(anchors);
        }
        if live > 1 {
            node.set_has_alternations(true);
        }
        if group_number.is_some() {
            node.set_has_capture_groups(true);
        }
        let (prefix_min, prefix_max) = prefix.unwrap_or((0, 0));
        node.set_prefix_length(prefix_min, prefix_max);
        if let Some(group) = node.kind.as_group_mut() {
            group.enclosed_capture_groups_low = enclosed.0;
            group.enclosed_capture_groups_high = enclosed.1;
        }
        match bounds {
            Some(span) => span,
            None => {
                self.mark_dead(id);
                entry
            }
        }
    }

    fn visit_back_reference(&mut self, id: NodeId, entry: Span) -> Span {
        let groups = self.ast.node(id).kind.as_back_reference().map(|b| b.group_numbers.clone());
        let groups = groups.unwrap_or_default();
        let nested = !groups.is_empty() && groups.iter().all(|&n| self.open_groups.contains(n));
        let forward = !nested && groups.iter().all(|&n| !self.closed_groups.contains(n));

        let node = self.ast.node_mut(id);
        node.set_has_back_references(true);
        if let NodeKind::BackReference(b) = &mut node.kind {
            b.nested = nested;
            b.forward = forward;
        }
        if nested {
            entry
        } else {
            entry.advance(0, 1)
        }
    }

    fn visit_position_assertion(
        &mut self,
        id: NodeId,
        kind: PositionKind,
        entry: Span,
        dir: Direction,
    ) -> Span {
        let node = self.ast.node_mut(id);
        match kind {
            PositionKind::Caret => {
                node.set_has_caret(true);
                node.set_starts_with_caret(true);
                if dir == Direction::Forward && entry.min > 0 {
                    self.mark_dead(id);
                }
            }
            PositionKind::Dollar => {
                node.set_has_dollar(true);
                node.set_ends_with_dollar(true);
                if dir == Direction::Reverse && entry.min > 0 {
                    self.mark_dead(id);
                }
            }
            PositionKind::MatchBegin | PositionKind::MatchEnd => {}
        }
        entry
    }

    fn body_of(&self, id: NodeId) -> NodeId {
        let root = invariants::expect_kind(self.ast.node(id).kind.as_subtree_root(), id, "subtree root");
        invariants::ensure_body(root.body, id)
    }

    /// Root and atomic group: the body is inlined in the enclosing path.
    fn leave_subtree(&mut self, id: NodeId) -> Span {
        let body = self.body_of(id);
        let body_node = self.ast.node(body);
        let flags = body_node.flags;
        let dead = body_node.is_dead();
        let prefix = (body_node.prefix_length_min, body_node.prefix_length_max);

        let node = self.ast.node_mut(id);
        node.inherit(flags);
        node.flags = node.flags.union(flags.intersection(NodeFlags::ANCHORS));
        node.set_prefix_length(prefix.0, prefix.1);
        if matches!(node.kind, NodeKind::AtomicGroup(_)) {
            node.set_has_atomic_groups(true);
        }
        if dead {
            self.mark_dead(id);
        }
        Span::of(self.ast, body)
    }

    fn leave_look_ahead(&mut self, id: NodeId, entry: Span) -> Span {
        let body = self.body_of(id);
        let negated = self.is_negated(id);
        let body_node = self.ast.node(body);
        let mut flags = body_node.flags;
        let dead = body_node.is_dead();
        let consumes = body_node.max_path != entry.max;
        let prefix = (body_node.prefix_length_min, body_node.prefix_length_max);

        if negated {
            flags = flags.without(NodeFlags::single(Flag::HasAlternations));
        }
        let node = self.ast.node_mut(id);
        node.inherit(flags);
        node.set_has_look_aheads(true);
        node.set_prefix_length(prefix.0, prefix.1);
        if !negated {
            node.set_starts_with_caret(flags.contains(Flag::StartsWithCaret));
            // A dollar only ends the enclosing match if nothing was consumed before it.
            node.set_ends_with_dollar(flags.contains(Flag::EndsWithDollar) && !consumes);
            if dead {
                self.mark_dead(id);
            }
        }
        entry
    }

    fn leave_look_behind(&mut self, id: NodeId, entry: Span, dir: Direction) -> Span {
        let body = self.body_of(id);
        let negated = self.is_negated(id);
        let literal = literal_length(self.ast, body);
        let body_node = self.ast.node(body);
        let mut flags = body_node.flags;
        let dead = body_node.is_dead();

        if negated {
            flags = flags.without(NodeFlags::single(Flag::HasAlternations));
        }
        let node = self.ast.node_mut(id);
        node.inherit(flags);
        node.set_has_look_behinds(true);
        if dir == Direction::Forward
            && let Some(length) = literal
        {
            node.set_prefix_length(
                length.saturating_sub(entry.max),
                length.saturating_sub(entry.min),
            );
        }
        if dead && !negated {
            self.mark_dead(id);
        }
        entry
    }

    fn is_negated(&self, id: NodeId) -> bool {
        self.ast
            .node(id)
            .kind
            .as_look_around()
            .is_some_and(|la| la.negated)
    }
}

fn merge_captures(a: Option<(u32, u32)>, b: Option<(u32, u32)>) -> Option<(u32, u32)> {
    match (a, b) {
        (Some((lo1, hi1)), Some((lo2, hi2))) => Some((lo1.min(lo2), hi1.max(hi2))),
        (x, None) | (None, x) => x,
    }
}
