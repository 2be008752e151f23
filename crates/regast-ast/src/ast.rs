//! The AST container.
//!
//! `RegexAst` owns the node arena and every registry the analysis and the
//! automaton builder read: capture-group owners, quantifiers, zero-width
//! quantifiables, referenced/condition group bitsets and the interned
//! boundary descriptors. Nodes are created only through the factories here,
//! which enforce `AstLimits`.

use std::sync::Arc;

use regast_core::{CodePointSet, CompactBitSet};
use tracing::{debug, trace, warn};

use crate::boundaries::{BoundariesTable, GroupBoundaries};
use crate::invariants;
use crate::nodes::{
    BackReference, CharacterClass, ConditionalGroup, Group, LookAround, MatchFound, Node, NodeId,
    NodeKind, PositionAssertion, PositionKind, Quantifier, Sequence, SubexpressionCall,
    SubtreeRoot,
};
use crate::options::{AstOptions, RegexFlags};
use crate::properties::{DfaFailureReason, RegexProperties};
use crate::{Error, Limit, Result};

/// Nodes allocated per subtree root: the root itself plus four sentinels.
const SUBTREE_ROOT_NODES: usize = 5;

/// Synthetic entry points, one pair per prefix offset.
#[derive(Clone, Debug, Default)]
pub(crate) struct InitialStates {
    pub(crate) anchored: Vec<NodeId>,
    pub(crate) unanchored: Vec<NodeId>,
}

#[derive(Debug)]
pub struct RegexAst {
    pub(crate) nodes: Vec<Node>,
    pub(crate) options: AstOptions,
    /// Synthetic `Root` subtree root; its body is the effective root.
    pub(crate) root_node: NodeId,
    pub(crate) root: Option<NodeId>,
    pub(crate) wrapped_root: Option<NodeId>,
    pub(crate) prefix_hidden: bool,
    pub(crate) wrapped_prefix_length: u32,
    /// Owners per capture-group number. Unrolled quantifiers add owners.
    pub(crate) capture_groups: Vec<Vec<NodeId>>,
    pub(crate) quantifiers: Vec<Quantifier>,
    pub(crate) zero_width_quantifiables: Vec<NodeId>,
    pub(crate) referenced_groups: CompactBitSet,
    pub(crate) condition_groups: CompactBitSet,
    pub(crate) boundaries: BoundariesTable,
    pub(crate) properties: RegexProperties,
    pub(crate) nodes_by_id: Vec<NodeId>,
    pub(crate) initial_states: Option<InitialStates>,
    pub(crate) properties_calculated: bool,
}

impl RegexAst {
    pub fn new(options: AstOptions) -> Self {
        let mut ast = Self {
            nodes: Vec::new(),
            options,
            root_node: NodeId::from_index(0),
            root: None,
            wrapped_root: None,
            prefix_hidden: false,
            wrapped_prefix_length: 0,
            capture_groups: Vec::new(),
            quantifiers: Vec::new(),
            zero_width_quantifiables: Vec::new(),
            referenced_groups: CompactBitSet::new(),
            condition_groups: CompactBitSet::new(),
            boundaries: BoundariesTable::default(),
            properties: RegexProperties::default(),
            nodes_by_id: Vec::new(),
            initial_states: None,
            properties_calculated: false,
        };
        ast.root_node = ast.push_subtree_root(NodeKind::Root);
        ast
    }

    #[inline]
    pub fn options(&self) -> &AstOptions {
        &self.options
    }

    #[inline]
    pub fn flags(&self) -> RegexFlags {
        self.options.flags
    }

    #[inline]
    pub fn properties(&self) -> &RegexProperties {
        &self.properties
    }

    #[inline]
    pub fn is_properties_calculated(&self) -> bool {
        self.properties_calculated
    }

    /// Nodes in the arena, numbered or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn group(&self, id: NodeId) -> &Group {
        invariants::expect_kind(self.node(id).kind.as_group(), id, "group")
    }

    pub fn group_mut(&mut self, id: NodeId) -> &mut Group {
        invariants::expect_kind_mut(self.nodes[id.index()].kind.as_group_mut(), id, "group")
    }

    pub fn sequence(&self, id: NodeId) -> &Sequence {
        invariants::expect_kind(self.node(id).kind.as_sequence(), id, "sequence")
    }

    fn sequence_mut(&mut self, id: NodeId) -> &mut Sequence {
        let found = match &mut self.nodes[id.index()].kind {
            NodeKind::Sequence(s) => Some(s),
            _ => None,
        };
        invariants::expect_kind_mut(found, id, "sequence")
    }

    pub fn subtree_root(&self, id: NodeId) -> &SubtreeRoot {
        invariants::expect_kind(self.node(id).kind.as_subtree_root(), id, "subtree root")
    }

    /// The synthetic `Root` subtree root.
    #[inline]
    pub fn root_node(&self) -> NodeId {
        self.root_node
    }

    /// The user-visible root group (capture group 0).
    pub fn root(&self) -> NodeId {
        invariants::ensure_root(self.root)
    }

    /// The synthesized prefix wrapper, if a prefix was created.
    #[inline]
    pub fn wrapped_root(&self) -> Option<NodeId> {
        self.wrapped_root
    }

    /// Numbering ids in use; zero until initial states are materialized.
    #[inline]
    pub fn number_of_nodes(&self) -> usize {
        self.nodes_by_id.len()
    }

    /// Look up a node by its numbering id.
    pub fn node_by_number(&self, id: u32) -> Option<NodeId> {
        self.nodes_by_id.get(id as usize).copied()
    }

    /// Registered capture-group numbers, including group 0.
    #[inline]
    pub fn number_of_capture_groups(&self) -> usize {
        self.capture_groups.len()
    }

    /// Groups owning capture-group number `n`. Several after unrolling.
    pub fn capture_group_owners(&self, n: u32) -> &[NodeId] {
        self.capture_groups
            .get(n as usize)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn quantifier(&self, index: u32) -> Option<&Quantifier> {
        self.quantifiers.get(index as usize)
    }

    /// Quantifiers indexed by the properties pass, in first-visit order.
    #[inline]
    pub fn quantifiers(&self) -> &[Quantifier] {
        &self.quantifiers
    }

    #[inline]
    pub fn zero_width_quantifiables(&self) -> &[NodeId] {
        &self.zero_width_quantifiables
    }

    /// Group numbers targeted by some back reference.
    #[inline]
    pub fn referenced_groups(&self) -> &CompactBitSet {
        &self.referenced_groups
    }

    pub fn is_group_referenced(&self, n: u32) -> bool {
        self.referenced_groups.contains(n)
    }

    /// Group numbers used as conditions of conditional groups.
    #[inline]
    pub fn condition_groups(&self) -> &CompactBitSet {
        &self.condition_groups
    }

    // Factories

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    fn ensure_room(&self, count: usize) -> Result<()> {
        let max = self.options.limits.max_nodes;
        if self.nodes.len() + count > max {
            return Err(too_large(Limit::Nodes, max as u64));
        }
        Ok(())
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind) -> Result<NodeId> {
        self.ensure_room(1)?;
        Ok(self.push(kind))
    }

    fn push_subtree_root(&mut self, make: fn(SubtreeRoot) -> NodeKind) -> NodeId {
        let anchored_initial = self.push(NodeKind::PositionAssertion(PositionAssertion {
            kind: PositionKind::MatchBegin,
            next: None,
        }));
        let unanchored_initial = self.push(NodeKind::MatchFound(MatchFound::default()));
        let anchored_final = self.push(NodeKind::PositionAssertion(PositionAssertion {
            kind: PositionKind::MatchEnd,
            next: None,
        }));
        let match_found = self.push(NodeKind::MatchFound(MatchFound::default()));
        let root = SubtreeRoot {
            body: None,
            anchored_initial,
            unanchored_initial,
            anchored_final,
            match_found,
        };
        let sentinels = root.sentinels();
        let id = self.push(make(root));
        for sentinel in sentinels {
            self.nodes[sentinel.index()].parent = Some(id);
        }
        id
    }

    pub(crate) fn alloc_subtree_root(&mut self, make: fn(SubtreeRoot) -> NodeKind) -> Result<NodeId> {
        self.ensure_room(SUBTREE_ROOT_NODES)?;
        Ok(self.push_subtree_root(make))
    }

    pub fn create_group(&mut self) -> Result<NodeId> {
        self.alloc(NodeKind::Group(Group::default()))
    }

    /// Create a capture group and register it as an owner of `n`.
    pub fn create_capture_group(&mut self, n: u32) -> Result<NodeId> {
        self.check_capture_group_number(n)?;
        let id = self.alloc(NodeKind::Group(Group {
            group_number: Some(n),
            ..Group::default()
        }))?;
        self.register_capture_group(n, id);
        Ok(id)
    }

    fn check_capture_group_number(&self, n: u32) -> Result<()> {
        let max = self.options.limits.max_capture_groups;
        if n >= max {
            return Err(too_large(Limit::CaptureGroups, u64::from(max)));
        }
        Ok(())
    }

    pub(crate) fn register_capture_group(&mut self, n: u32, owner: NodeId) {
        invariants::assert_capture_group_registered(n, self.capture_groups.len());
        if n as usize == self.capture_groups.len() {
            self.capture_groups.push(Vec::new());
        }
        self.capture_groups[n as usize].push(owner);
    }

    /// Conditional group testing whether group `referenced` matched.
    pub fn create_conditional_back_reference_group(&mut self, referenced: u32) -> Result<NodeId> {
        self.alloc(NodeKind::ConditionalGroup(ConditionalGroup {
            group: Group::default(),
            referenced_group: referenced,
        }))
    }

    pub fn create_sequence(&mut self) -> Result<NodeId> {
        self.alloc(NodeKind::Sequence(Sequence::default()))
    }

    pub fn create_character_class(&mut self, set: CodePointSet) -> Result<NodeId> {
        self.alloc(NodeKind::CharacterClass(CharacterClass {
            set,
            was_single_char: false,
        }))
    }

    /// A class written as one literal character.
    pub fn create_character_class_from_char(&mut self, c: char) -> Result<NodeId> {
        self.alloc(NodeKind::CharacterClass(CharacterClass {
            set: CodePointSet::single(c as u32),
            was_single_char: true,
        }))
    }

    pub fn create_back_reference(&mut self, groups: &[u32], ignore_case: bool) -> Result<NodeId> {
        let id = self.alloc(NodeKind::BackReference(BackReference {
            group_numbers: groups.to_vec(),
            ignore_case,
            nested: false,
            forward: false,
        }))?;
        for &n in groups {
            self.referenced_groups.insert(n);
        }
        Ok(id)
    }

    pub fn create_position_assertion(&mut self, kind: PositionKind) -> Result<NodeId> {
        self.alloc(NodeKind::PositionAssertion(PositionAssertion { kind, next: None }))
    }

    pub fn create_look_ahead(&mut self, negated: bool) -> Result<NodeId> {
        let id = self.alloc_subtree_root(|root| {
            NodeKind::LookAhead(LookAround {
                root,
                negated: false,
            })
        })?;
        self.set_negated(id, negated);
        Ok(id)
    }

    pub fn create_look_behind(&mut self, negated: bool) -> Result<NodeId> {
        let id = self.alloc_subtree_root(|root| {
            NodeKind::LookBehind(LookAround {
                root,
                negated: false,
            })
        })?;
        self.set_negated(id, negated);
        Ok(id)
    }

    fn set_negated(&mut self, id: NodeId, negated: bool) {
        if let NodeKind::LookAhead(la) | NodeKind::LookBehind(la) = &mut self.nodes[id.index()].kind
        {
            la.negated = negated;
        }
    }

    pub fn create_atomic_group(&mut self) -> Result<NodeId> {
        self.alloc_subtree_root(NodeKind::AtomicGroup)
    }

    /// Placeholder for a call to group `n`, expanded later by the producer.
    pub fn create_subexpression_call(&mut self, n: u32) -> Result<NodeId> {
        self.alloc(NodeKind::SubexpressionCall(SubexpressionCall { group_number: n }))
    }

    pub fn create_match_found(&mut self) -> Result<NodeId> {
        self.alloc(NodeKind::MatchFound(MatchFound::default()))
    }

    /// Validate bounds and build a quantifier. Inverted bounds are a
    /// producer bug and panic.
    pub fn create_quantifier(&self, min: u32, max: Option<u32>, greedy: bool) -> Result<Quantifier> {
        let bound = self.options.limits.max_quantifier_bound;
        if min > bound || max.is_some_and(|max| max > bound) {
            return Err(too_large(Limit::QuantifierBound, u64::from(bound)));
        }
        invariants::assert_quantifier_ordered(min, max);
        Ok(Quantifier::new(min, max, greedy))
    }

    /// Interned boundary descriptor. Content-equal requests share one `Arc`;
    /// the scratch bitsets are copied only on a miss.
    pub fn create_group_boundaries(
        &mut self,
        update: &CompactBitSet,
        clear: &CompactBitSet,
        first_group: Option<u32>,
        last_group: Option<u32>,
    ) -> Arc<GroupBoundaries> {
        self.boundaries.intern(update, clear, first_group, last_group)
    }

    /// Distinct non-empty descriptors interned so far.
    pub fn number_of_group_boundaries(&self) -> usize {
        self.boundaries.len()
    }

    // Mutators

    /// Install `group` as the root group and the root node's body.
    pub fn set_root(&mut self, group: NodeId) {
        self.root = Some(group);
        self.set_body(self.root_node, group);
    }

    /// Replace the body of a subtree root and re-wire its sentinels.
    pub fn set_body(&mut self, subtree_root: NodeId, body: NodeId) {
        let root = invariants::expect_kind_mut(
            self.nodes[subtree_root.index()].kind.as_subtree_root_mut(),
            subtree_root,
            "subtree root",
        );
        root.body = Some(body);
        let sentinels = root.sentinels();
        for sentinel in sentinels {
            match &mut self.nodes[sentinel.index()].kind {
                NodeKind::PositionAssertion(p) => p.next = Some(body),
                NodeKind::MatchFound(m) => m.next = Some(body),
                _ => {}
            }
        }
        self.nodes[body.index()].parent = Some(subtree_root);
    }

    /// Create a sequence and append it as the last alternative of `group`.
    pub fn add_sequence(&mut self, group: NodeId) -> Result<NodeId> {
        let seq = self.create_sequence()?;
        self.add_alternative(group, seq)?;
        Ok(seq)
    }

    pub fn add_alternative(&mut self, group: NodeId, seq: NodeId) -> Result<()> {
        let max = self.options.limits.max_alternatives;
        let is_conditional = matches!(self.node(group).kind, NodeKind::ConditionalGroup(_));
        let g = self.group_mut(group);
        if is_conditional {
            invariants::assert_conditional_room(g.alternatives.len());
        }
        if g.alternatives.len() >= max {
            return Err(too_large(Limit::Alternatives, max as u64));
        }
        g.alternatives.push(seq);
        self.nodes[seq.index()].parent = Some(group);
        Ok(())
    }

    pub fn add_term(&mut self, seq: NodeId, term: NodeId) -> Result<()> {
        invariants::assert_term(&self.node(term).kind);
        let max = self.options.limits.max_terms_per_sequence;
        let s = self.sequence_mut(seq);
        if s.terms.len() >= max {
            return Err(too_large(Limit::TermsPerSequence, max as u64));
        }
        s.terms.push(term);
        self.nodes[term.index()].parent = Some(seq);
        Ok(())
    }

    pub fn set_quantifier(&mut self, term: NodeId, quantifier: Quantifier) {
        let node = self.node_mut(term);
        invariants::assert_quantifiable(&node.kind);
        node.quantifier = Some(quantifier);
    }

    /// Detach and return the last term of `seq`.
    pub fn remove_last_term(&mut self, seq: NodeId) -> Option<NodeId> {
        let term = self.sequence_mut(seq).terms.pop()?;
        self.nodes[term.index()].parent = None;
        Some(term)
    }

    /// Replace `term` in its sequence by a non-capturing group holding it.
    /// The quantifier moves to the new group.
    pub fn wrap_in_group(&mut self, term: NodeId) -> Result<NodeId> {
        let group = self.create_group()?;
        let seq = self.add_sequence(group)?;
        let parent = self.node(term).parent;
        if let Some(parent) = parent
            && let NodeKind::Sequence(s) = &mut self.nodes[parent.index()].kind
            && let Some(slot) = s.terms.iter_mut().find(|t| **t == term)
        {
            *slot = group;
            self.nodes[group.index()].parent = Some(parent);
        }
        let quantifier = self.nodes[term.index()].quantifier.take();
        self.nodes[group.index()].quantifier = quantifier;
        self.sequence_mut(seq).terms.push(term);
        self.nodes[term.index()].parent = Some(seq);
        Ok(group)
    }

    pub fn set_loop(&mut self, group: NodeId, value: bool) {
        self.group_mut(group).set_loop(value);
    }

    // Predicates

    /// Root matches exactly one fixed string, optionally anchored.
    pub fn is_literal_string(&self) -> bool {
        invariants::assert_properties_calculated(self.properties_calculated);
        let root = self.root();
        let node = self.node(root);
        if node.is_dead() || node.has_quantifier() {
            return false;
        }
        let [alternative] = self.group(root).alternatives() else {
            return false;
        };
        if self.node(*alternative).is_dead() {
            return false;
        }
        let terms = self.sequence(*alternative).terms();
        let last = terms.len().saturating_sub(1);
        terms.iter().enumerate().all(|(i, &term)| {
            let node = self.node(term);
            if node.has_quantifier() {
                return false;
            }
            match &node.kind {
                NodeKind::CharacterClass(c) => c.was_single_char || c.set.is_single(),
                NodeKind::PositionAssertion(p) => match p.kind {
                    PositionKind::Caret => i == 0,
                    PositionKind::Dollar => i == last,
                    _ => false,
                },
                _ => false,
            }
        })
    }

    pub fn can_transform_to_dfa(&self) -> bool {
        self.dfa_failure_reasons().is_empty()
    }

    /// Every reason the DFA pipeline must refuse this pattern.
    pub fn dfa_failure_reasons(&self) -> Vec<DfaFailureReason> {
        invariants::assert_properties_calculated(self.properties_calculated);
        let p = &self.properties;
        let checks = [
            (
                self.nodes.len() > self.options.limits.max_nodes_for_dfa,
                DfaFailureReason::TooManyNodes,
            ),
            (p.back_references, DfaFailureReason::BackReferences),
            (
                p.large_counted_repetitions,
                DfaFailureReason::LargeCountedRepetitions,
            ),
            (
                p.negative_look_ahead_assertions,
                DfaFailureReason::NegativeLookAheads,
            ),
            (
                p.complex_look_ahead_assertions,
                DfaFailureReason::ComplexLookAheads,
            ),
            (
                p.non_literal_look_behind_assertions,
                DfaFailureReason::NonLiteralLookBehinds,
            ),
            (
                p.negative_look_behind_assertions,
                DfaFailureReason::NegativeLookBehinds,
            ),
            (
                p.conditional_back_references,
                DfaFailureReason::ConditionalBackReferences,
            ),
            (
                p.conditional_references_into_look_aheads,
                DfaFailureReason::ConditionalReferencesIntoLookAheads,
            ),
            (p.atomic_groups, DfaFailureReason::AtomicGroups),
            (p.subexpression_calls, DfaFailureReason::SubexpressionCalls),
            (
                p.empty_capture_groups_in_loops,
                DfaFailureReason::EmptyCaptureGroupsInLoops,
            ),
        ];
        checks
            .into_iter()
            .filter_map(|(triggered, reason)| triggered.then_some(reason))
            .collect()
    }

    /// Live look-behind assertions reachable from the root, in pre-order.
    pub fn reachable_look_behinds(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.is_dead() {
                continue;
            }
            if matches!(node.kind, NodeKind::LookBehind(_)) {
                found.push(id);
            }
            stack.extend(self.children(id).into_iter().rev());
        }
        found
    }

    /// Syntactic children in order: alternatives, terms or a body.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.node(id).kind {
            NodeKind::Group(g) => g.alternatives.clone(),
            NodeKind::ConditionalGroup(c) => c.group.alternatives.clone(),
            NodeKind::Sequence(s) => s.terms.clone(),
            NodeKind::LookAhead(la) | NodeKind::LookBehind(la) => la.root.body.into_iter().collect(),
            NodeKind::AtomicGroup(r) | NodeKind::Root(r) => r.body.into_iter().collect(),
            NodeKind::CharacterClass(_)
            | NodeKind::BackReference(_)
            | NodeKind::PositionAssertion(_)
            | NodeKind::SubexpressionCall(_)
            | NodeKind::MatchFound(_) => Vec::new(),
        }
    }

    // Initial states

    /// Number every reachable node, then create the initial-state sentinels.
    /// Runs once; later calls are no-ops.
    pub fn materialize_initial_states(&mut self) {
        if self.initial_states.is_some() {
            return;
        }
        self.number_reachable(self.root_node);
        if let Some(wrapper) = self.wrapped_root {
            // Hidden prefix wrappers are still numbered so unhiding is safe.
            self.number_reachable(wrapper);
        }
        let wave1 = self.nodes_by_id.len();

        let offsets = if self.prefix_hidden {
            0
        } else {
            self.wrapped_prefix_length
        };
        let mut states = InitialStates::default();
        for offset in 0..=offsets {
            let entry = self.entry_after_prefix(offset);
            let anchored = self.push(NodeKind::PositionAssertion(PositionAssertion {
                kind: PositionKind::MatchBegin,
                next: Some(entry),
            }));
            let unanchored = self.push(NodeKind::MatchFound(MatchFound { next: Some(entry) }));
            self.nodes[anchored.index()].parent = Some(self.root_node);
            self.nodes[unanchored.index()].parent = Some(self.root_node);
            states.anchored.push(anchored);
            states.unanchored.push(unanchored);
        }
        for id in states.anchored.clone().into_iter().chain(states.unanchored.clone()) {
            self.assign_number(id);
        }
        debug!(
            wave1,
            total = self.nodes_by_id.len(),
            offsets,
            "initial states materialized"
        );
        self.initial_states = Some(states);
    }

    fn number_reachable(&mut self, start: NodeId) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if self.nodes[id.index()].id.is_some() {
                continue;
            }
            self.assign_number(id);
            let mut next = Vec::new();
            if let Some(root) = self.node(id).kind.as_subtree_root() {
                next.extend(root.sentinels());
            }
            next.extend(self.children(id));
            stack.extend(next.into_iter().rev());
        }
    }

    fn assign_number(&mut self, id: NodeId) {
        let number = self.nodes_by_id.len() as u32;
        self.nodes[id.index()].set_id(number);
        self.nodes_by_id.push(id);
        trace!(node = ?id, number, "node numbered");
    }

    /// Anchored initial states, one per prefix offset.
    pub fn anchored_initial_states(&self) -> &[NodeId] {
        self.initial_states
            .as_ref()
            .map(|s| s.anchored.as_slice())
            .unwrap_or_default()
    }

    /// Unanchored initial states, one per prefix offset.
    pub fn unanchored_initial_states(&self) -> &[NodeId] {
        self.initial_states
            .as_ref()
            .map(|s| s.unanchored.as_slice())
            .unwrap_or_default()
    }
}

fn too_large(limit: Limit, max: u64) -> Error {
    warn!(%limit, max, "regex too large");
    Error::TooLarge { limit, max }
}
