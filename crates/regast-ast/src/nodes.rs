//! Node variant model.
//!
//! Nodes live in the `RegexAst` arena and refer to each other through
//! `NodeId` handles. Child lists (`Group::alternatives`, `Sequence::terms`,
//! `SubtreeRoot::body`) own their children; `Node::parent` and the sentinel
//! `next` links are non-owning back-references.

use std::fmt;

use regast_core::CodePointSet;

use crate::flags::{Flag, NodeFlags};
use crate::invariants;

/// Arena handle of a node. Distinct from the numbering id (`Node::id`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(invariants::node_index_fits(index))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Repetition bounds of a quantified term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Quantifier {
    pub min: u32,
    /// `None` means unbounded.
    pub max: Option<u32>,
    pub greedy: bool,
    /// Position in the AST's quantifier registry, assigned on first visit.
    pub(crate) index: Option<u32>,
    /// Position in the zero-width registry, assigned only if the body can
    /// match empty.
    pub(crate) zero_width_index: Option<u32>,
}

impl Quantifier {
    pub(crate) fn new(min: u32, max: Option<u32>, greedy: bool) -> Self {
        Self {
            min,
            max,
            greedy,
            index: None,
            zero_width_index: None,
        }
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.max.is_none()
    }

    #[inline]
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    #[inline]
    pub fn zero_width_index(&self) -> Option<u32> {
        self.zero_width_index
    }

    /// Bounds and greediness only, ignoring registry indices.
    pub fn equals_semantic(&self, other: &Quantifier) -> bool {
        self.min == other.min && self.max == other.max && self.greedy == other.greedy
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, None) => write!(f, "*")?,
            (1, None) => write!(f, "+")?,
            (0, Some(1)) => write!(f, "?")?,
            (min, None) => write!(f, "{{{min},}}")?,
            (min, Some(max)) if min == max => write!(f, "{{{min}}}")?,
            (min, Some(max)) => write!(f, "{{{min},{max}}}")?,
        }
        if !self.greedy {
            write!(f, "?")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Group {
    pub(crate) alternatives: Vec<NodeId>,
    pub(crate) group_number: Option<u32>,
    pub(crate) is_loop: bool,
    pub(crate) enclosed_capture_groups_low: u32,
    pub(crate) enclosed_capture_groups_high: u32,
    pub(crate) expanded_quantifier: bool,
    pub(crate) expanded_quantifier_empty_guard: bool,
}

impl Group {
    #[inline]
    pub fn alternatives(&self) -> &[NodeId] {
        &self.alternatives
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.alternatives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    #[inline]
    pub fn group_number(&self) -> Option<u32> {
        self.group_number
    }

    #[inline]
    pub fn is_capture_group(&self) -> bool {
        self.group_number.is_some()
    }

    #[inline]
    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    pub fn set_loop(&mut self, value: bool) {
        self.is_loop = value;
    }

    /// Capture groups nested inside this group, as `low..high`.
    #[inline]
    pub fn enclosed_capture_groups(&self) -> std::ops::Range<u32> {
        self.enclosed_capture_groups_low..self.enclosed_capture_groups_high
    }

    #[inline]
    pub fn is_expanded_quantifier(&self) -> bool {
        self.expanded_quantifier
    }

    pub fn set_expanded_quantifier(&mut self, value: bool) {
        self.expanded_quantifier = value;
    }

    #[inline]
    pub fn is_expanded_quantifier_empty_guard(&self) -> bool {
        self.expanded_quantifier_empty_guard
    }

    pub fn set_expanded_quantifier_empty_guard(&mut self, value: bool) {
        self.expanded_quantifier_empty_guard = value;
    }
}

/// Group with exactly two alternatives: the first is taken iff
/// `referenced_group` matched before.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionalGroup {
    pub(crate) group: Group,
    pub(crate) referenced_group: u32,
}

impl ConditionalGroup {
    #[inline]
    pub fn referenced_group(&self) -> u32 {
        self.referenced_group
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequence {
    pub(crate) terms: Vec<NodeId>,
}

impl Sequence {
    #[inline]
    pub fn terms(&self) -> &[NodeId] {
        &self.terms
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterClass {
    pub(crate) set: CodePointSet,
    pub(crate) was_single_char: bool,
}

impl CharacterClass {
    #[inline]
    pub fn set(&self) -> &CodePointSet {
        &self.set
    }

    /// The class was written as a single literal character.
    #[inline]
    pub fn was_single_char(&self) -> bool {
        self.was_single_char
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackReference {
    pub(crate) group_numbers: Vec<u32>,
    pub(crate) ignore_case: bool,
    pub(crate) nested: bool,
    pub(crate) forward: bool,
}

impl BackReference {
    /// More than one number for duplicate-named groups.
    #[inline]
    pub fn group_numbers(&self) -> &[u32] {
        &self.group_numbers
    }

    #[inline]
    pub fn is_multi_reference(&self) -> bool {
        self.group_numbers.len() > 1
    }

    #[inline]
    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Refers to an enclosing group, so it always matches the empty string.
    #[inline]
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Refers to a group that has not been closed yet on any path.
    #[inline]
    pub fn is_forward(&self) -> bool {
        self.forward
    }

    #[inline]
    pub fn is_nested_or_forward(&self) -> bool {
        self.nested || self.forward
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PositionKind {
    Caret,
    Dollar,
    /// Start of the match region; used for anchored initial states.
    MatchBegin,
    /// End of the match region; used for anchored final states.
    MatchEnd,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionAssertion {
    pub(crate) kind: PositionKind,
    pub(crate) next: Option<NodeId>,
}

impl PositionAssertion {
    #[inline]
    pub fn kind(&self) -> PositionKind {
        self.kind
    }

    /// Successor when the assertion serves as an initial state.
    #[inline]
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchFound {
    pub(crate) next: Option<NodeId>,
}

impl MatchFound {
    #[inline]
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }
}

/// Shape shared by the root, look-around assertions and atomic groups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtreeRoot {
    pub(crate) body: Option<NodeId>,
    pub(crate) anchored_initial: NodeId,
    pub(crate) unanchored_initial: NodeId,
    pub(crate) anchored_final: NodeId,
    pub(crate) match_found: NodeId,
}

impl SubtreeRoot {
    #[inline]
    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    /// `MatchBegin` assertion leading into the body.
    #[inline]
    pub fn anchored_initial_state(&self) -> NodeId {
        self.anchored_initial
    }

    /// `MatchFound` sentinel leading into the body.
    #[inline]
    pub fn unanchored_initial_state(&self) -> NodeId {
        self.unanchored_initial
    }

    #[inline]
    pub fn anchored_final_state(&self) -> NodeId {
        self.anchored_final
    }

    #[inline]
    pub fn match_found(&self) -> NodeId {
        self.match_found
    }

    pub(crate) fn sentinels(&self) -> [NodeId; 4] {
        [
            self.anchored_initial,
            self.unanchored_initial,
            self.anchored_final,
            self.match_found,
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookAround {
    pub(crate) root: SubtreeRoot,
    pub(crate) negated: bool,
}

impl LookAround {
    #[inline]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    #[inline]
    pub fn subtree(&self) -> &SubtreeRoot {
        &self.root
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubexpressionCall {
    pub(crate) group_number: u32,
}

impl SubexpressionCall {
    #[inline]
    pub fn group_number(&self) -> u32 {
        self.group_number
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Group(Group),
    ConditionalGroup(ConditionalGroup),
    Sequence(Sequence),
    CharacterClass(CharacterClass),
    BackReference(BackReference),
    PositionAssertion(PositionAssertion),
    LookAhead(LookAround),
    LookBehind(LookAround),
    AtomicGroup(SubtreeRoot),
    SubexpressionCall(SubexpressionCall),
    MatchFound(MatchFound),
    Root(SubtreeRoot),
}

impl NodeKind {
    /// Plain and conditional groups.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            NodeKind::Group(g) => Some(g),
            NodeKind::ConditionalGroup(c) => Some(&c.group),
            _ => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            NodeKind::Group(g) => Some(g),
            NodeKind::ConditionalGroup(c) => Some(&mut c.group),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            NodeKind::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_subtree_root(&self) -> Option<&SubtreeRoot> {
        match self {
            NodeKind::LookAhead(la) | NodeKind::LookBehind(la) => Some(&la.root),
            NodeKind::AtomicGroup(r) | NodeKind::Root(r) => Some(r),
            _ => None,
        }
    }

    pub(crate) fn as_subtree_root_mut(&mut self) -> Option<&mut SubtreeRoot> {
        match self {
            NodeKind::LookAhead(la) | NodeKind::LookBehind(la) => Some(&mut la.root),
            NodeKind::AtomicGroup(r) | NodeKind::Root(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_look_around(&self) -> Option<&LookAround> {
        match self {
            NodeKind::LookAhead(la) | NodeKind::LookBehind(la) => Some(la),
            _ => None,
        }
    }

    pub fn as_character_class(&self) -> Option<&CharacterClass> {
        match self {
            NodeKind::CharacterClass(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_back_reference(&self) -> Option<&BackReference> {
        match self {
            NodeKind::BackReference(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_position_assertion(&self) -> Option<&PositionAssertion> {
        match self {
            NodeKind::PositionAssertion(p) => Some(p),
            _ => None,
        }
    }

    /// Kinds that may carry a quantifier.
    pub fn is_quantifiable(&self) -> bool {
        !matches!(
            self,
            NodeKind::Sequence(_)
                | NodeKind::PositionAssertion(_)
                | NodeKind::MatchFound(_)
                | NodeKind::Root(_)
        )
    }

    /// Kinds that may appear as a sequence term.
    pub fn is_term(&self) -> bool {
        !matches!(self, NodeKind::Sequence(_) | NodeKind::Root(_))
    }

    pub fn is_caret(&self) -> bool {
        matches!(self, NodeKind::PositionAssertion(p) if p.kind == PositionKind::Caret)
    }

    pub fn is_dollar(&self) -> bool {
        matches!(self, NodeKind::PositionAssertion(p) if p.kind == PositionKind::Dollar)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Group(_) => "Group",
            NodeKind::ConditionalGroup(_) => "ConditionalBackReferenceGroup",
            NodeKind::Sequence(_) => "Sequence",
            NodeKind::CharacterClass(_) => "CharacterClass",
            NodeKind::BackReference(_) => "BackReference",
            NodeKind::PositionAssertion(_) => "PositionAssertion",
            NodeKind::LookAhead(_) => "LookAheadAssertion",
            NodeKind::LookBehind(_) => "LookBehindAssertion",
            NodeKind::AtomicGroup(_) => "AtomicGroup",
            NodeKind::SubexpressionCall(_) => "SubexpressionCall",
            NodeKind::MatchFound(_) => "MatchFound",
            NodeKind::Root(_) => "Root",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) id: Option<u32>,
    pub(crate) flags: NodeFlags,
    pub(crate) quantifier: Option<Quantifier>,
    pub(crate) min_path: u32,
    pub(crate) max_path: u32,
    pub(crate) prefix_length_min: u32,
    pub(crate) prefix_length_max: u32,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            id: None,
            flags: NodeFlags::EMPTY,
            quantifier: None,
            min_path: 0,
            max_path: 0,
            prefix_length_min: 0,
            prefix_length_max: 0,
        }
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Non-owning link to the syntactic parent.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Numbering id; `None` until the initial states are materialized.
    #[inline]
    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        invariants::assert_id_unassigned(self, id);
        self.id = Some(id);
    }

    #[inline]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    #[inline]
    pub fn quantifier(&self) -> Option<&Quantifier> {
        self.quantifier.as_ref()
    }

    #[inline]
    pub fn has_quantifier(&self) -> bool {
        self.quantifier.is_some()
    }

    /// Path length, in consumed characters, from the region start up to and
    /// including this node, minimum over all paths.
    #[inline]
    pub fn min_path(&self) -> u32 {
        self.min_path
    }

    /// Path length maximum. Only an upper bound when the node has no loops
    /// and no back references.
    #[inline]
    pub fn max_path(&self) -> u32 {
        self.max_path
    }

    pub fn set_min_path(&mut self, value: u32) {
        self.min_path = value;
    }

    pub fn set_max_path(&mut self, value: u32) {
        self.max_path = value;
    }

    /// Characters before the region start this node may inspect.
    #[inline]
    pub fn prefix_length_min(&self) -> u32 {
        self.prefix_length_min
    }

    #[inline]
    pub fn prefix_length_max(&self) -> u32 {
        self.prefix_length_max
    }

    pub fn set_prefix_length(&mut self, min: u32, max: u32) {
        self.prefix_length_min = min;
        self.prefix_length_max = max;
    }

    #[inline]
    pub fn is_capture_group(&self) -> bool {
        self.kind.as_group().is_some_and(Group::is_capture_group)
    }

    /// Unions the propagating subset of `flags` into this node.
    pub(crate) fn inherit(&mut self, flags: NodeFlags) {
        self.flags = self.flags.union(flags.intersection(NodeFlags::PROPAGATING));
    }

    /// Reset everything the properties pass computes.
    pub(crate) fn clear_analysis(&mut self) {
        self.flags = self.flags.intersection(NodeFlags::single(Flag::Prefix));
        self.min_path = 0;
        self.max_path = 0;
        self.prefix_length_min = 0;
        self.prefix_length_max = 0;
    }
}

macro_rules! flag_accessors {
    ($($get:ident, $set:ident => $flag:ident;)*) => {
        impl Node {
            $(
                #[inline]
                pub fn $get(&self) -> bool {
                    self.flags.contains(Flag::$flag)
                }

                #[inline]
                pub fn $set(&mut self, value: bool) {
                    self.flags.set(Flag::$flag, value);
                }
            )*
        }
    };
}

flag_accessors! {
    is_dead, set_dead => Dead;
    starts_with_caret, set_starts_with_caret => StartsWithCaret;
    ends_with_dollar, set_ends_with_dollar => EndsWithDollar;
    has_caret, set_has_caret => HasCaret;
    has_dollar, set_has_dollar => HasDollar;
    has_loops, set_has_loops => HasLoops;
    has_quantifiers, set_has_quantifiers => HasQuantifiers;
    has_capture_groups, set_has_capture_groups => HasCaptureGroups;
    has_look_aheads, set_has_look_aheads => HasLookAheads;
    has_look_behinds, set_has_look_behinds => HasLookBehinds;
    has_back_references, set_has_back_references => HasBackReferences;
    has_atomic_groups, set_has_atomic_groups => HasAtomicGroups;
    has_alternations, set_has_alternations => HasAlternations;
    may_match_empty_string, set_may_match_empty_string => MayMatchEmptyString;
    is_always_empty, set_always_empty => AlwaysEmpty;
    is_prefix, set_prefix => Prefix;
}
