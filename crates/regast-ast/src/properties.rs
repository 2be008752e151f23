//! Aggregate facts about a whole pattern.
//!
//! Filled by the properties pass from live nodes only; dead subtrees do not
//! contribute. Consumed by policy predicates such as
//! `RegexAst::can_transform_to_dfa`.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegexProperties {
    pub alternations: bool,
    pub atomic_groups: bool,
    pub back_references: bool,
    pub back_references_in_look_behind: bool,
    pub capture_groups_in_look_around_assertions: bool,
    /// A character class that is not a single code point.
    pub char_classes: bool,
    pub complex_look_ahead_assertions: bool,
    pub conditional_back_references: bool,
    pub conditional_references_into_look_aheads: bool,
    pub empty_capture_groups: bool,
    /// An always-empty capture group nested in an unbounded repetition.
    pub empty_capture_groups_in_loops: bool,
    pub forward_references: bool,
    pub large_counted_repetitions: bool,
    pub look_ahead_assertions: bool,
    pub look_behind_assertions: bool,
    pub loops: bool,
    pub negative_look_ahead_assertions: bool,
    pub negative_look_behind_assertions: bool,
    pub nested_back_references: bool,
    pub nested_look_behind_assertions: bool,
    pub non_literal_look_behind_assertions: bool,
    pub quantifiers: bool,
    pub subexpression_calls: bool,
}

impl RegexProperties {
    pub fn has_look_around_assertions(&self) -> bool {
        self.look_ahead_assertions || self.look_behind_assertions
    }

    pub fn has_negative_look_around_assertions(&self) -> bool {
        self.negative_look_ahead_assertions || self.negative_look_behind_assertions
    }
}

/// Why the DFA pipeline cannot handle a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DfaFailureReason {
    TooManyNodes,
    BackReferences,
    LargeCountedRepetitions,
    NegativeLookAheads,
    ComplexLookAheads,
    NonLiteralLookBehinds,
    NegativeLookBehinds,
    ConditionalBackReferences,
    ConditionalReferencesIntoLookAheads,
    AtomicGroups,
    SubexpressionCalls,
    EmptyCaptureGroupsInLoops,
}

impl fmt::Display for DfaFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TooManyNodes => "too many AST nodes",
            Self::BackReferences => "back-references",
            Self::LargeCountedRepetitions => "large counted repetitions",
            Self::NegativeLookAheads => "negative look-ahead assertions",
            Self::ComplexLookAheads => "complex look-ahead assertions",
            Self::NonLiteralLookBehinds => "non-literal look-behind assertions",
            Self::NegativeLookBehinds => "negative look-behind assertions",
            Self::ConditionalBackReferences => "conditional back-references",
            Self::ConditionalReferencesIntoLookAheads => {
                "conditional references into look-ahead assertions"
            }
            Self::AtomicGroups => "atomic groups",
            Self::SubexpressionCalls => "subexpression calls",
            Self::EmptyCaptureGroupsInLoops => "empty capture groups inside loops",
        };
        f.write_str(text)
    }
}

/// Joins reasons as a human-readable list.
pub fn describe(reasons: &[DfaFailureReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
