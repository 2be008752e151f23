//! Construction limits and regex flags.

use serde::Serialize;

const MAX_NODE_HANDLES: usize = u32::MAX as usize;

/// Hard bounds enforced by the AST factories.
///
/// The analysis and the downstream automaton are worst-case exponential on
/// adversarial patterns, so construction stops with `Error::TooLarge`
/// instead of growing without bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AstLimits {
    pub(crate) max_nodes: usize,
    pub(crate) max_capture_groups: u32,
    pub(crate) max_alternatives: usize,
    pub(crate) max_terms_per_sequence: usize,
    pub(crate) max_quantifier_bound: u32,
    /// Counted repetitions with a bound above this are "large".
    pub(crate) large_counted_repetition: u32,
    pub(crate) max_nodes_for_dfa: usize,
}

impl Default for AstLimits {
    fn default() -> Self {
        Self {
            max_nodes: 1_000_000,
            max_capture_groups: i16::MAX as u32,
            max_alternatives: i16::MAX as usize,
            max_terms_per_sequence: i16::MAX as usize,
            max_quantifier_bound: i32::MAX as u32,
            large_counted_repetition: 40,
            max_nodes_for_dfa: 10_000,
        }
    }
}

impl AstLimits {
    #[inline]
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    #[inline]
    pub fn max_capture_groups(&self) -> u32 {
        self.max_capture_groups
    }

    #[inline]
    pub fn max_alternatives(&self) -> usize {
        self.max_alternatives
    }

    #[inline]
    pub fn max_terms_per_sequence(&self) -> usize {
        self.max_terms_per_sequence
    }

    #[inline]
    pub fn max_quantifier_bound(&self) -> u32 {
        self.max_quantifier_bound
    }

    #[inline]
    pub fn large_counted_repetition(&self) -> u32 {
        self.large_counted_repetition
    }

    #[inline]
    pub fn max_nodes_for_dfa(&self) -> usize {
        self.max_nodes_for_dfa
    }
}

/// Matching flags relevant to the AST layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegexFlags {
    /// Matches must start exactly at the search offset.
    pub sticky: bool,
    /// Atomic groups are treated as plain groups.
    pub ignore_atomic_groups: bool,
}

/// Configuration for building a `RegexAst`.
#[derive(Clone, Debug, Default)]
pub struct AstOptions {
    pub(crate) limits: AstLimits,
    pub(crate) flags: RegexFlags,
}

impl AstOptions {
    /// Create options with default limits and no flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of nodes. Node handles are 32-bit, so the
    /// value is capped at `u32::MAX`.
    pub fn max_nodes(mut self, value: usize) -> Self {
        self.limits.max_nodes = value.min(MAX_NODE_HANDLES);
        self
    }

    /// Set the maximum number of capture groups, including group 0.
    pub fn max_capture_groups(mut self, value: u32) -> Self {
        self.limits.max_capture_groups = value;
        self
    }

    /// Set the maximum number of alternatives per group.
    pub fn max_alternatives(mut self, value: usize) -> Self {
        self.limits.max_alternatives = value;
        self
    }

    /// Set the maximum number of terms per sequence.
    pub fn max_terms_per_sequence(mut self, value: usize) -> Self {
        self.limits.max_terms_per_sequence = value;
        self
    }

    /// Set the largest accepted quantifier bound.
    pub fn max_quantifier_bound(mut self, value: u32) -> Self {
        self.limits.max_quantifier_bound = value;
        self
    }

    /// Set the bound above which counted repetitions count as large.
    pub fn large_counted_repetition(mut self, value: u32) -> Self {
        self.limits.large_counted_repetition = value;
        self
    }

    /// Set the node count above which DFA construction is refused.
    pub fn max_nodes_for_dfa(mut self, value: usize) -> Self {
        self.limits.max_nodes_for_dfa = value;
        self
    }

    /// Set the sticky flag.
    pub fn sticky(mut self, value: bool) -> Self {
        self.flags.sticky = value;
        self
    }

    /// Set whether atomic groups are ignored.
    pub fn ignore_atomic_groups(mut self, value: bool) -> Self {
        self.flags.ignore_atomic_groups = value;
        self
    }

    #[inline]
    pub fn limits(&self) -> &AstLimits {
        &self.limits
    }

    #[inline]
    pub fn flags(&self) -> RegexFlags {
        self.flags
    }
}
