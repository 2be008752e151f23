//! Regular expression AST with static analysis.
//!
//! The parser drives the `RegexAst` factories to build the tree, then runs
//! the properties pass exactly once. The automaton builder reads the result:
//! - `ast` - node arena, factories, registries and derived predicates
//! - `nodes` - closed variant model (`NodeKind`) and per-node metrics
//! - `analysis` - path bounds, dead nodes, anchors, quantifier indices
//! - `prefix` - look-behind prefix synthesis and initial states
//! - `boundaries` - interned capture-group boundary descriptors
//!
//! ```
//! use regast_ast::{AstOptions, RegexAst};
//! use regast_core::CodePointSet;
//!
//! let mut ast = RegexAst::new(AstOptions::new());
//! let root = ast.create_capture_group(0)?;
//! let seq = ast.add_sequence(root)?;
//! let a = ast.create_character_class(CodePointSet::single('a' as u32))?;
//! ast.add_term(seq, a)?;
//! ast.set_root(root);
//! ast.calc_properties();
//!
//! assert!(ast.is_literal_string());
//! # Ok::<(), regast_ast::Error>(())
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod analysis;
pub mod ast;
pub mod boundaries;
mod copy;
pub mod dump;
pub mod flags;
mod invariants;
pub mod nodes;
pub mod options;
pub mod prefix;
pub mod properties;

#[cfg(test)]
mod boundaries_tests;
#[cfg(test)]
mod copy_tests;
#[cfg(test)]
pub mod test_utils;

use std::fmt;

pub use ast::RegexAst;
pub use boundaries::GroupBoundaries;
pub use flags::{Flag, NodeFlags};
pub use nodes::{
    BackReference, CharacterClass, ConditionalGroup, Group, LookAround, MatchFound, Node, NodeId,
    NodeKind, PositionAssertion, PositionKind, Quantifier, Sequence, SubexpressionCall,
    SubtreeRoot,
};
pub use options::{AstLimits, AstOptions, RegexFlags};
pub use properties::{DfaFailureReason, RegexProperties};

/// A construction limit from `AstLimits`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Limit {
    Nodes,
    CaptureGroups,
    Alternatives,
    TermsPerSequence,
    QuantifierBound,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nodes => write!(f, "node count"),
            Self::CaptureGroups => write!(f, "capture group count"),
            Self::Alternatives => write!(f, "alternatives per group"),
            Self::TermsPerSequence => write!(f, "terms per sequence"),
            Self::QuantifierBound => write!(f, "quantifier bound"),
        }
    }
}

/// Constructs the automaton pipeline cannot handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedFeature {
    /// A look-behind whose look-back distance is not statically known.
    NonLiteralLookBehind,
}

impl fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonLiteralLookBehind => write!(f, "non-literal look-behind assertion"),
        }
    }
}

/// Recoverable conditions: callers may fall back to a different engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A construction limit was exceeded.
    #[error("regex too large: {limit} exceeds {max}")]
    TooLarge { limit: Limit, max: u64 },

    #[error("unsupported regex: {0}")]
    Unsupported(UnsupportedFeature),
}

impl Error {
    pub fn is_too_large(&self) -> bool {
        matches!(self, Error::TooLarge { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}

/// Result type for AST construction.
pub type Result<T> = std::result::Result<T, Error>;
