#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Value types shared by the regast AST and its consumers.
//!
//! - `CodePointSet`: sorted range list standing in for the character-set
//!   algebra. The AST only compares, merges and queries it.
//! - `CompactBitSet`: growable bitset keyed by capture-group numbers and
//!   boundary slots.

mod bitset;
mod charset;
mod invariants;

#[cfg(test)]
mod charset_tests;

pub use bitset::CompactBitSet;
pub use charset::{CodePointSet, MAX_CODE_POINT};
