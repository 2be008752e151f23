//! Character sets as sorted lists of inclusive code point ranges.
//!
//! Ranges are kept normalized: sorted, non-overlapping and non-adjacent.
//! Two sets with the same members therefore compare and hash equal.

use std::fmt;

use serde::Serialize;

use crate::invariants::{assert_code_point, assert_range_ordered};

/// Largest code point representable in a set.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CodePointSet {
    ranges: Vec<(u32, u32)>,
}

impl CodePointSet {
    /// The set matching nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The set matching every code point.
    pub fn full() -> Self {
        Self {
            ranges: vec![(0, MAX_CODE_POINT)],
        }
    }

    pub fn single(cp: u32) -> Self {
        assert_code_point(cp);
        Self {
            ranges: vec![(cp, cp)],
        }
    }

    pub fn range(lo: u32, hi: u32) -> Self {
        assert_range_ordered(lo, hi);
        assert_code_point(hi);
        Self {
            ranges: vec![(lo, hi)],
        }
    }

    /// Build from arbitrary (possibly overlapping, unsorted) ranges.
    pub fn from_ranges(ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut ranges: Vec<(u32, u32)> = ranges
            .into_iter()
            .inspect(|&(lo, hi)| {
                assert_range_ordered(lo, hi);
                assert_code_point(hi);
            })
            .collect();
        ranges.sort_unstable();
        Self {
            ranges: normalize(ranges),
        }
    }

    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        Self::from_ranges(chars.into_iter().map(|c| (c as u32, c as u32)))
    }

    #[inline]
    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[inline]
    pub fn matches_everything(&self) -> bool {
        self.ranges.as_slice() == [(0, MAX_CODE_POINT)]
    }

    /// The only member, if the set has exactly one.
    pub fn single_code_point(&self) -> Option<u32> {
        match self.ranges.as_slice() {
            [(lo, hi)] if lo == hi => Some(*lo),
            _ => None,
        }
    }

    #[inline]
    pub fn is_single(&self) -> bool {
        self.single_code_point().is_some()
    }

    /// Number of code points in the set.
    pub fn size(&self) -> u64 {
        self.ranges
            .iter()
            .map(|&(lo, hi)| u64::from(hi - lo) + 1)
            .sum()
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < cp {
                    std::cmp::Ordering::Less
                } else if lo > cp {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut merged = Vec::with_capacity(self.ranges.len() + other.ranges.len());
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() || j < other.ranges.len() {
            let take_left = match (self.ranges.get(i), other.ranges.get(j)) {
                (Some(a), Some(b)) => a <= b,
                (Some(_), None) => true,
                _ => false,
            };
            if take_left {
                merged.push(self.ranges[i]);
                i += 1;
            } else {
                merged.push(other.ranges[j]);
                j += 1;
            }
        }
        Self {
            ranges: normalize(merged),
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (alo, ahi) = self.ranges[i];
            let (blo, bhi) = other.ranges[j];
            let lo = alo.max(blo);
            let hi = ahi.min(bhi);
            if lo <= hi {
                out.push((lo, hi));
            }
            if ahi < bhi {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self { ranges: out }
    }

    pub fn complement(&self) -> Self {
        let mut out = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = 0u32;
        for &(lo, hi) in &self.ranges {
            if lo > next {
                out.push((next, lo - 1));
            }
            next = hi.saturating_add(1);
        }
        if let Some(&(_, hi)) = self.ranges.last() {
            if hi < MAX_CODE_POINT {
                out.push((hi + 1, MAX_CODE_POINT));
            }
        } else {
            out.push((0, MAX_CODE_POINT));
        }
        Self { ranges: out }
    }
}

/// Merge overlapping and adjacent ranges of a sorted list.
fn normalize(sorted: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    let mut out: Vec<(u32, u32)> = Vec::with_capacity(sorted.len());
    for (lo, hi) in sorted {
        match out.last_mut() {
            Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
            _ => out.push((lo, hi)),
        }
    }
    out
}

fn write_code_point(f: &mut fmt::Formatter<'_>, cp: u32) -> fmt::Result {
    match char::from_u32(cp) {
        Some(c) if c.is_ascii_graphic() && !matches!(c, '[' | ']' | '-' | '\\' | '^') => {
            write!(f, "{c}")
        }
        _ => write!(f, "\\u{{{cp:x}}}"),
    }
}

impl fmt::Display for CodePointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matches_everything() {
            return write!(f, ".");
        }
        if let Some(cp) = self.single_code_point() {
            return write_code_point(f, cp);
        }
        write!(f, "[")?;
        for &(lo, hi) in &self.ranges {
            write_code_point(f, lo)?;
            if hi > lo {
                write!(f, "-")?;
                write_code_point(f, hi)?;
            }
        }
        write!(f, "]")
    }
}

impl fmt::Debug for CodePointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodePointSet({self})")
    }
}
