//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::MAX_CODE_POINT;

#[inline]
pub(crate) fn assert_range_ordered(lo: u32, hi: u32) {
    assert!(
        lo <= hi,
        "CodePointSet: range {lo:#x}..={hi:#x} is inverted \
         (callers must order range bounds)"
    );
}

#[inline]
pub(crate) fn assert_code_point(cp: u32) {
    assert!(
        cp <= MAX_CODE_POINT,
        "CodePointSet: {cp:#x} is outside the code point space \
         (callers must decode input before building sets)"
    );
}
