use crate::{CodePointSet, MAX_CODE_POINT};

#[test]
fn from_ranges_normalizes_overlap_and_adjacency() {
    let set = CodePointSet::from_ranges([(10, 20), (0, 5), (6, 8), (15, 30)]);

    assert_eq!(set.ranges(), &[(0, 8), (10, 30)]);
}

#[test]
fn equal_members_compare_equal() {
    let a = CodePointSet::from_chars(['a', 'b', 'c']);
    let b = CodePointSet::range('a' as u32, 'c' as u32);

    assert_eq!(a, b);
}

#[test]
fn single_code_point() {
    assert_eq!(CodePointSet::single(0x41).single_code_point(), Some(0x41));
    assert_eq!(CodePointSet::range(1, 2).single_code_point(), None);
    assert!(!CodePointSet::empty().is_single());
}

#[test]
fn full_matches_everything() {
    let full = CodePointSet::full();

    assert!(full.matches_everything());
    assert_eq!(full.size(), u64::from(MAX_CODE_POINT) + 1);
    assert!(CodePointSet::empty().complement().matches_everything());
}

#[test]
fn contains_uses_range_bounds() {
    let set = CodePointSet::from_ranges([(10, 20), (40, 50)]);

    assert!(set.contains(10));
    assert!(set.contains(50));
    assert!(!set.contains(21));
    assert!(!set.contains(9));
}

#[test]
fn union_and_intersect() {
    let a = CodePointSet::from_ranges([(0, 10), (20, 30)]);
    let b = CodePointSet::from_ranges([(5, 25)]);

    assert_eq!(a.union(&b).ranges(), &[(0, 30)]);
    assert_eq!(a.intersect(&b).ranges(), &[(5, 10), (20, 25)]);
}

#[test]
fn complement_roundtrip() {
    let set = CodePointSet::from_ranges([(0, 0), (100, 200), (MAX_CODE_POINT, MAX_CODE_POINT)]);
    let inverted = set.complement();

    assert_eq!(inverted.ranges(), &[(1, 99), (201, MAX_CODE_POINT - 1)]);
    assert_eq!(inverted.complement(), set);
}

#[test]
fn display() {
    assert_eq!(CodePointSet::single('a' as u32).to_string(), "a");
    assert_eq!(CodePointSet::from_chars(['a', 'b', 'c', 'x']).to_string(), "[a-cx]");
    assert_eq!(CodePointSet::empty().to_string(), "[]");
    assert_eq!(CodePointSet::full().to_string(), ".");
    assert_eq!(CodePointSet::single(0x0a).to_string(), "\\u{a}");
}

#[test]
#[should_panic(expected = "is inverted")]
fn inverted_range_panics() {
    CodePointSet::range(5, 1);
}

#[test]
fn serializes_as_ranges() {
    let set = CodePointSet::from_ranges([(1, 2)]);

    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(json, r#"{"ranges":[[1,2]]}"#);
}
