use std::sync::Arc;
use std::thread;

use regast_core::CompactBitSet;

use crate::boundaries::BoundariesTable;
use crate::GroupBoundaries;

fn bits(indices: &[u32]) -> CompactBitSet {
    indices.iter().copied().collect()
}

#[test]
fn content_equal_requests_share_one_descriptor() {
    let mut table = BoundariesTable::default();
    let a = table.intern(&bits(&[0, 3]), &bits(&[5]), Some(1), Some(2));
    let b = table.intern(&bits(&[3, 0]), &bits(&[5]), Some(1), Some(2));

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(table.len(), 1);
}

#[test]
fn group_numbers_distinguish_descriptors() {
    let mut table = BoundariesTable::default();
    let a = table.intern(&bits(&[0]), &CompactBitSet::new(), Some(0), None);
    let b = table.intern(&bits(&[0]), &CompactBitSet::new(), Some(0), Some(0));

    assert!(!Arc::ptr_eq(&a, &b));
    assert_ne!(a, b);
    assert_eq!(table.len(), 2);
}

#[test]
fn empty_request_returns_the_singleton() {
    let mut table = BoundariesTable::default();
    let empty = table.intern(&CompactBitSet::new(), &CompactBitSet::new(), None, None);

    assert!(Arc::ptr_eq(&empty, &GroupBoundaries::empty()));
    assert!(empty.is_empty());
    assert_eq!(table.len(), 0);
}

#[test]
fn grown_then_shrunk_bitset_still_hits() {
    let mut table = BoundariesTable::default();
    let a = table.intern(&bits(&[2]), &CompactBitSet::new(), None, None);

    let mut scratch = bits(&[2, 200]);
    scratch.remove(200);
    let b = table.intern(&scratch, &CompactBitSet::new(), None, None);

    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn empty_singleton_is_shared_across_threads() {
    let local = GroupBoundaries::empty();
    let remote = thread::spawn(GroupBoundaries::empty).join().unwrap();
    assert!(Arc::ptr_eq(&local, &remote));
}

#[test]
fn descriptors_from_different_tables_compare_by_content() {
    let mut first = BoundariesTable::default();
    let mut second = BoundariesTable::default();
    let a = first.intern(&bits(&[1]), &bits(&[2]), None, Some(0));
    let b = second.intern(&bits(&[1]), &bits(&[2]), None, Some(0));

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a, b);
}

#[test]
fn arrays_are_sorted() {
    let boundaries = {
        let mut table = BoundariesTable::default();
        table.intern(&bits(&[5, 1, 3]), &bits(&[4, 0]), None, None)
    };

    assert_eq!(boundaries.update_array(), &[1, 3, 5]);
    assert_eq!(boundaries.clear_array(), &[0, 4]);
    assert!(boundaries.has_index_updates());
    assert!(boundaries.has_index_clears());
    assert!(boundaries.update_indices().contains(3));
}

#[test]
fn apply_clears_before_updating() {
    let mut table = BoundariesTable::default();
    let boundaries = table.intern(&bits(&[1, 2, 9]), &bits(&[0, 1]), None, None);

    let mut slots = vec![Some(0); 4];
    boundaries.apply(&mut slots, 7);

    assert_eq!(slots, vec![None, Some(7), Some(7), Some(0)]);
}

#[test]
fn bits_accumulate_into_target() {
    let mut table = BoundariesTable::default();
    let a = table.intern(&bits(&[0]), &bits(&[3]), None, None);
    let b = table.intern(&bits(&[2]), &bits(&[1]), None, None);

    let mut update = CompactBitSet::new();
    let mut clear = CompactBitSet::new();
    for boundaries in [&a, &b] {
        boundaries.update_bits_into(&mut update);
        boundaries.clear_bits_into(&mut clear);
    }

    assert_eq!(update.to_vec(), vec![0, 2]);
    assert_eq!(clear.to_vec(), vec![1, 3]);
}

#[test]
fn display() {
    let mut table = BoundariesTable::default();
    let full = table.intern(&bits(&[0, 1]), &bits(&[2]), Some(0), Some(3));
    let clear_only = table.intern(&CompactBitSet::new(), &bits(&[4, 5]), None, None);

    assert_eq!(full.to_string(), "update {0, 1}, clear {2} last 3");
    assert_eq!(clear_only.to_string(), "clear {4, 5}");
    assert_eq!(GroupBoundaries::empty().to_string(), "");
}
