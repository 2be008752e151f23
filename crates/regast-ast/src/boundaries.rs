//! Capture-group boundary descriptors attached to automaton transitions.
//!
//! Boundary slot `2n` is the start of group `n`, slot `2n + 1` its end.
//! Descriptors are immutable and interned per AST: content-equal requests
//! return the same `Arc`. The all-empty descriptor is a process-wide
//! singleton so independent ASTs can share it across threads.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use indexmap::{Equivalent, IndexSet};
use regast_core::CompactBitSet;

static EMPTY: LazyLock<Arc<GroupBoundaries>> = LazyLock::new(|| {
    Arc::new(GroupBoundaries::new(
        CompactBitSet::new(),
        CompactBitSet::new(),
        None,
        None,
    ))
});

#[derive(Clone)]
pub struct GroupBoundaries {
    update_indices: CompactBitSet,
    clear_indices: CompactBitSet,
    first_group: Option<u32>,
    last_group: Option<u32>,
    update_array: Box<[u32]>,
    clear_array: Box<[u32]>,
}

impl GroupBoundaries {
    fn new(
        update_indices: CompactBitSet,
        clear_indices: CompactBitSet,
        first_group: Option<u32>,
        last_group: Option<u32>,
    ) -> Self {
        let update_array = update_indices.to_vec().into_boxed_slice();
        let clear_array = clear_indices.to_vec().into_boxed_slice();
        Self {
            update_indices,
            clear_indices,
            first_group,
            last_group,
            update_array,
            clear_array,
        }
    }

    /// The shared descriptor that updates and clears nothing.
    pub fn empty() -> Arc<GroupBoundaries> {
        Arc::clone(&EMPTY)
    }

    /// Slots set to the current position.
    #[inline]
    pub fn update_indices(&self) -> &CompactBitSet {
        &self.update_indices
    }

    /// Slots reset to "unset".
    #[inline]
    pub fn clear_indices(&self) -> &CompactBitSet {
        &self.clear_indices
    }

    /// Update slots in ascending order.
    #[inline]
    pub fn update_array(&self) -> &[u32] {
        &self.update_array
    }

    /// Clear slots in ascending order.
    #[inline]
    pub fn clear_array(&self) -> &[u32] {
        &self.clear_array
    }

    #[inline]
    pub fn first_group(&self) -> Option<u32> {
        self.first_group
    }

    /// Group reported as the last matched one, if this transition changes it.
    #[inline]
    pub fn last_group(&self) -> Option<u32> {
        self.last_group
    }

    #[inline]
    pub fn has_index_updates(&self) -> bool {
        !self.update_array.is_empty()
    }

    #[inline]
    pub fn has_index_clears(&self) -> bool {
        !self.clear_array.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_index_updates()
            && !self.has_index_clears()
            && self.first_group.is_none()
            && self.last_group.is_none()
    }

    /// Apply to a slot array: clears first, then updates to `position`.
    /// Slots beyond the array are ignored.
    pub fn apply(&self, slots: &mut [Option<usize>], position: usize) {
        for &i in self.clear_array.iter() {
            if let Some(slot) = slots.get_mut(i as usize) {
                *slot = None;
            }
        }
        for &i in self.update_array.iter() {
            if let Some(slot) = slots.get_mut(i as usize) {
                *slot = Some(position);
            }
        }
    }

    /// Add this descriptor's update slots to `target`.
    pub fn update_bits_into(&self, target: &mut CompactBitSet) {
        target.union_with(&self.update_indices);
    }

    /// Add this descriptor's clear slots to `target`.
    pub fn clear_bits_into(&self, target: &mut CompactBitSet) {
        target.union_with(&self.clear_indices);
    }
}

impl PartialEq for GroupBoundaries {
    fn eq(&self, other: &Self) -> bool {
        self.update_indices == other.update_indices
            && self.clear_indices == other.clear_indices
            && self.first_group == other.first_group
            && self.last_group == other.last_group
    }
}

impl Eq for GroupBoundaries {}

impl Hash for GroupBoundaries {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_content(
            &self.update_indices,
            &self.clear_indices,
            self.first_group,
            self.last_group,
            state,
        );
    }
}

fn hash_content<H: Hasher>(
    update: &CompactBitSet,
    clear: &CompactBitSet,
    first_group: Option<u32>,
    last_group: Option<u32>,
    state: &mut H,
) {
    update.hash(state);
    clear.hash(state);
    first_group.hash(state);
    last_group.hash(state);
}

impl fmt::Display for GroupBoundaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_index_updates() {
            write!(f, "update {:?}", self.update_indices)?;
        }
        if self.has_index_clears() {
            if self.has_index_updates() {
                write!(f, ", ")?;
            }
            write!(f, "clear {:?}", self.clear_indices)?;
        }
        if let Some(last) = self.last_group {
            write!(f, " last {last}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for GroupBoundaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupBoundaries")
            .field("update", &self.update_indices)
            .field("clear", &self.clear_indices)
            .field("first_group", &self.first_group)
            .field("last_group", &self.last_group)
            .finish()
    }
}

/// Borrowed lookup key, so a hit never copies the caller's bitsets.
struct BoundariesKey<'a> {
    update: &'a CompactBitSet,
    clear: &'a CompactBitSet,
    first_group: Option<u32>,
    last_group: Option<u32>,
}

impl Hash for BoundariesKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_content(
            self.update,
            self.clear,
            self.first_group,
            self.last_group,
            state,
        );
    }
}

impl Equivalent<Arc<GroupBoundaries>> for BoundariesKey<'_> {
    fn equivalent(&self, key: &Arc<GroupBoundaries>) -> bool {
        *self.update == key.update_indices
            && *self.clear == key.clear_indices
            && self.first_group == key.first_group
            && self.last_group == key.last_group
    }
}

/// Deduplication table owned by one AST.
#[derive(Debug, Default)]
pub(crate) struct BoundariesTable {
    entries: IndexSet<Arc<GroupBoundaries>>,
}

impl BoundariesTable {
    pub(crate) fn intern(
        &mut self,
        update: &CompactBitSet,
        clear: &CompactBitSet,
        first_group: Option<u32>,
        last_group: Option<u32>,
    ) -> Arc<GroupBoundaries> {
        if update.is_empty() && clear.is_empty() && first_group.is_none() && last_group.is_none() {
            return GroupBoundaries::empty();
        }
        let key = BoundariesKey {
            update,
            clear,
            first_group,
            last_group,
        };
        if let Some(existing) = self.entries.get(&key) {
            return Arc::clone(existing);
        }
        let created = Arc::new(GroupBoundaries::new(
            update.clone(),
            clear.clone(),
            first_group,
            last_group,
        ));
        self.entries.insert(Arc::clone(&created));
        created
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
