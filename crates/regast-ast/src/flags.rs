//! Per-node boolean facts.
//!
//! Flags are packed into a single `u32`, in the style of a token set: each
//! `Flag` discriminant is a bit position. Mutation goes through the accessor
//! layer on `Node`; the properties pass relies on these exact semantics.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Flag {
    /// Statically unable to contribute to any match.
    Dead = 0,
    /// Every live path through the node starts with a caret at path length 0.
    StartsWithCaret,
    /// Every live path through the node ends with a dollar.
    EndsWithDollar,
    HasCaret,
    HasDollar,
    HasLoops,
    HasQuantifiers,
    HasCaptureGroups,
    HasLookAheads,
    HasLookBehinds,
    HasBackReferences,
    HasAtomicGroups,
    HasAlternations,
    MayMatchEmptyString,
    /// Path contribution is exactly zero: the node only ever matches empty.
    AlwaysEmpty,
    /// Synthesized by the look-behind prefix rewrite.
    Prefix,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct NodeFlags(u32);

impl NodeFlags {
    pub const EMPTY: NodeFlags = NodeFlags(0);

    /// OR-combined facts inherited from live children.
    pub const PROPAGATING: NodeFlags = NodeFlags::new(&[
        Flag::HasCaret,
        Flag::HasDollar,
        Flag::HasLoops,
        Flag::HasQuantifiers,
        Flag::HasCaptureGroups,
        Flag::HasLookAheads,
        Flag::HasLookBehinds,
        Flag::HasBackReferences,
        Flag::HasAtomicGroups,
        Flag::HasAlternations,
    ]);

    /// AND-combined anchor domination facts.
    pub const ANCHORS: NodeFlags = NodeFlags::new(&[Flag::StartsWithCaret, Flag::EndsWithDollar]);

    #[inline]
    pub const fn new(flags: &[Flag]) -> Self {
        let mut bits = 0u32;
        let mut i = 0;
        while i < flags.len() {
            bits |= 1 << flags[i] as u8;
            i += 1;
        }
        NodeFlags(bits)
    }

    #[inline]
    pub const fn single(flag: Flag) -> Self {
        NodeFlags(1 << flag as u8)
    }

    #[inline]
    pub const fn contains(&self, flag: Flag) -> bool {
        self.0 & (1 << flag as u8) != 0
    }

    #[inline]
    pub fn set(&mut self, flag: Flag, value: bool) {
        if value {
            self.0 |= 1 << flag as u8;
        } else {
            self.0 &= !(1 << flag as u8);
        }
    }

    #[inline]
    pub const fn union(self, other: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | other.0)
    }

    #[inline]
    pub const fn intersection(self, other: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 & other.0)
    }

    #[inline]
    pub const fn without(self, other: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 & !other.0)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for NodeFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const ALL: [Flag; 16] = [
            Flag::Dead,
            Flag::StartsWithCaret,
            Flag::EndsWithDollar,
            Flag::HasCaret,
            Flag::HasDollar,
            Flag::HasLoops,
            Flag::HasQuantifiers,
            Flag::HasCaptureGroups,
            Flag::HasLookAheads,
            Flag::HasLookBehinds,
            Flag::HasBackReferences,
            Flag::HasAtomicGroups,
            Flag::HasAlternations,
            Flag::MayMatchEmptyString,
            Flag::AlwaysEmpty,
            Flag::Prefix,
        ];
        f.debug_set()
            .entries(ALL.iter().filter(|&&flag| self.contains(flag)))
            .finish()
    }
}
