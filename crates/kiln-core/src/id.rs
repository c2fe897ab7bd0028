//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a registered material.
///
/// Ids are assigned sequentially by the registry starting at 1.
/// `MaterialId(0)` is reserved for empty space ("air").
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MaterialId(pub u16);

impl MaterialId {
    /// The reserved empty/air id.
    pub const EMPTY: MaterialId = MaterialId(0);

    /// Whether this is the empty/air id.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The id as an index into per-material lookup tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for MaterialId {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Monotonically increasing step counter.
///
/// Incremented each time the engine commits a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Key of a dirty-tracking chunk, packed as `(chunk_y << 16) | chunk_x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey(pub u32);

impl ChunkKey {
    /// Pack chunk coordinates. Each axis keeps its low 16 bits.
    #[inline]
    pub fn new(chunk_x: u32, chunk_y: u32) -> Self {
        Self(((chunk_y & 0xFFFF) << 16) | (chunk_x & 0xFFFF))
    }

    /// Chunk column.
    #[inline]
    pub fn chunk_x(self) -> u32 {
        self.0 & 0xFFFF
    }

    /// Chunk row.
    #[inline]
    pub fn chunk_y(self) -> u32 {
        self.0 >> 16
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.chunk_x(), self.chunk_y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_id_is_zero() {
        assert!(MaterialId::EMPTY.is_empty());
        assert!(!MaterialId(1).is_empty());
        assert_eq!(MaterialId(7).index(), 7);
    }

    #[test]
    fn chunk_key_layout_matches_packed_form() {
        let key = ChunkKey::new(3, 2);
        assert_eq!(key.0, (2 << 16) | 3);
        assert_eq!(key.to_string(), "(3, 2)");
    }

    proptest! {
        #[test]
        fn chunk_key_unpacks_what_it_packs(cx in 0u32..=0xFFFF, cy in 0u32..=0xFFFF) {
            let key = ChunkKey::new(cx, cy);
            prop_assert_eq!(key.chunk_x(), cx);
            prop_assert_eq!(key.chunk_y(), cy);
        }
    }
}
