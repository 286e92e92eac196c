//! Key identifiers and the 7-bit key set decoded from input bitmasks.

use std::fmt;

/// Number of key flags carried by an input bitmask.
pub const KEY_COUNT: usize = 7;

const KEY_MASK: u32 = (1 << KEY_COUNT) - 1;

/// Identifier of a physical key, in `1..=7`.
///
/// Key `n` corresponds to bit `n - 1` of an input bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct KeyId(u8);

impl KeyId {
    /// Creates a key id, returning `None` outside `1..=7`.
    ///
    /// ```
    /// use lauread_core::KeyId;
    ///
    /// assert_eq!(KeyId::new(3).map(KeyId::get), Some(3));
    /// assert!(KeyId::new(0).is_none());
    /// assert!(KeyId::new(8).is_none());
    /// ```
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if id >= 1 && id as usize <= KEY_COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Returns the numeric key id.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the zero-based slot index of this key.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Returns the key id stored in the given zero-based slot.
    ///
    /// # Panics
    ///
    /// Panics if `index >= KEY_COUNT`.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        assert!(index < KEY_COUNT);
        Self(index as u8 + 1)
    }

    /// Iterates all key ids in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..KEY_COUNT).map(Self::from_index)
    }
}

/// Set of keys held down at one sampled instant.
///
/// Only the lowest [`KEY_COUNT`] bits of a bitmask are meaningful; higher
/// bits are dropped when the set is built.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySet(u8);

impl KeySet {
    /// An empty key set.
    pub const EMPTY: Self = Self(0);

    /// Decodes a raw input bitmask.
    ///
    /// ```
    /// use lauread_core::{KeyId, KeySet};
    ///
    /// let keys = KeySet::from_bitmask(0b1000_0101);
    /// let ids: Vec<u8> = keys.iter().map(KeyId::get).collect();
    /// assert_eq!(ids, vec![1, 3]);
    /// ```
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_bitmask(bitmask: u32) -> Self {
        Self((bitmask & KEY_MASK) as u8)
    }

    /// Returns the masked bit pattern.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, key: KeyId) -> bool {
        self.0 & (1 << key.index()) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the keys in the set in ascending id order.
    pub fn iter(self) -> impl Iterator<Item = KeyId> {
        KeyId::all().filter(move |key| self.contains(*key))
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(KeyId::get)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_id_index_roundtrip() {
        for key in KeyId::all() {
            assert_eq!(KeyId::from_index(key.index()), key);
        }
        assert_eq!(KeyId::all().count(), KEY_COUNT);
    }

    #[test]
    fn test_bits_beyond_seven_are_ignored() {
        let keys = KeySet::from_bitmask(0xFFFF_FF80);
        assert!(keys.is_empty());

        let keys = KeySet::from_bitmask(0x1FF);
        assert_eq!(keys.len(), 7);
        assert_eq!(keys.bits(), 0x7F);
    }

    #[test]
    fn test_contains() {
        let keys = KeySet::from_bitmask(0b100_0010);
        assert!(keys.contains(KeyId::new(2).unwrap()));
        assert!(keys.contains(KeyId::new(7).unwrap()));
        assert!(!keys.contains(KeyId::new(1).unwrap()));
    }
}
