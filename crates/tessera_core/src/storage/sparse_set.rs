//! # Sparse Set
//!
//! Packed values addressed by a sparse key.
//!
//! ```text
//! sparse (paged):  key 7 -> 0   key 3 -> 1   key 12 -> 2
//! dense:           [ v7,          v3,          v12 ]
//! ```
//!
//! Lookup, push and erase are O(1). Erase swaps the last dense value into
//! the hole, so dense order is insertion order only until the first erase.

use crate::error::{EcsError, EcsResult};
use crate::storage::paged::PagedArray;

/// Extracts the sparse key a value is stored under.
pub trait SparseKey {
    /// The key of this value. Must not change while the value is stored.
    fn sparse_key(&self) -> u32;
}

/// Sentinel dense index for absent keys.
const ABSENT: u32 = u32::MAX;

/// A key → value map with densely packed values.
///
/// Invariant: for every present key `k`, `dense[sparse[k]].sparse_key() == k`,
/// and `dense` has no gaps.
#[derive(Debug)]
pub struct SparseSet<V: SparseKey> {
    /// Packed values.
    dense: Vec<V>,
    /// Key → index into `dense`.
    sparse: PagedArray<u32>,
}

impl<V: SparseKey> SparseSet<V> {
    /// Creates an empty set over keys `[0, max_keys)`.
    #[must_use]
    pub fn new(max_keys: u32, page_size: u32) -> Self {
        Self {
            dense: Vec::new(),
            sparse: PagedArray::new(max_keys, page_size, ABSENT),
        }
    }

    /// Returns the number of stored values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if nothing is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns the dense position of `key`, if present.
    #[inline]
    #[must_use]
    pub fn index_of(&self, key: u32) -> Option<usize> {
        match self.sparse.get(key) {
            ABSENT => None,
            index => Some(index as usize),
        }
    }

    /// Returns `true` if `key` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: u32) -> bool {
        self.index_of(key).is_some()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: u32) -> Option<&V> {
        self.index_of(key).map(|index| &self.dense[index])
    }

    /// Returns the value stored under `key` mutably.
    ///
    /// The value's key must not be changed through this reference.
    pub fn get_mut(&mut self, key: u32) -> Option<&mut V> {
        let index = self.index_of(key)?;
        Some(&mut self.dense[index])
    }

    /// Appends `value` and maps its key to the new dense slot.
    ///
    /// Returns the dense index.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DuplicateKey`] if the key is already present.
    /// - [`EcsError::KeyOutOfRange`] if the key is outside the domain.
    pub fn push(&mut self, value: V) -> EcsResult<usize> {
        let key = value.sparse_key();
        if self.contains(key) {
            return Err(EcsError::DuplicateKey(key));
        }

        let index = self.dense.len();
        self.sparse.insert(key, index as u32)?;
        self.dense.push(value);
        Ok(index)
    }

    /// Removes and returns the value stored under `key`.
    ///
    /// The last dense value moves into the vacated slot.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingPage`] or [`EcsError::MissingKey`] if `key` is
    /// not present.
    pub fn erase(&mut self, key: u32) -> EcsResult<V> {
        let index = self.sparse.remove(key)? as usize;
        let value = self.dense.swap_remove(index);

        if let Some(moved) = self.dense.get(index) {
            *self.sparse.get_mut(moved.sparse_key())? = index as u32;
        }
        Ok(value)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.sparse.clear();
    }

    /// Returns the packed values in dense order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[V] {
        &self.dense
    }

    /// Iterates over the packed values in dense order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.dense.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Item {
        key: u32,
        payload: i64,
    }

    impl SparseKey for Item {
        fn sparse_key(&self) -> u32 {
            self.key
        }
    }

    fn item(key: u32) -> Item {
        Item {
            key,
            payload: i64::from(key) * 10,
        }
    }

    fn assert_consistent(set: &SparseSet<Item>) {
        for (index, value) in set.iter().enumerate() {
            assert_eq!(set.index_of(value.key), Some(index));
        }
    }

    #[test]
    fn test_push_and_get() {
        let mut set = SparseSet::new(100, 8);
        assert_eq!(set.push(item(7)).unwrap(), 0);
        assert_eq!(set.push(item(3)).unwrap(), 1);

        assert_eq!(set.get(7).unwrap().payload, 70);
        assert_eq!(set.get(3).unwrap().payload, 30);
        assert!(set.get(4).is_none());
        assert_consistent(&set);
    }

    #[test]
    fn test_erase_swaps_last_in() {
        let mut set = SparseSet::new(100, 8);
        for key in [1, 2, 3, 4] {
            set.push(item(key)).unwrap();
        }

        let removed = set.erase(2).unwrap();
        assert_eq!(removed.key, 2);
        assert_eq!(set.len(), 3);
        assert_eq!(set.as_slice()[1].key, 4);
        assert!(!set.contains(2));
        assert_consistent(&set);
    }

    #[test]
    fn test_erase_last() {
        let mut set = SparseSet::new(100, 8);
        set.push(item(1)).unwrap();
        set.push(item(2)).unwrap();

        set.erase(2).unwrap();
        assert_eq!(set.len(), 1);
        assert_consistent(&set);

        set.erase(1).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_erase_missing_is_fatal() {
        let mut set: SparseSet<Item> = SparseSet::new(100, 8);
        let err = set.erase(5).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut set = SparseSet::new(100, 8);
        set.push(item(9)).unwrap();
        assert_eq!(set.push(item(9)).unwrap_err(), EcsError::DuplicateKey(9));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_keys_across_pages() {
        let mut set = SparseSet::new(10_000, 16);
        for key in [0, 17, 4_000, 9_999] {
            set.push(item(key)).unwrap();
        }
        set.erase(0).unwrap();
        set.erase(4_000).unwrap();

        assert_eq!(set.get(17).unwrap().payload, 170);
        assert_eq!(set.get(9_999).unwrap().payload, 99_990);
        assert_consistent(&set);
    }
}
