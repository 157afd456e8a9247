//! # Signatures
//!
//! A fixed-width bitset over component ids. Signatures are the key of the
//! archetype map: two archetypes never share one.

use std::fmt;

use crate::constants::{ComponentId, MAX_COMPONENTS};

const WORDS: usize = MAX_COMPONENTS / 64;

/// Set of component ids.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    words: [u64; WORDS],
}

impl Signature {
    /// The empty signature.
    pub const EMPTY: Self = Self { words: [0; WORDS] };

    #[inline]
    const fn split(id: ComponentId) -> (usize, u64) {
        let id = id as usize;
        (id / 64, 1u64 << (id % 64))
    }

    /// Builds a signature from a list of ids.
    #[must_use]
    pub fn from_ids(ids: &[ComponentId]) -> Self {
        ids.iter().fold(Self::EMPTY, |signature, &id| signature.with(id))
    }

    /// Enables `id`.
    #[inline]
    pub fn set(&mut self, id: ComponentId) {
        let (word, bit) = Self::split(id);
        self.words[word] |= bit;
    }

    /// Disables `id`.
    #[inline]
    pub fn clear(&mut self, id: ComponentId) {
        let (word, bit) = Self::split(id);
        self.words[word] &= !bit;
    }

    /// Returns `true` if `id` is enabled.
    #[inline]
    #[must_use]
    pub const fn contains(&self, id: ComponentId) -> bool {
        let (word, bit) = Self::split(id);
        self.words[word] & bit != 0
    }

    /// Copy with `id` enabled.
    #[inline]
    #[must_use]
    pub fn with(mut self, id: ComponentId) -> Self {
        self.set(id);
        self
    }

    /// Copy with `id` disabled.
    #[inline]
    #[must_use]
    pub fn without(mut self, id: ComponentId) -> Self {
        self.clear(id);
        self
    }

    /// Returns `true` if no id is enabled.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Number of enabled ids.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Returns `true` if every id of `self` is enabled in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(&mine, &theirs)| mine & !theirs == 0)
    }

    /// Iterates over enabled ids in ascending order.
    #[must_use]
    pub fn iter(&self) -> SignatureIter {
        SignatureIter {
            words: self.words,
            word: 0,
        }
    }
}

impl<'a> IntoIterator for &'a Signature {
    type Item = ComponentId;
    type IntoIter = SignatureIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (n, id) in self.iter().enumerate() {
            if n > 0 {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
        }
        f.write_str("}")
    }
}

/// Ascending iterator over the ids of a [`Signature`].
#[derive(Clone, Debug)]
pub struct SignatureIter {
    words: [u64; WORDS],
    word: usize,
}

impl Iterator for SignatureIter {
    type Item = ComponentId;

    fn next(&mut self) -> Option<ComponentId> {
        while self.word < WORDS {
            let bits = self.words[self.word];
            if bits != 0 {
                let bit = bits.trailing_zeros() as usize;
                // Clear lowest set bit
                self.words[self.word] = bits & (bits - 1);
                return Some((self.word * 64 + bit) as ComponentId);
            }
            self.word += 1;
        }
        None
    }
}
