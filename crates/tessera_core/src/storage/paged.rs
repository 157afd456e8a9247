//! # Paged Sparse Array
//!
//! A bounded key → value map that only allocates for key ranges in use.
//!
//! ```text
//! keys:   0 ........ 1023 | 1024 ...... 2047 | 2048 ...... 3071
//! pages:  [  page @0     ]        (none)       [  page @2048  ]
//! ```
//!
//! Pages are created on first write into their range and freed as soon as
//! their live count drops back to zero. Reads outside any page return the
//! null value without allocating.

use crate::error::{EcsError, EcsResult};

/// One fixed-size block of slots.
#[derive(Debug)]
struct Page<T> {
    /// First key covered by this page.
    start: u32,
    /// Slots holding a non-null value.
    live: u32,
    /// `page_size` slots, null when empty.
    slots: Box<[T]>,
}

/// A sparse array over `[0, max_len)` backed by lazily allocated pages.
///
/// `null` marks empty slots and is never stored as a live value.
#[derive(Debug)]
pub struct PagedArray<T: Copy + PartialEq> {
    /// Allocated pages, sorted by `start`.
    pages: Vec<Page<T>>,
    /// Keys per page.
    page_size: u32,
    /// Size of the key domain.
    max_len: u32,
    /// Value reported for absent keys.
    null: T,
}

impl<T: Copy + PartialEq> PagedArray<T> {
    /// Creates an empty array over `[0, max_len)`.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is zero.
    #[must_use]
    pub fn new(max_len: u32, page_size: u32, null: T) -> Self {
        assert!(page_size > 0, "Page size must be greater than zero");
        Self {
            pages: Vec::new(),
            page_size,
            max_len,
            null,
        }
    }

    /// Returns the null value.
    #[inline]
    #[must_use]
    pub fn null(&self) -> T {
        self.null
    }

    /// Returns the size of the key domain.
    #[inline]
    #[must_use]
    pub const fn max_len(&self) -> u32 {
        self.max_len
    }

    /// Returns the number of keys per page.
    #[inline]
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the number of allocated pages.
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Returns the number of keys holding a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.iter().map(|page| page.live as usize).sum()
    }

    /// Returns `true` if no key holds a value.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[inline]
    fn page_start(&self, key: u32) -> u32 {
        key / self.page_size * self.page_size
    }

    #[inline]
    fn find_page(&self, start: u32) -> Result<usize, usize> {
        self.pages.binary_search_by_key(&start, |page| page.start)
    }

    fn check_range(&self, key: u32) -> EcsResult<()> {
        if key < self.max_len {
            Ok(())
        } else {
            Err(EcsError::KeyOutOfRange {
                key,
                max: self.max_len,
            })
        }
    }

    /// Returns the value at `key`, or the null value if none is stored.
    ///
    /// Never allocates.
    #[must_use]
    pub fn get(&self, key: u32) -> T {
        let start = self.page_start(key);
        match self.find_page(start) {
            Ok(page_index) => self.pages[page_index].slots[(key - start) as usize],
            Err(_) => self.null,
        }
    }

    /// Returns `true` if `key` holds a value.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: u32) -> bool {
        self.get(key) != self.null
    }

    /// Returns a mutable reference to the value at `key`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::MissingPage`] if no page covers `key`.
    /// - [`EcsError::MissingKey`] if the slot is empty.
    pub fn get_mut(&mut self, key: u32) -> EcsResult<&mut T> {
        let start = self.page_start(key);
        let page_index = self.find_page(start).map_err(|_| EcsError::MissingPage(key))?;
        let null = self.null;
        let slot = &mut self.pages[page_index].slots[(key - start) as usize];
        if *slot == null {
            return Err(EcsError::MissingKey(key));
        }
        Ok(slot)
    }

    /// Stores `value` at `key`, allocating its page if needed.
    ///
    /// Returns the previous value, if any. Storing the null value removes
    /// the key.
    ///
    /// # Errors
    ///
    /// [`EcsError::KeyOutOfRange`] if `key >= max_len`.
    pub fn insert(&mut self, key: u32, value: T) -> EcsResult<Option<T>> {
        self.check_range(key)?;
        if value == self.null {
            return Ok(self.remove(key).ok());
        }

        let start = self.page_start(key);
        let page_index = match self.find_page(start) {
            Ok(page_index) => page_index,
            Err(insert_at) => {
                let page = Page {
                    start,
                    live: 0,
                    slots: vec![self.null; self.page_size as usize].into_boxed_slice(),
                };
                self.pages.insert(insert_at, page);
                insert_at
            }
        };

        let page = &mut self.pages[page_index];
        let slot = &mut page.slots[(key - start) as usize];
        let previous = std::mem::replace(slot, value);
        if previous == self.null {
            page.live += 1;
            Ok(None)
        } else {
            Ok(Some(previous))
        }
    }

    /// Clears the value at `key`, freeing its page if it became empty.
    ///
    /// # Errors
    ///
    /// - [`EcsError::MissingPage`] if no page covers `key`.
    /// - [`EcsError::MissingKey`] if the slot is already empty.
    pub fn remove(&mut self, key: u32) -> EcsResult<T> {
        let start = self.page_start(key);
        let page_index = self.find_page(start).map_err(|_| EcsError::MissingPage(key))?;

        let page = &mut self.pages[page_index];
        let slot = &mut page.slots[(key - start) as usize];
        if *slot == self.null {
            return Err(EcsError::MissingKey(key));
        }

        let value = std::mem::replace(slot, self.null);
        page.live -= 1;
        if page.live == 0 {
            self.pages.remove(page_index);
        }
        Ok(value)
    }

    /// Frees every page.
    pub fn clear(&mut self) {
        self.pages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NULL: u32 = u32::MAX;

    #[test]
    fn test_reads_do_not_allocate() {
        let array = PagedArray::new(100, 3, NULL);
        assert_eq!(array.get(50), NULL);
        assert_eq!(array.page_count(), 0);
    }

    #[test]
    fn test_pages_created_lazily() {
        let mut array = PagedArray::new(100, 3, NULL);
        array.insert(0, 0xa).unwrap();
        array.insert(1, 0xb).unwrap();
        array.insert(2, 0xc).unwrap();
        assert_eq!(array.page_count(), 1);

        array.insert(7, 0x1).unwrap();
        assert_eq!(array.page_count(), 2);
        assert_eq!(array.get(7), 0x1);
        assert_eq!(array.get(6), NULL);
        assert_eq!(array.len(), 4);
    }

    #[test]
    fn test_pages_freed_when_empty() {
        let mut array = PagedArray::new(100, 3, NULL);
        for key in 0..6 {
            array.insert(key, key + 10).unwrap();
        }
        assert_eq!(array.page_count(), 2);

        array.remove(0).unwrap();
        array.remove(1).unwrap();
        assert_eq!(array.page_count(), 2);
        array.remove(2).unwrap();
        assert_eq!(array.page_count(), 1);

        array.insert(0, 0xb).unwrap();
        assert_eq!(array.get(0), 0xb);
        assert_eq!(array.get(4), 14);
    }

    #[test]
    fn test_pages_stay_sorted() {
        let mut array = PagedArray::new(1000, 10, NULL);
        for key in [500, 20, 990, 0, 250] {
            array.insert(key, key).unwrap();
        }
        for key in [500, 20, 990, 0, 250] {
            assert_eq!(array.get(key), key);
        }
        assert_eq!(array.page_count(), 5);
    }

    #[test]
    fn test_overwrite_keeps_live_count() {
        let mut array = PagedArray::new(10, 4, NULL);
        assert_eq!(array.insert(1, 5).unwrap(), None);
        assert_eq!(array.insert(1, 6).unwrap(), Some(5));
        assert_eq!(array.len(), 1);

        array.remove(1).unwrap();
        assert_eq!(array.page_count(), 0);
    }

    #[test]
    fn test_missing_storage_is_fatal() {
        let mut array = PagedArray::new(10, 4, NULL);
        let err = array.remove(3).unwrap_err();
        assert_eq!(err, EcsError::MissingPage(3));
        assert!(err.is_fatal());

        array.insert(0, 1).unwrap();
        assert_eq!(array.remove(3).unwrap_err(), EcsError::MissingKey(3));
        assert_eq!(array.get_mut(9).unwrap_err(), EcsError::MissingPage(9));
    }

    #[test]
    fn test_out_of_range() {
        let mut array = PagedArray::new(10, 4, NULL);
        assert_eq!(
            array.insert(10, 1).unwrap_err(),
            EcsError::KeyOutOfRange { key: 10, max: 10 }
        );
    }

    #[test]
    fn test_get_mut_writes_through() {
        let mut array = PagedArray::new(10, 4, NULL);
        array.insert(5, 1).unwrap();
        *array.get_mut(5).unwrap() = 2;
        assert_eq!(array.get(5), 2);
    }
}
