//! # Component Arrays
//!
//! A growable, type-erased column of one component type.
//!
//! The column owns a raw byte buffer sized in units of its element size and
//! drives every element lifetime through its bound [`ComponentOps`]:
//!
//! ```text
//! | live 0 | live 1 | ... | live len-1 | uninit ... | uninit cap-1 |
//! ```
//!
//! ## Invariants
//!
//! - `len <= capacity`.
//! - Slots `< len` hold constructed values of the bound type.
//! - Slots `>= len` are uninitialized and never read or dropped.
//! - The buffer is aligned for the bound type; zero-sized types never
//!   allocate.
//!
//! ## Growth
//!
//! When an index at or past `capacity` is needed the column grows to
//! `max(capacity + capacity / 2 + 1, index + 1)` and bulk-moves the live
//! prefix, giving O(1) amortized pushes.
//!
//! ## Anomalies
//!
//! A column holds no diagnostic sink. A `reserve` below the current
//! capacity and a `rebind` are logged through `tracing` at DEBUG only, and
//! `reserve` returns `false` when it changed nothing. Failures come back as
//! [`EcsError`] for the registry to report.

// SAFETY: This module manages a raw allocation through type-erased
// operation tables. Every unsafe block states which invariant it relies on.
#![allow(unsafe_code)]

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::any::type_name;
use std::fmt;
use std::ptr::{self, NonNull};
use std::slice;

use super::ops::{Component, ComponentOps};
use crate::error::{EcsError, EcsResult};

/// A type-erased, densely packed column of components.
///
/// # Example
///
/// ```rust
/// use tessera_core::component::{ComponentArray, ComponentOps};
///
/// let mut column = ComponentArray::new(ComponentOps::of::<f32>());
/// column.push(1.5f32).unwrap();
/// column.push(2.5f32).unwrap();
/// column.erase(0).unwrap();
/// assert_eq!(column.as_slice::<f32>().unwrap(), &[2.5]);
/// ```
pub struct ComponentArray {
    /// Start of the buffer; dangling (but aligned) while `capacity == 0`.
    data: NonNull<u8>,
    /// Live elements.
    len: usize,
    /// Allocated elements.
    capacity: usize,
    /// Operations of the bound type.
    ops: ComponentOps,
}

impl ComponentArray {
    /// Creates an empty column bound to the type described by `ops`.
    #[must_use]
    pub fn new(ops: ComponentOps) -> Self {
        Self {
            data: dangling(ops.layout()),
            len: 0,
            capacity: 0,
            ops,
        }
    }

    /// Creates an empty column with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(ops: ComponentOps, capacity: usize) -> Self {
        let mut column = Self::new(ops);
        column.reserve(capacity);
        column
    }

    /// Returns the number of live elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the column holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated elements.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if `index` addresses a live element.
    #[inline]
    #[must_use]
    pub const fn within_bounds(&self, index: usize) -> bool {
        index < self.len
    }

    /// Returns the operation table of the bound type.
    #[inline]
    #[must_use]
    pub const fn ops(&self) -> &ComponentOps {
        &self.ops
    }

    /// Name of the bound type.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.ops.name()
    }

    fn check_type<T: Component>(&self) -> EcsResult<()> {
        if self.ops.is::<T>() {
            Ok(())
        } else {
            Err(EcsError::TypeMismatch {
                expected: self.ops.name(),
                found: type_name::<T>(),
            })
        }
    }

    fn check_index(&self, index: usize) -> EcsResult<()> {
        if self.within_bounds(index) {
            Ok(())
        } else {
            Err(EcsError::IndexOutOfBounds {
                index,
                len: self.len,
            })
        }
    }

    fn check_same_type(&self, other: &Self) -> EcsResult<()> {
        if self.ops.type_id() == other.ops.type_id() {
            Ok(())
        } else {
            Err(EcsError::TypeMismatch {
                expected: other.ops.name(),
                found: self.ops.name(),
            })
        }
    }

    /// Address of slot `index`.
    ///
    /// Callers only dereference slots `< capacity`.
    #[inline]
    fn slot(&self, index: usize) -> *mut u8 {
        // SAFETY: callers pass indices within the allocation (or one past
        // the last live element with capacity already ensured).
        unsafe { self.ops.at(self.data.as_ptr(), index) }
    }

    fn buffer_layout(&self, capacity: usize) -> Layout {
        let element = self.ops.layout();
        let size = element
            .size()
            .checked_mul(capacity)
            .unwrap_or_else(|| panic!("capacity overflow for {}", self.ops.name()));
        Layout::from_size_align(size, element.align())
            .unwrap_or_else(|_| panic!("capacity overflow for {}", self.ops.name()))
    }

    /// Grows the buffer to exactly `new_capacity` elements and returns
    /// `true` if the capacity changed.
    ///
    /// Requests at or below the current capacity are ignored.
    pub fn reserve(&mut self, new_capacity: usize) -> bool {
        if new_capacity <= self.capacity {
            if new_capacity < self.capacity {
                tracing::debug!(
                    component = self.ops.name(),
                    requested = new_capacity,
                    capacity = self.capacity,
                    "reserve below current capacity ignored"
                );
            }
            return false;
        }

        if self.ops.size() == 0 {
            self.capacity = new_capacity;
            return true;
        }

        let new_layout = self.buffer_layout(new_capacity);
        // SAFETY: `new_layout` has non-zero size (element size and capacity
        // are both non-zero).
        let new_data = unsafe { alloc(new_layout) };
        let Some(new_data) = NonNull::new(new_data) else {
            handle_alloc_error(new_layout);
        };

        if self.capacity > 0 {
            let old_layout = self.buffer_layout(self.capacity);
            // SAFETY: the first `len` old slots are live and the new buffer
            // is a fresh, larger allocation. After the move the old slots
            // are uninit, so freeing the old buffer drops nothing.
            unsafe {
                self.ops
                    .move_range(self.data.as_ptr(), new_data.as_ptr(), self.len);
                dealloc(self.data.as_ptr(), old_layout);
            }
        }

        self.data = new_data;
        self.capacity = new_capacity;
        true
    }

    /// Ensures slot `index` is allocated, growing by roughly 3/2.
    fn fit_to(&mut self, index: usize) {
        if index < self.capacity {
            return;
        }
        let three_halves = self.capacity + (self.capacity >> 1) + 1;
        self.reserve(three_halves.max(index + 1));
    }

    /// Appends a value, returning its index.
    ///
    /// # Errors
    ///
    /// [`EcsError::TypeMismatch`] if `T` is not the bound type.
    pub fn push<T: Component>(&mut self, value: T) -> EcsResult<usize> {
        self.check_type::<T>()?;
        self.fit_to(self.len);

        let index = self.len;
        // SAFETY: `fit_to` made slot `len` allocated; it is uninit and
        // aligned for `T`, which is the bound type.
        unsafe {
            self.slot(index).cast::<T>().write(value);
        }
        self.len += 1;
        Ok(index)
    }

    /// Returns a reference to element `index`.
    ///
    /// # Errors
    ///
    /// [`EcsError::TypeMismatch`] or [`EcsError::IndexOutOfBounds`].
    pub fn get<T: Component>(&self, index: usize) -> EcsResult<&T> {
        self.check_type::<T>()?;
        self.check_index(index)?;
        // SAFETY: slot `index` is live and holds a `T`.
        Ok(unsafe { &*self.slot(index).cast::<T>() })
    }

    /// Returns a mutable reference to element `index`.
    ///
    /// # Errors
    ///
    /// [`EcsError::TypeMismatch`] or [`EcsError::IndexOutOfBounds`].
    pub fn get_mut<T: Component>(&mut self, index: usize) -> EcsResult<&mut T> {
        self.check_type::<T>()?;
        self.check_index(index)?;
        // SAFETY: slot `index` is live and holds a `T`; `&mut self` makes
        // the borrow unique.
        Ok(unsafe { &mut *self.slot(index).cast::<T>() })
    }

    /// Returns the live elements as a typed slice.
    ///
    /// # Errors
    ///
    /// [`EcsError::TypeMismatch`] if `T` is not the bound type.
    pub fn as_slice<T: Component>(&self) -> EcsResult<&[T]> {
        self.check_type::<T>()?;
        // SAFETY: the buffer is aligned for `T`, non-null, and its first
        // `len` slots are live `T`s.
        Ok(unsafe { slice::from_raw_parts(self.data.as_ptr().cast::<T>(), self.len) })
    }

    /// Returns the live elements as a mutable typed slice.
    ///
    /// # Errors
    ///
    /// [`EcsError::TypeMismatch`] if `T` is not the bound type.
    pub fn as_mut_slice<T: Component>(&mut self) -> EcsResult<&mut [T]> {
        self.check_type::<T>()?;
        // SAFETY: as `as_slice`, and `&mut self` makes the borrow unique.
        Ok(unsafe { slice::from_raw_parts_mut(self.data.as_ptr().cast::<T>(), self.len) })
    }

    /// Overwrites element `index`, returning the previous value.
    ///
    /// # Errors
    ///
    /// [`EcsError::TypeMismatch`] or [`EcsError::IndexOutOfBounds`].
    pub fn replace<T: Component>(&mut self, index: usize, value: T) -> EcsResult<T> {
        Ok(std::mem::replace(self.get_mut::<T>(index)?, value))
    }

    /// Drops the last element.
    ///
    /// # Errors
    ///
    /// [`EcsError::IndexOutOfBounds`] if the column is empty.
    pub fn pop(&mut self) -> EcsResult<()> {
        if self.is_empty() {
            return Err(EcsError::IndexOutOfBounds { index: 0, len: 0 });
        }
        self.len -= 1;
        // SAFETY: slot `len` was the last live element and is now outside
        // the live prefix, so it is dropped exactly once.
        unsafe {
            self.ops.destroy(self.slot(self.len));
        }
        Ok(())
    }

    /// Drops element `index` and moves the last element into its slot.
    ///
    /// # Errors
    ///
    /// [`EcsError::IndexOutOfBounds`] if `index >= len`.
    pub fn erase(&mut self, index: usize) -> EcsResult<()> {
        self.check_index(index)?;
        let last = self.len - 1;
        // SAFETY: both slots are live; afterwards slot `last` is uninit and
        // falls outside the shrunk live prefix.
        unsafe {
            self.ops.swap_remove(self.slot(index), self.slot(last));
        }
        self.len = last;
        Ok(())
    }

    /// Moves element `index` out and moves the last element into its slot.
    ///
    /// # Errors
    ///
    /// [`EcsError::TypeMismatch`] or [`EcsError::IndexOutOfBounds`].
    pub fn remove<T: Component>(&mut self, index: usize) -> EcsResult<T> {
        self.check_type::<T>()?;
        self.check_index(index)?;
        let last = self.len - 1;
        // SAFETY: slot `index` is a live `T`; reading it leaves it uninit,
        // then the live last element (if different) fills it.
        let value = unsafe {
            let value = self.slot(index).cast::<T>().read();
            if index != last {
                self.ops.move_to(self.slot(last), self.slot(index));
            }
            value
        };
        self.len = last;
        Ok(value)
    }

    /// Moves element `index` to the end of `other`, then fills the hole
    /// with this column's last element.
    ///
    /// Returns the element's index in `other`. This is the migration
    /// primitive: data changes column without being copied or cloned.
    ///
    /// # Errors
    ///
    /// [`EcsError::TypeMismatch`] if the columns are bound to different
    /// types, [`EcsError::IndexOutOfBounds`] if `index >= len`.
    pub fn transfer_index_to_end_of(&mut self, index: usize, other: &mut Self) -> EcsResult<usize> {
        self.check_same_type(other)?;
        self.check_index(index)?;
        other.fit_to(other.len);

        let last = self.len - 1;
        let destination = other.len;
        // SAFETY: slot `index` is live here, slot `destination` is allocated
        // and uninit in `other`, and the two buffers are distinct because
        // `&mut` references cannot alias. The hole left at `index` is then
        // filled from the live last slot.
        unsafe {
            self.ops.move_to(self.slot(index), other.slot(destination));
            if index != last {
                self.ops.move_to(self.slot(last), self.slot(index));
            }
        }

        self.len = last;
        other.len += 1;
        Ok(destination)
    }

    /// Clones element `index` onto the end of `other`.
    ///
    /// Returns the clone's index in `other`.
    ///
    /// # Errors
    ///
    /// [`EcsError::NotCloneable`] if the bound type has no clone entries,
    /// [`EcsError::TypeMismatch`] or [`EcsError::IndexOutOfBounds`].
    pub fn clone_index_to_end_of(&self, index: usize, other: &mut Self) -> EcsResult<usize> {
        self.check_same_type(other)?;
        self.check_index(index)?;
        if !self.ops.is_cloneable() {
            return Err(EcsError::NotCloneable(self.ops.name()));
        }
        other.fit_to(other.len);

        let destination = other.len;
        // SAFETY: source slot is live, destination slot is allocated and
        // uninit, buffers are distinct.
        unsafe {
            self.ops.clone_to(self.slot(index), other.slot(destination));
        }
        other.len += 1;
        Ok(destination)
    }

    /// Clones element `index` onto the end of this same column.
    ///
    /// Returns the clone's index.
    ///
    /// # Errors
    ///
    /// [`EcsError::NotCloneable`] or [`EcsError::IndexOutOfBounds`].
    pub fn clone_index_to_end(&mut self, index: usize) -> EcsResult<usize> {
        self.check_index(index)?;
        if !self.ops.is_cloneable() {
            return Err(EcsError::NotCloneable(self.ops.name()));
        }
        self.fit_to(self.len);

        let destination = self.len;
        // SAFETY: growth happened before taking either address; the source
        // slot is live, the destination is allocated, uninit and distinct.
        unsafe {
            self.ops.clone_to(self.slot(index), self.slot(destination));
        }
        self.len += 1;
        Ok(destination)
    }

    /// Exchanges elements `a` and `b`.
    ///
    /// # Errors
    ///
    /// [`EcsError::IndexOutOfBounds`] if either index is not live.
    pub fn swap(&mut self, a: usize, b: usize) -> EcsResult<()> {
        self.check_index(a)?;
        self.check_index(b)?;
        // SAFETY: both slots are live.
        unsafe {
            self.ops.swap(self.slot(a), self.slot(b));
        }
        Ok(())
    }

    /// Drops every element, keeping the allocation.
    pub fn clear(&mut self) {
        let len = std::mem::replace(&mut self.len, 0);
        // SAFETY: the first `len` slots were live; `len` is already zero so
        // a panicking destructor cannot cause a second drop.
        unsafe {
            self.ops.destroy_range(self.data.as_ptr(), len);
        }
    }

    /// Drops every element, frees the buffer and binds a new type.
    pub fn rebind(&mut self, ops: ComponentOps) {
        tracing::debug!(
            from = self.ops.name(),
            to = ops.name(),
            dropped = self.len,
            "rebinding component array"
        );
        self.release();
        self.data = dangling(ops.layout());
        self.ops = ops;
    }

    /// Bulk-clones the whole column.
    ///
    /// # Errors
    ///
    /// [`EcsError::NotCloneable`] if the bound type has no clone entries.
    pub fn try_clone(&self) -> EcsResult<Self> {
        if !self.ops.is_cloneable() {
            return Err(EcsError::NotCloneable(self.ops.name()));
        }

        let mut copy = Self::with_capacity(self.ops, self.len);
        // SAFETY: the first `len` source slots are live, the copy has room
        // for `len` uninit slots. `len` is set only once all are written.
        unsafe {
            self.ops
                .clone_range(self.data.as_ptr(), copy.data.as_ptr(), self.len);
        }
        copy.len = self.len;
        Ok(copy)
    }

    /// Drops every element and frees the buffer.
    fn release(&mut self) {
        self.clear();
        if self.capacity > 0 && self.ops.size() > 0 {
            let layout = self.buffer_layout(self.capacity);
            // SAFETY: the buffer was allocated with this exact layout and
            // holds no live elements anymore.
            unsafe {
                dealloc(self.data.as_ptr(), layout);
            }
        }
        self.data = dangling(self.ops.layout());
        self.capacity = 0;
    }
}

impl Drop for ComponentArray {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ComponentArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentArray")
            .field("type", &self.ops.name())
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// A non-null pointer aligned for `layout`, for empty buffers.
fn dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: alignments are non-zero powers of two.
    unsafe { NonNull::new_unchecked(ptr::null_mut::<u8>().wrapping_add(layout.align())) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn strings(values: &[&str]) -> ComponentArray {
        let mut column = ComponentArray::new(ComponentOps::cloneable::<String>());
        for value in values {
            column.push((*value).to_string()).unwrap();
        }
        column
    }

    #[test]
    fn test_push_and_get() {
        let mut column = ComponentArray::new(ComponentOps::of::<i32>());
        assert_eq!(column.push(5i32).unwrap(), 0);
        assert_eq!(column.push(7i32).unwrap(), 1);

        assert_eq!(*column.get::<i32>(0).unwrap(), 5);
        assert_eq!(*column.get::<i32>(1).unwrap(), 7);
        assert_eq!(column.len(), 2);
    }

    #[test]
    fn test_type_mismatch() {
        let mut column = ComponentArray::new(ComponentOps::of::<i32>());
        column.push(1i32).unwrap();

        assert!(matches!(column.push(1.0f32), Err(EcsError::TypeMismatch { .. })));
        assert!(matches!(column.get::<u32>(0), Err(EcsError::TypeMismatch { .. })));
        assert_eq!(column.len(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let column = ComponentArray::new(ComponentOps::of::<i32>());
        assert_eq!(
            column.get::<i32>(0).unwrap_err(),
            EcsError::IndexOutOfBounds { index: 0, len: 0 }
        );
    }

    #[test]
    fn test_growth_policy() {
        let mut column = ComponentArray::new(ComponentOps::of::<u8>());
        column.push(0u8).unwrap();
        assert_eq!(column.capacity(), 1);
        column.push(0u8).unwrap();
        assert_eq!(column.capacity(), 2);
        column.push(0u8).unwrap();
        assert_eq!(column.capacity(), 4);
        column.push(0u8).unwrap();
        column.push(0u8).unwrap();
        assert_eq!(column.capacity(), 7);
    }

    #[test]
    fn test_reserve_smaller_is_ignored() {
        let mut column = ComponentArray::with_capacity(ComponentOps::of::<u64>(), 10);
        assert!(!column.reserve(4));
        assert!(!column.reserve(10));
        assert_eq!(column.capacity(), 10);

        assert!(column.reserve(12));
        assert_eq!(column.capacity(), 12);
    }

    #[test]
    fn test_erase_swaps_last_in() {
        let mut column = strings(&["a", "b", "c", "d"]);
        column.erase(1).unwrap();

        assert_eq!(column.as_slice::<String>().unwrap(), &["a", "d", "c"]);
    }

    #[test]
    fn test_erase_last_element() {
        let mut column = strings(&["a", "b"]);
        column.erase(1).unwrap();
        assert_eq!(column.as_slice::<String>().unwrap(), &["a"]);

        column.erase(0).unwrap();
        assert!(column.is_empty());
        assert!(column.erase(0).is_err());
    }

    #[test]
    fn test_remove_returns_value() {
        let mut column = strings(&["a", "b", "c"]);
        assert_eq!(column.remove::<String>(0).unwrap(), "a");
        assert_eq!(column.as_slice::<String>().unwrap(), &["c", "b"]);
    }

    #[test]
    fn test_transfer_index_to_end_of() {
        let mut source = strings(&["a", "b", "c"]);
        let mut target = strings(&["x"]);

        let index = source.transfer_index_to_end_of(0, &mut target).unwrap();
        assert_eq!(index, 1);
        assert_eq!(source.as_slice::<String>().unwrap(), &["c", "b"]);
        assert_eq!(target.as_slice::<String>().unwrap(), &["x", "a"]);
    }

    #[test]
    fn test_transfer_rejects_other_type() {
        let mut source = strings(&["a"]);
        let mut target = ComponentArray::new(ComponentOps::of::<i32>());

        assert!(source.transfer_index_to_end_of(0, &mut target).is_err());
        assert_eq!(source.len(), 1);
        assert!(target.is_empty());
    }

    #[test]
    fn test_drops_every_live_element_once() {
        let tracker = Rc::new(());
        {
            let mut column = ComponentArray::new(ComponentOps::of::<Rc<()>>());
            for _ in 0..10 {
                column.push(Rc::clone(&tracker)).unwrap();
            }
            assert_eq!(Rc::strong_count(&tracker), 11);

            column.erase(3).unwrap();
            column.pop().unwrap();
            assert_eq!(Rc::strong_count(&tracker), 9);

            let mut other = ComponentArray::new(ComponentOps::of::<Rc<()>>());
            column.transfer_index_to_end_of(0, &mut other).unwrap();
            assert_eq!(Rc::strong_count(&tracker), 9);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn test_replace_and_swap() {
        let mut column = strings(&["a", "b"]);
        assert_eq!(column.replace(0, String::from("z")).unwrap(), "a");

        column.swap(0, 1).unwrap();
        assert_eq!(column.as_slice::<String>().unwrap(), &["b", "z"]);
        column.swap(1, 1).unwrap();
        assert_eq!(column.as_slice::<String>().unwrap(), &["b", "z"]);
    }

    #[test]
    fn test_try_clone() {
        let column = strings(&["a", "b"]);
        let copy = column.try_clone().unwrap();
        assert_eq!(copy.as_slice::<String>().unwrap(), &["a", "b"]);

        let plain = ComponentArray::new(ComponentOps::of::<String>());
        assert!(matches!(plain.try_clone(), Err(EcsError::NotCloneable(_))));
    }

    #[test]
    fn test_clone_index_to_end_of() {
        let column = strings(&["a", "b"]);
        let mut other = strings(&[]);
        assert_eq!(column.clone_index_to_end_of(1, &mut other).unwrap(), 0);
        assert_eq!(other.as_slice::<String>().unwrap(), &["b"]);
        assert_eq!(column.len(), 2);
    }

    #[test]
    fn test_clone_index_to_end() {
        let mut column = strings(&["a"]);
        for _ in 0..5 {
            column.clone_index_to_end(0).unwrap();
        }
        assert_eq!(column.len(), 6);
        assert!(column.as_slice::<String>().unwrap().iter().all(|s| s == "a"));
    }

    #[test]
    fn test_rebind_drops_contents() {
        let tracker = Rc::new(());
        let mut column = ComponentArray::new(ComponentOps::of::<Rc<()>>());
        column.push(Rc::clone(&tracker)).unwrap();

        column.rebind(ComponentOps::of::<u16>());
        assert_eq!(Rc::strong_count(&tracker), 1);
        assert!(column.is_empty());
        assert_eq!(column.capacity(), 0);
        column.push(3u16).unwrap();
        assert_eq!(column.as_slice::<u16>().unwrap(), &[3]);
    }

    #[test]
    fn test_zero_sized_components() {
        #[derive(Debug, PartialEq)]
        struct Tag;

        let mut column = ComponentArray::new(ComponentOps::of::<Tag>());
        for _ in 0..100 {
            column.push(Tag).unwrap();
        }
        column.erase(5).unwrap();
        assert_eq!(column.len(), 99);
        assert_eq!(column.get::<Tag>(98).unwrap(), &Tag);
    }

    #[test]
    fn test_over_aligned_components() {
        #[derive(Clone, Copy, Debug, PartialEq)]
        #[repr(align(64))]
        struct Line(u8);

        let mut column = ComponentArray::new(ComponentOps::of::<Line>());
        for i in 0..20 {
            column.push(Line(i)).unwrap();
        }
        let slice = column.as_slice::<Line>().unwrap();
        assert_eq!(slice.as_ptr() as usize % 64, 0);
        assert_eq!(slice[19], Line(19));
    }
}
