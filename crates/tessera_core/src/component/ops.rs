//! # Component Operation Tables
//!
//! One table of monomorphized byte-level operations per component type.
//!
//! A [`ComponentOps`] is built once, when a type is registered, and copied
//! into every column bound to that type. Columns then move, clone, swap and
//! destroy elements through these function pointers without knowing the
//! concrete type.
//!
//! ## Ownership transfer
//!
//! Every Rust type is movable by a bitwise copy, so "move" is always
//! `copy_nonoverlapping` followed by treating the source slot as
//! uninitialized. Clone entries exist only for types registered through
//! [`ComponentOps::cloneable`]; the decision is made once, per type, at
//! registration. Types without drop glue skip destruction entirely.

// SAFETY: This module hands out raw-pointer operations for type-erased
// columns. Callers uphold the contracts documented on each method.
#![allow(unsafe_code)]

use std::alloc::Layout;
use std::any::{type_name, TypeId};
use std::fmt;
use std::mem;
use std::ptr;

/// Marker for types storable as components.
///
/// Any `'static` type qualifies.
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

type MoveFn = unsafe fn(src: *mut u8, dst: *mut u8);
type MoveRangeFn = unsafe fn(src: *mut u8, dst: *mut u8, count: usize);
type CloneFn = unsafe fn(src: *const u8, dst: *mut u8);
type CloneRangeFn = unsafe fn(src: *const u8, dst: *mut u8, count: usize);
type DestroyFn = unsafe fn(location: *mut u8);
type DestroyRangeFn = unsafe fn(location: *mut u8, count: usize);
type SwapFn = unsafe fn(a: *mut u8, b: *mut u8);
type SwapRemoveFn = unsafe fn(remove: *mut u8, replacement: *mut u8);

/// Byte-level operations for one component type.
///
/// All pointer arguments must be aligned for the bound type. "Live" means
/// the slot holds a constructed value; "uninit" means it does not.
#[derive(Clone, Copy)]
pub struct ComponentOps {
    type_id: TypeId,
    name: &'static str,
    layout: Layout,
    trivial: bool,
    move_one: MoveFn,
    move_range: MoveRangeFn,
    clone_one: Option<CloneFn>,
    clone_range: Option<CloneRangeFn>,
    destroy: DestroyFn,
    destroy_range: DestroyRangeFn,
    swap: SwapFn,
    swap_remove: SwapRemoveFn,
}

impl ComponentOps {
    /// Builds the table for `T` without clone support.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
            layout: Layout::new::<T>(),
            trivial: !mem::needs_drop::<T>(),
            move_one: move_one::<T>,
            move_range: move_range::<T>,
            clone_one: None,
            clone_range: None,
            destroy: destroy::<T>,
            destroy_range: destroy_range::<T>,
            swap: swap::<T>,
            swap_remove: swap_remove::<T>,
        }
    }

    /// Builds the table for `T` including the clone entries.
    #[must_use]
    pub fn cloneable<T: Component + Clone>() -> Self {
        Self {
            clone_one: Some(clone_one::<T>),
            clone_range: Some(clone_range::<T>),
            ..Self::of::<T>()
        }
    }

    /// `TypeId` of the bound type.
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the bound type, for diagnostics.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Memory layout of one element.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Size of one element in bytes.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.layout.size()
    }

    /// Returns `true` if the type has no drop glue.
    #[inline]
    #[must_use]
    pub const fn is_trivial(&self) -> bool {
        self.trivial
    }

    /// Returns `true` if the clone entries are present.
    #[inline]
    #[must_use]
    pub const fn is_cloneable(&self) -> bool {
        self.clone_one.is_some()
    }

    /// Returns `true` if the table is bound to `T`.
    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Address of element `index` in a buffer starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` must point to an allocation of at least `index + 1` elements
    /// (or be a dangling aligned pointer for zero-sized types).
    #[inline]
    #[must_use]
    pub unsafe fn at(&self, base: *mut u8, index: usize) -> *mut u8 {
        base.add(index * self.layout.size())
    }

    /// Moves one element from `src` to `dst`.
    ///
    /// # Safety
    ///
    /// `src` is live, `dst` is uninit, they do not overlap. Afterwards `src`
    /// is uninit and `dst` is live.
    #[inline]
    pub unsafe fn move_to(&self, src: *mut u8, dst: *mut u8) {
        (self.move_one)(src, dst);
    }

    /// Moves `count` contiguous elements from `src` to `dst`.
    ///
    /// # Safety
    ///
    /// As [`move_to`](Self::move_to), for every element of both ranges.
    #[inline]
    pub unsafe fn move_range(&self, src: *mut u8, dst: *mut u8, count: usize) {
        (self.move_range)(src, dst, count);
    }

    /// Clones one element from `src` into `dst`.
    ///
    /// Returns `false` without touching memory if the type is not cloneable.
    ///
    /// # Safety
    ///
    /// `src` is live, `dst` is uninit, they do not overlap.
    #[inline]
    pub unsafe fn clone_to(&self, src: *const u8, dst: *mut u8) -> bool {
        match self.clone_one {
            Some(clone_one) => {
                clone_one(src, dst);
                true
            }
            None => false,
        }
    }

    /// Clones `count` contiguous elements from `src` into `dst`.
    ///
    /// Returns `false` without touching memory if the type is not cloneable.
    ///
    /// # Safety
    ///
    /// As [`clone_to`](Self::clone_to), for every element of both ranges.
    #[inline]
    pub unsafe fn clone_range(&self, src: *const u8, dst: *mut u8, count: usize) -> bool {
        match self.clone_range {
            Some(clone_range) => {
                clone_range(src, dst, count);
                true
            }
            None => false,
        }
    }

    /// Drops the element at `location`, leaving it uninit.
    ///
    /// # Safety
    ///
    /// `location` is live.
    #[inline]
    pub unsafe fn destroy(&self, location: *mut u8) {
        (self.destroy)(location);
    }

    /// Drops `count` contiguous elements starting at `location`.
    ///
    /// # Safety
    ///
    /// Every element of the range is live.
    #[inline]
    pub unsafe fn destroy_range(&self, location: *mut u8, count: usize) {
        (self.destroy_range)(location, count);
    }

    /// Exchanges the values at `a` and `b`.
    ///
    /// # Safety
    ///
    /// Both are live. They may be equal.
    #[inline]
    pub unsafe fn swap(&self, a: *mut u8, b: *mut u8) {
        (self.swap)(a, b);
    }

    /// Drops the value at `remove` and moves `replacement` into its slot.
    ///
    /// When the two are the same slot the value is only dropped.
    ///
    /// # Safety
    ///
    /// Both are live. Afterwards `replacement` is uninit (unless equal to
    /// `remove`, which is then uninit too).
    #[inline]
    pub unsafe fn swap_remove(&self, remove: *mut u8, replacement: *mut u8) {
        (self.swap_remove)(remove, replacement);
    }
}

impl fmt::Debug for ComponentOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentOps")
            .field("name", &self.name)
            .field("size", &self.layout.size())
            .field("align", &self.layout.align())
            .field("trivial", &self.trivial)
            .field("cloneable", &self.is_cloneable())
            .finish()
    }
}

unsafe fn move_one<T>(src: *mut u8, dst: *mut u8) {
    ptr::copy_nonoverlapping(src.cast::<T>(), dst.cast::<T>(), 1);
}

unsafe fn move_range<T>(src: *mut u8, dst: *mut u8, count: usize) {
    ptr::copy_nonoverlapping(src.cast::<T>(), dst.cast::<T>(), count);
}

unsafe fn clone_one<T: Clone>(src: *const u8, dst: *mut u8) {
    let value = (*src.cast::<T>()).clone();
    dst.cast::<T>().write(value);
}

unsafe fn clone_range<T: Clone>(src: *const u8, dst: *mut u8, count: usize) {
    let src = src.cast::<T>();
    let dst = dst.cast::<T>();
    for i in 0..count {
        dst.add(i).write((*src.add(i)).clone());
    }
}

unsafe fn destroy<T>(location: *mut u8) {
    if mem::needs_drop::<T>() {
        ptr::drop_in_place(location.cast::<T>());
    }
}

unsafe fn destroy_range<T>(location: *mut u8, count: usize) {
    if mem::needs_drop::<T>() {
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(location.cast::<T>(), count));
    }
}

unsafe fn swap<T>(a: *mut u8, b: *mut u8) {
    if a != b {
        ptr::swap_nonoverlapping(a.cast::<T>(), b.cast::<T>(), 1);
    }
}

unsafe fn swap_remove<T>(remove: *mut u8, replacement: *mut u8) {
    destroy::<T>(remove);
    if remove != replacement {
        move_one::<T>(replacement, remove);
    }
}
