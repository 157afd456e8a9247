//! # Queries
//!
//! Lock-step iteration over the columns of exactly one archetype.
//!
//! A query names a tuple of component types. The registry resolves the
//! tuple to a [`Signature`](crate::ecs::Signature) and iterates the single
//! archetype whose signature equals it; archetypes holding a superset are
//! not visited.
//!
//! ```rust
//! use tessera_core::Registry;
//!
//! let mut registry = Registry::new().unwrap();
//! registry.register_component::<i32>().unwrap();
//! registry.register_component::<f32>().unwrap();
//! registry.spawn((5i32, 7.0f32)).unwrap();
//!
//! for (number, real) in registry.iterate_mut::<(i32, f32)>().unwrap() {
//!     *number += 1;
//!     *real *= 2.0;
//! }
//! let pairs: Vec<_> = registry.iterate::<(i32, f32)>().unwrap().collect();
//! assert_eq!(pairs, vec![(&6, &14.0)]);
//! ```

use std::any::type_name;

use crate::component::{Component, ComponentArray, ComponentTable};
use crate::constants::ComponentId;
use crate::ecs::archetype::Archetype;
use crate::error::{EcsError, EcsResult};

/// An ordered set of distinct component types.
pub trait ComponentSet: 'static {
    /// Names of the member types, in tuple order.
    fn type_names() -> Vec<&'static str>;

    /// Ids of the member types in `table`, in tuple order.
    ///
    /// # Errors
    ///
    /// [`EcsError::Unregistered`] for an unknown member,
    /// [`EcsError::RepeatedComponent`] if a type appears twice.
    fn component_ids(table: &ComponentTable) -> EcsResult<Vec<ComponentId>>;
}

/// Shared-reference query over one archetype.
pub trait Query: ComponentSet {
    /// Lock-step iterator yielding one tuple of references per row.
    type Iter<'a>: Iterator;

    /// Borrows the columns named by `ids` from `archetype`.
    ///
    /// # Errors
    ///
    /// Fails if a column is missing or bound to another type.
    fn fetch<'a>(archetype: &'a Archetype, ids: &[ComponentId]) -> EcsResult<Self::Iter<'a>>;
}

/// Mutable-reference query over one archetype.
pub trait QueryMut: ComponentSet {
    /// Lock-step iterator yielding one tuple of mutable references per row.
    type IterMut<'a>: Iterator;

    /// Mutably borrows the columns named by `ids` from `archetype`.
    ///
    /// # Errors
    ///
    /// Fails if a column is missing or bound to another type.
    fn fetch_mut<'a>(
        archetype: &'a mut Archetype,
        ids: &[ComponentId],
    ) -> EcsResult<Self::IterMut<'a>>;
}

/// Rejects an id list naming the same component twice.
pub(crate) fn ensure_distinct(ids: &[ComponentId], names: &[&'static str]) -> EcsResult<()> {
    for (position, id) in ids.iter().enumerate() {
        if ids[..position].contains(id) {
            return Err(EcsError::RepeatedComponent(names[position]));
        }
    }
    Ok(())
}

/// Takes the column for `id` out of a list of disjoint column borrows.
fn take_column<'a>(
    columns: &mut [(ComponentId, Option<&'a mut ComponentArray>)],
    id: ComponentId,
) -> EcsResult<&'a mut ComponentArray> {
    columns
        .iter_mut()
        .find(|(component, _)| *component == id)
        .and_then(|(_, column)| column.take())
        .ok_or(EcsError::InvalidId {
            kind: crate::error::IdKind::Component,
            id: u32::from(id),
        })
}

fn typed_mut<'a, T: Component>(column: &'a mut ComponentArray) -> EcsResult<&'a mut [T]> {
    column.as_mut_slice::<T>()
}

fn typed<'a, T: Component>(archetype: &'a Archetype, id: ComponentId) -> EcsResult<&'a [T]> {
    archetype.require_column(id)?.as_slice::<T>()
}

/// Advances a tuple of iterators together, stopping at the shortest.
#[derive(Debug, Clone)]
pub struct Lockstep<I>(I);

/// Iterator returned by the registry's `iterate` entry points.
///
/// Empty when no archetype matches the requested signature.
#[derive(Debug)]
pub struct QueryIter<I> {
    inner: Option<I>,
}

impl<I> QueryIter<I> {
    pub(crate) const fn new(inner: Option<I>) -> Self {
        Self { inner }
    }

    pub(crate) const fn empty() -> Self {
        Self { inner: None }
    }
}

impl<I: Iterator> Iterator for QueryIter<I> {
    type Item = I::Item;

    #[inline]
    fn next(&mut self) -> Option<I::Item> {
        self.inner.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner
            .as_ref()
            .map_or((0, Some(0)), Iterator::size_hint)
    }
}

macro_rules! impl_component_set {
    ($(($T:ident, $index:tt)),+) => {
        impl<$($T: Iterator),+> Iterator for Lockstep<($($T,)+)> {
            type Item = ($($T::Item,)+);

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                Some(($(self.0 .$index.next()?,)+))
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.0 .0.size_hint()
            }
        }

        impl<$($T: Component),+> ComponentSet for ($($T,)+) {
            fn type_names() -> Vec<&'static str> {
                vec![$(type_name::<$T>()),+]
            }

            fn component_ids(table: &ComponentTable) -> EcsResult<Vec<ComponentId>> {
                let ids = vec![$(table.require::<$T>()?),+];
                ensure_distinct(&ids, &Self::type_names())?;
                Ok(ids)
            }
        }

        impl<$($T: Component),+> Query for ($($T,)+) {
            type Iter<'a> = Lockstep<($(std::slice::Iter<'a, $T>,)+)>;

            fn fetch<'a>(
                archetype: &'a Archetype,
                ids: &[ComponentId],
            ) -> EcsResult<Self::Iter<'a>> {
                Ok(Lockstep(($(typed::<$T>(archetype, ids[$index])?.iter(),)+)))
            }
        }

        impl<$($T: Component),+> QueryMut for ($($T,)+) {
            type IterMut<'a> = Lockstep<($(std::slice::IterMut<'a, $T>,)+)>;

            fn fetch_mut<'a>(
                archetype: &'a mut Archetype,
                ids: &[ComponentId],
            ) -> EcsResult<Self::IterMut<'a>> {
                let mut columns: Vec<_> = archetype
                    .columns_mut()
                    .map(|(component, column)| (component, Some(column)))
                    .collect();
                Ok(Lockstep(($(
                    typed_mut::<$T>(take_column(&mut columns, ids[$index])?)?.iter_mut(),
                )+)))
            }
        }
    };
}

impl_component_set!((A, 0));
impl_component_set!((A, 0), (B, 1));
impl_component_set!((A, 0), (B, 1), (C, 2));
impl_component_set!((A, 0), (B, 1), (C, 2), (D, 3));
impl_component_set!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_component_set!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));
