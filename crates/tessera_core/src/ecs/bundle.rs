//! Tuples of component values pushed into an archetype as one row.

use crate::component::Component;
use crate::constants::ComponentId;
use crate::ecs::archetype::Archetype;
use crate::ecs::query::ComponentSet;
use crate::error::EcsResult;

/// A tuple of component values making up a whole row.
pub trait Bundle: ComponentSet {
    /// Pushes each value onto the column of the matching id.
    ///
    /// `ids` come from [`ComponentSet::component_ids`].
    ///
    /// # Errors
    ///
    /// Fails if a column is missing or bound to another type. Columns
    /// pushed before the failure are left one longer than the row count.
    fn push_into(self, archetype: &mut Archetype, ids: &[ComponentId]) -> EcsResult<()>;
}

macro_rules! impl_bundle {
    ($(($T:ident, $index:tt)),+) => {
        impl<$($T: Component),+> Bundle for ($($T,)+) {
            fn push_into(self, archetype: &mut Archetype, ids: &[ComponentId]) -> EcsResult<()> {
                $(
                    archetype.require_column_mut(ids[$index])?.push::<$T>(self.$index)?;
                )+
                Ok(())
            }
        }
    };
}

impl_bundle!((A, 0));
impl_bundle!((A, 0), (B, 1));
impl_bundle!((A, 0), (B, 1), (C, 2));
impl_bundle!((A, 0), (B, 1), (C, 2), (D, 3));
impl_bundle!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_bundle!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));
