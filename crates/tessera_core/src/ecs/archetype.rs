//! # Archetypes
//!
//! One storage block per distinct [`Signature`].
//!
//! ```text
//! Archetype {position, velocity}:
//!   column position: [P0, P1, P2]
//!   column velocity: [V0, V1, V2]
//!   entities:        [e7, e2, e9]   <- row -> owner
//! ```
//!
//! Every column and the `entities` list share the same length at all times
//! outside a single operation. Removing a row swap-removes it from every
//! column in lock-step, so the owner of the former last row moves into the
//! vacated row; `entities` records who that is, so the caller can repoint
//! its directory record.
//!
//! ## Transition edges
//!
//! `edges[c]` memoizes the archetypes reached by adding or removing
//! component `c`. Edges are filled lazily by the registry and never
//! invalidated, since archetypes live as long as their registry.

use std::collections::HashMap;
use std::fmt;

use crate::component::{Component, ComponentArray, ComponentTable};
use crate::constants::ComponentId;
use crate::ecs::bundle::Bundle;
use crate::ecs::entity::Entity;
use crate::ecs::signature::Signature;
use crate::error::{EcsError, EcsResult, IdKind};

/// Stable index of an archetype within its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchetypeId(u32);

impl ArchetypeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position in the registry's archetype arena.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "archetype#{}", self.0)
    }
}

/// Cached neighbours for one component id.
#[derive(Clone, Copy, Debug, Default)]
struct Edge {
    add: Option<ArchetypeId>,
    remove: Option<ArchetypeId>,
}

/// Outcome of moving a row out of an archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RowTransfer {
    /// Row of the moved entity in the target archetype.
    pub new_row: u32,
    /// Entity whose row changed to fill the hole, if any.
    pub displaced: Option<Entity>,
}

#[derive(Debug)]
struct Column {
    id: ComponentId,
    data: ComponentArray,
}

/// Storage for every entity sharing one exact signature.
#[derive(Debug)]
pub struct Archetype {
    id: ArchetypeId,
    signature: Signature,
    /// Sorted by component id.
    columns: Vec<Column>,
    /// Owner of each row.
    entities: Vec<Entity>,
    edges: HashMap<ComponentId, Edge>,
}

impl Archetype {
    /// Builds an empty archetype with one column per enabled id, each bound
    /// to the operations registered for that id.
    pub(crate) fn new(
        id: ArchetypeId,
        signature: Signature,
        table: &ComponentTable,
        initial_capacity: usize,
    ) -> EcsResult<Self> {
        let columns = signature
            .iter()
            .map(|component| -> EcsResult<Column> {
                let info = table.info(component).ok_or(EcsError::InvalidId {
                    kind: IdKind::Component,
                    id: u32::from(component),
                })?;
                Ok(Column {
                    id: component,
                    data: ComponentArray::with_capacity(info.ops, initial_capacity),
                })
            })
            .collect::<EcsResult<Vec<Column>>>()?;

        Ok(Self {
            id,
            signature,
            columns,
            entities: Vec::with_capacity(initial_capacity),
            edges: HashMap::new(),
        })
    }

    /// This archetype's id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ArchetypeId {
        self.id
    }

    /// The exact component set stored here.
    #[inline]
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Number of entities (rows).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entity lives here.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Owner of each row.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Owner of `row`.
    #[inline]
    #[must_use]
    pub fn entity_at(&self, row: usize) -> Option<Entity> {
        self.entities.get(row).copied()
    }

    #[inline]
    fn column_index(&self, component: ComponentId) -> Option<usize> {
        self.columns
            .binary_search_by_key(&component, |column| column.id)
            .ok()
    }

    /// Column of `component`, if enabled here.
    #[must_use]
    pub fn column(&self, component: ComponentId) -> Option<&ComponentArray> {
        self.column_index(component)
            .map(|index| &self.columns[index].data)
    }

    /// Mutable column of `component`, if enabled here.
    pub fn column_mut(&mut self, component: ComponentId) -> Option<&mut ComponentArray> {
        self.column_index(component)
            .map(|index| &mut self.columns[index].data)
    }

    /// Iterates over every column mutably, in component id order.
    pub(crate) fn columns_mut(
        &mut self,
    ) -> impl Iterator<Item = (ComponentId, &mut ComponentArray)> + '_ {
        self.columns
            .iter_mut()
            .map(|column| (column.id, &mut column.data))
    }

    /// Column of `component`, failing with [`EcsError::InvalidId`].
    pub(crate) fn require_column(&self, component: ComponentId) -> EcsResult<&ComponentArray> {
        self.column(component).ok_or(EcsError::InvalidId {
            kind: IdKind::Component,
            id: u32::from(component),
        })
    }

    /// Mutable column of `component`, failing with [`EcsError::InvalidId`].
    pub(crate) fn require_column_mut(
        &mut self,
        component: ComponentId,
    ) -> EcsResult<&mut ComponentArray> {
        self.column_mut(component).ok_or(EcsError::InvalidId {
            kind: IdKind::Component,
            id: u32::from(component),
        })
    }

    /// Typed read of `component` at `row`.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidId`] if the component is not enabled here, or the
    /// column's type/bounds errors.
    pub fn get<T: Component>(&self, component: ComponentId, row: usize) -> EcsResult<&T> {
        self.require_column(component)?.get::<T>(row)
    }

    /// Typed mutable access to `component` at `row`.
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get).
    pub fn get_mut<T: Component>(&mut self, component: ComponentId, row: usize) -> EcsResult<&mut T> {
        self.require_column_mut(component)?.get_mut::<T>(row)
    }

    fn check_row(&self, row: usize) -> EcsResult<()> {
        if row < self.entities.len() {
            Ok(())
        } else {
            Err(EcsError::IndexOutOfBounds {
                index: row,
                len: self.entities.len(),
            })
        }
    }

    /// Appends a row for `entity` holding every value of `bundle`.
    ///
    /// `ids` are the bundle's component ids in bundle order and must form
    /// exactly this archetype's signature. Returns the new row.
    pub(crate) fn push_entity<B: Bundle>(
        &mut self,
        entity: Entity,
        bundle: B,
        ids: &[ComponentId],
    ) -> EcsResult<u32> {
        if ids.is_empty() {
            return Err(EcsError::EmptyBundle);
        }
        debug_assert_eq!(Signature::from_ids(ids), self.signature);
        debug_assert_eq!(ids.len(), self.columns.len());

        if let Err(err) = bundle.push_into(self, ids) {
            self.truncate_columns();
            return Err(err);
        }

        let row = self.entities.len();
        self.entities.push(entity);
        Ok(row as u32)
    }

    /// Drops column values left past the last row by a failed push.
    fn truncate_columns(&mut self) {
        let rows = self.entities.len();
        for column in &mut self.columns {
            while column.data.len() > rows {
                // Cannot fail: the column is longer than `rows >= 0`.
                let _ = column.data.pop();
            }
        }
    }

    /// Removes `row`, dropping every component value.
    ///
    /// Returns the entity that moved into `row`, if any.
    pub(crate) fn remove_entity(&mut self, row: usize) -> EcsResult<Option<Entity>> {
        self.remove_row_with(row, |_, column, row| column.erase(row))
    }

    /// Removes `row`, handing each column to `take` to vacate the slot.
    ///
    /// `take` must shrink the column by swap-removing `row` (for example
    /// through [`ComponentArray::erase`] or [`ComponentArray::remove`]).
    pub(crate) fn remove_row_with<F>(&mut self, row: usize, mut take: F) -> EcsResult<Option<Entity>>
    where
        F: FnMut(ComponentId, &mut ComponentArray, usize) -> EcsResult<()>,
    {
        self.check_row(row)?;
        for column in &mut self.columns {
            take(column.id, &mut column.data, row)?;
        }
        self.entities.swap_remove(row);
        Ok(self.entities.get(row).copied())
    }

    /// Moves `row` into `target`.
    ///
    /// Columns enabled in both archetypes are transferred without cloning.
    /// Columns missing from `target` are handed to `take`, which must
    /// swap-remove `row` as in [`remove_row_with`](Self::remove_row_with).
    /// Columns only `target` has must already hold the new row's value.
    pub(crate) fn transfer_row_with<F>(
        &mut self,
        row: usize,
        target: &mut Self,
        mut take: F,
    ) -> EcsResult<RowTransfer>
    where
        F: FnMut(ComponentId, &mut ComponentArray, usize) -> EcsResult<()>,
    {
        self.check_row(row)?;
        for column in &mut self.columns {
            match target.column_index(column.id) {
                Some(index) => {
                    column
                        .data
                        .transfer_index_to_end_of(row, &mut target.columns[index].data)?;
                }
                None => take(column.id, &mut column.data, row)?,
            }
        }

        let entity = self.entities.swap_remove(row);
        let new_row = target.entities.len() as u32;
        target.entities.push(entity);
        Ok(RowTransfer {
            new_row,
            displaced: self.entities.get(row).copied(),
        })
    }

    /// Appends a clone of `row` owned by `entity`. Returns the new row.
    ///
    /// Nothing is cloned unless every column supports it.
    pub(crate) fn clone_row(&mut self, row: usize, entity: Entity) -> EcsResult<u32> {
        self.check_row(row)?;
        if let Some(column) = self.columns.iter().find(|c| !c.data.ops().is_cloneable()) {
            return Err(EcsError::NotCloneable(column.data.type_name()));
        }

        for column in &mut self.columns {
            column.data.clone_index_to_end(row)?;
        }
        let new_row = self.entities.len() as u32;
        self.entities.push(entity);
        Ok(new_row)
    }

    /// Cached archetype reached by adding `component`.
    #[inline]
    #[must_use]
    pub fn add_edge(&self, component: ComponentId) -> Option<ArchetypeId> {
        self.edges.get(&component).and_then(|edge| edge.add)
    }

    /// Cached archetype reached by removing `component`.
    #[inline]
    #[must_use]
    pub fn remove_edge(&self, component: ComponentId) -> Option<ArchetypeId> {
        self.edges.get(&component).and_then(|edge| edge.remove)
    }

    pub(crate) fn set_add_edge(&mut self, component: ComponentId, target: ArchetypeId) {
        self.edges.entry(component).or_default().add = Some(target);
    }

    pub(crate) fn set_remove_edge(&mut self, component: ComponentId, target: ArchetypeId) {
        self.edges.entry(component).or_default().remove = Some(target);
    }

    /// Drops every row. Columns, allocations and edges are kept.
    pub(crate) fn clear(&mut self) {
        for column in &mut self.columns {
            column.data.clear();
        }
        self.entities.clear();
    }

    /// Returns `true` if every column holds exactly one value per row.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let rows = self.entities.len();
        self.columns.iter().all(|column| column.data.len() == rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ComponentTable {
        let mut table = ComponentTable::new(8);
        table.register::<i32>().unwrap();
        table.register_cloneable::<f32>().unwrap();
        table.register_cloneable::<String>().unwrap();
        table
    }

    fn archetype(table: &ComponentTable, index: usize, ids: &[ComponentId]) -> Archetype {
        Archetype::new(ArchetypeId::new(index), Signature::from_ids(ids), table, 0).unwrap()
    }

    #[test]
    fn test_push_entity() {
        let table = table();
        let mut arch = archetype(&table, 0, &[0, 1]);

        let e = Entity::new(3, 0);
        assert_eq!(arch.push_entity(e, (5i32, 7.0f32), &[0, 1]).unwrap(), 0);
        assert_eq!(arch.len(), 1);
        assert_eq!(*arch.get::<i32>(0, 0).unwrap(), 5);
        assert_eq!(*arch.get::<f32>(1, 0).unwrap(), 7.0);
        assert_eq!(arch.entity_at(0), Some(e));
        assert!(arch.is_consistent());
    }

    #[test]
    fn test_remove_reports_displaced_owner() {
        let table = table();
        let mut arch = archetype(&table, 0, &[0]);
        let (a, b, c) = (Entity::new(1, 0), Entity::new(2, 0), Entity::new(3, 0));
        for (entity, value) in [(a, 10i32), (b, 20), (c, 30)] {
            arch.push_entity(entity, (value,), &[0]).unwrap();
        }

        assert_eq!(arch.remove_entity(0).unwrap(), Some(c));
        assert_eq!(arch.entities(), &[c, b]);
        assert_eq!(*arch.get::<i32>(0, 0).unwrap(), 30);

        assert_eq!(arch.remove_entity(1).unwrap(), None);
        assert_eq!(arch.entities(), &[c]);
        assert!(arch.is_consistent());
    }

    #[test]
    fn test_transfer_row_keeps_shared_columns() {
        let table = table();
        let mut small = archetype(&table, 0, &[0]);
        let mut large = archetype(&table, 1, &[0, 1]);
        let (a, b) = (Entity::new(1, 0), Entity::new(2, 0));
        small.push_entity(a, (1i32,), &[0]).unwrap();
        small.push_entity(b, (2i32,), &[0]).unwrap();

        large.column_mut(1).unwrap().push(9.5f32).unwrap();
        let moved = small
            .transfer_row_with(0, &mut large, |_, column, row| column.erase(row))
            .unwrap();

        assert_eq!(moved, RowTransfer { new_row: 0, displaced: Some(b) });
        assert_eq!(*large.get::<i32>(0, 0).unwrap(), 1);
        assert_eq!(*large.get::<f32>(1, 0).unwrap(), 9.5);
        assert_eq!(*small.get::<i32>(0, 0).unwrap(), 2);
        assert!(small.is_consistent() && large.is_consistent());
    }

    #[test]
    fn test_transfer_row_hands_out_dropped_columns() {
        let table = table();
        let mut large = archetype(&table, 0, &[0, 2]);
        let mut small = archetype(&table, 1, &[0]);
        large
            .push_entity(Entity::new(1, 0), (4i32, String::from("gone")), &[0, 2])
            .unwrap();

        let mut taken = None;
        large
            .transfer_row_with(0, &mut small, |_, column, row| {
                taken = Some(column.remove::<String>(row)?);
                Ok(())
            })
            .unwrap();

        assert_eq!(taken.as_deref(), Some("gone"));
        assert!(large.is_empty() && large.is_consistent());
        assert_eq!(*small.get::<i32>(0, 0).unwrap(), 4);
    }

    #[test]
    fn test_clone_row_requires_cloneable_columns() {
        let table = table();
        let mut plain = archetype(&table, 0, &[0, 1]);
        plain.push_entity(Entity::new(1, 0), (1i32, 1.0f32), &[0, 1]).unwrap();
        assert!(matches!(
            plain.clone_row(0, Entity::new(2, 0)),
            Err(EcsError::NotCloneable(_))
        ));
        assert_eq!(plain.len(), 1);
        assert!(plain.is_consistent());

        let mut cloneable = archetype(&table, 1, &[1, 2]);
        cloneable
            .push_entity(Entity::new(1, 0), (2.0f32, String::from("x")), &[1, 2])
            .unwrap();
        assert_eq!(cloneable.clone_row(0, Entity::new(2, 0)).unwrap(), 1);
        assert_eq!(cloneable.get::<String>(2, 1).unwrap(), "x");
    }

    #[test]
    fn test_edges() {
        let table = table();
        let mut arch = archetype(&table, 0, &[0]);
        assert_eq!(arch.add_edge(1), None);

        arch.set_add_edge(1, ArchetypeId::new(4));
        arch.set_remove_edge(0, ArchetypeId::new(2));
        assert_eq!(arch.add_edge(1), Some(ArchetypeId::new(4)));
        assert_eq!(arch.remove_edge(1), None);
        assert_eq!(arch.remove_edge(0), Some(ArchetypeId::new(2)));
    }

    #[test]
    fn test_unknown_column() {
        let table = table();
        let arch = archetype(&table, 0, &[0]);
        assert!(matches!(
            arch.get::<f32>(1, 0),
            Err(EcsError::InvalidId { kind: IdKind::Component, id: 1 })
        ));
    }
}
