//! # Registry
//!
//! Owns every archetype, the entity id pool and the entity directory, and
//! runs the migration protocol when an entity's component set changes.
//!
//! ## Migration
//!
//! ```text
//! attach C to e in {A,B}:
//!   1. target = edges[C].add  or  lookup/create {A,B,C} and cache both edges
//!   2. push C's value onto target.C
//!   3. transfer e's A and B values to the end of target.A / target.B
//!   4. the old last row of {A,B} fills e's hole; repoint its owner
//!   5. repoint e to (target, new row)
//! ```
//!
//! Detach runs the same steps with the signature shrinking; an empty
//! signature leaves the entity alive with no archetype.
//!
//! ## Diagnostics
//!
//! Every public operation reports the error it returns to the registry's
//! [`DiagnosticSink`] before returning it, tagged with the caller's
//! location. Benign conditions (destroying or clearing an entity without
//! components) are reported as warnings and succeed.
//!
//! The registry is single-threaded: it is neither `Send` nor `Sync` because
//! columns may hold any `'static` type.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tessera_diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink, Location, Severity};

use crate::component::{Component, ComponentTable};
use crate::config::RegistryConfig;
use crate::constants::{ComponentId, RegistryId, MAX_REGISTRIES};
use crate::ecs::archetype::{Archetype, ArchetypeId};
use crate::ecs::bundle::Bundle;
use crate::ecs::entity::{Entity, EntityLocation, EntityRecord};
use crate::ecs::query::{ComponentSet, Query, QueryIter, QueryMut};
use crate::ecs::signature::Signature;
use crate::error::{EcsError, EcsResult, IdKind};
use crate::storage::{IdPool, SparseSet};

/// Sink shared between a registry and whoever inspects its reports.
pub type SharedSink = Arc<dyn DiagnosticSink + Send + Sync>;

/// Process-wide pool of registry ids.
static REGISTRY_IDS: Mutex<IdPool> =
    parking_lot::const_mutex(IdPool::new(IdKind::Registry, MAX_REGISTRIES - 1));

/// Reports `err` to `sink` at the caller's location.
#[track_caller]
fn report_error(sink: &dyn DiagnosticSink, err: &EcsError) {
    sink.report(Diagnostic::new(
        Location::from(std::panic::Location::caller()),
        err.severity(),
        err.to_string(),
    ));
}

/// Borrows two distinct archetypes mutably.
fn pair_mut(
    archetypes: &mut [Archetype],
    first: ArchetypeId,
    second: ArchetypeId,
) -> (&mut Archetype, &mut Archetype) {
    let (a, b) = (first.index(), second.index());
    debug_assert_ne!(a, b, "migration between an archetype and itself");
    if a < b {
        let (left, right) = archetypes.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = archetypes.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

/// An entity/component store.
///
/// # Example
///
/// ```rust
/// use tessera_core::Registry;
///
/// let mut registry = Registry::new().unwrap();
/// registry.register_component::<i32>().unwrap();
/// registry.register_component::<f32>().unwrap();
///
/// let x = registry.create_entity().unwrap();
/// registry.attach(x, 5i32).unwrap();
/// registry.attach(x, 7.0f32).unwrap();
/// assert_eq!(*registry.get::<i32>(x).unwrap(), 5);
///
/// assert_eq!(registry.detach::<f32>(x).unwrap(), 7.0);
/// assert!(registry.detach::<f32>(x).is_err());
/// ```
pub struct Registry {
    id: RegistryId,
    config: RegistryConfig,
    components: ComponentTable,
    /// Arena; an [`ArchetypeId`] is an index into it.
    archetypes: Vec<Archetype>,
    by_signature: HashMap<Signature, ArchetypeId>,
    entity_ids: IdPool,
    directory: SparseSet<EntityRecord>,
    sink: SharedSink,
}

impl Registry {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Creates a registry with default capacities, reporting into a fresh
    /// [`DiagnosticLog`].
    ///
    /// # Errors
    ///
    /// [`EcsError::CapacityExhausted`] if every registry id is in use.
    #[track_caller]
    pub fn new() -> EcsResult<Self> {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates a registry with the given capacities.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] or [`EcsError::CapacityExhausted`].
    #[track_caller]
    pub fn with_config(config: RegistryConfig) -> EcsResult<Self> {
        Self::with_sink(config, Arc::new(DiagnosticLog::new()))
    }

    /// Creates a registry reporting into `sink`.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] or [`EcsError::CapacityExhausted`]; both
    /// are reported to `sink` as well.
    #[track_caller]
    pub fn with_sink(config: RegistryConfig, sink: SharedSink) -> EcsResult<Self> {
        let id = match Self::claim_id(&config) {
            Ok(id) => id,
            Err(err) => {
                report_error(&*sink, &err);
                return Err(err);
            }
        };

        tracing::debug!(registry = id, ?config, "registry created");
        Ok(Self {
            id,
            components: ComponentTable::new(config.component_capacity),
            archetypes: Vec::new(),
            by_signature: HashMap::new(),
            entity_ids: IdPool::new(IdKind::Entity, config.entity_capacity),
            directory: SparseSet::new(config.entity_capacity, config.sparse_page_size),
            config,
            sink,
        })
    }

    fn claim_id(config: &RegistryConfig) -> EcsResult<RegistryId> {
        config.validate()?;
        // Pool capacity is below `RegistryId::MAX`.
        Ok(REGISTRY_IDS.lock().allocate()? as RegistryId)
    }

    /// This registry's process-unique id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> RegistryId {
        self.id
    }

    /// Capacities this registry was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The sink errors are reported to.
    #[inline]
    #[must_use]
    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    #[track_caller]
    fn observe<T>(&self, result: EcsResult<T>) -> EcsResult<T> {
        if let Err(err) = &result {
            report_error(&*self.sink, err);
        }
        result
    }

    #[track_caller]
    fn warn(&self, message: String) {
        self.sink.report(Diagnostic::new(
            Location::from(std::panic::Location::caller()),
            Severity::Warn,
            message,
        ));
    }

    // ========================================================================
    // COMPONENT TYPES
    // ========================================================================

    /// Registers `T` and returns its id.
    ///
    /// # Errors
    ///
    /// [`EcsError::AlreadyRegistered`] or [`EcsError::CapacityExhausted`].
    #[track_caller]
    pub fn register_component<T: Component>(&mut self) -> EcsResult<ComponentId> {
        let result = self.components.register::<T>();
        self.observe(result)
    }

    /// Registers `T` with clone support, enabling [`clone_entity`].
    ///
    /// [`clone_entity`]: Self::clone_entity
    ///
    /// # Errors
    ///
    /// [`EcsError::AlreadyRegistered`] or [`EcsError::CapacityExhausted`].
    #[track_caller]
    pub fn register_cloneable_component<T: Component + Clone>(&mut self) -> EcsResult<ComponentId> {
        let result = self.components.register_cloneable::<T>();
        self.observe(result)
    }

    /// Id of `T`, if registered here.
    #[inline]
    #[must_use]
    pub fn component_id<T: Component>(&self) -> Option<ComponentId> {
        self.components.id_of::<T>()
    }

    /// Component types registered here.
    #[inline]
    #[must_use]
    pub const fn components(&self) -> &ComponentTable {
        &self.components
    }

    // ========================================================================
    // ENTITIES
    // ========================================================================

    /// Creates an entity with no components.
    ///
    /// # Errors
    ///
    /// [`EcsError::CapacityExhausted`] once every entity id is live.
    #[track_caller]
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        let result = self.try_create_entity();
        self.observe(result)
    }

    fn try_create_entity(&mut self) -> EcsResult<Entity> {
        let id = self.entity_ids.allocate()?;
        let entity = Entity::new(id, 0);
        if let Err(err) = self.directory.push(EntityRecord::new(entity)) {
            self.entity_ids.release(id)?;
            return Err(err);
        }
        Ok(entity)
    }

    /// Destroys `entity` and every component it holds.
    ///
    /// Destroying an entity with no components succeeds with a warning.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if `entity` is not alive.
    #[track_caller]
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        let result = self.try_destroy_entity(entity);
        if let Ok(false) = result {
            self.warn(format!("destroyed entity {entity} with no components"));
        }
        self.observe(result).map(|_| ())
    }

    fn try_destroy_entity(&mut self, entity: Entity) -> EcsResult<bool> {
        let record = self.record(entity)?;
        if let Some(location) = record.location {
            self.remove_from_archetype(location)?;
        }
        self.release_entity(entity)?;
        tracing::trace!(registry = self.id, %entity, "entity destroyed");
        Ok(record.location.is_some())
    }

    /// Removes every component from `entity`, keeping it alive.
    ///
    /// Clearing an entity with no components succeeds with a warning.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if `entity` is not alive.
    #[track_caller]
    pub fn clear_entity(&mut self, entity: Entity) -> EcsResult<()> {
        let result = self.try_clear_entity(entity);
        if let Ok(false) = result {
            self.warn(format!("cleared entity {entity} with no components"));
        }
        self.observe(result).map(|_| ())
    }

    fn try_clear_entity(&mut self, entity: Entity) -> EcsResult<bool> {
        let record = self.record(entity)?;
        let Some(location) = record.location else {
            return Ok(false);
        };
        self.remove_from_archetype(location)?;
        self.set_location(entity, None)?;
        Ok(true)
    }

    /// Returns `true` if `entity` is alive in this registry.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.record(entity).is_ok()
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.directory.len()
    }

    /// Iterates over every live entity.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.directory.iter().map(|record| record.entity)
    }

    /// Creates an entity holding every value of `bundle`.
    ///
    /// The row is pushed straight into the bundle's archetype; no
    /// intermediate archetypes are visited.
    ///
    /// # Errors
    ///
    /// [`EcsError::Unregistered`], [`EcsError::RepeatedComponent`] or
    /// [`EcsError::CapacityExhausted`].
    #[track_caller]
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> EcsResult<Entity> {
        let result = self.try_spawn(bundle);
        self.observe(result)
    }

    fn try_spawn<B: Bundle>(&mut self, bundle: B) -> EcsResult<Entity> {
        let ids = B::component_ids(&self.components)?;
        let archetype = self.archetype_for(Signature::from_ids(&ids))?;
        let entity = self.try_create_entity()?;

        match self.archetypes[archetype.index()].push_entity(entity, bundle, &ids) {
            Ok(row) => {
                self.set_location(entity, Some(EntityLocation { archetype, row }))?;
                Ok(entity)
            }
            Err(err) => {
                self.release_entity(entity)?;
                Err(err)
            }
        }
    }

    /// Creates a copy of `entity` with cloned components.
    ///
    /// # Errors
    ///
    /// [`EcsError::NotCloneable`] if any component was registered without
    /// clone support, [`EcsError::UnknownEntity`] or
    /// [`EcsError::CapacityExhausted`].
    #[track_caller]
    pub fn clone_entity(&mut self, entity: Entity) -> EcsResult<Entity> {
        let result = self.try_clone_entity(entity);
        self.observe(result)
    }

    fn try_clone_entity(&mut self, entity: Entity) -> EcsResult<Entity> {
        let record = self.record(entity)?;
        let copy = self.try_create_entity()?;
        let Some(location) = record.location else {
            return Ok(copy);
        };

        let archetype = location.archetype;
        match self.archetypes[archetype.index()].clone_row(location.row as usize, copy) {
            Ok(row) => {
                self.set_location(copy, Some(EntityLocation { archetype, row }))?;
                Ok(copy)
            }
            Err(err) => {
                self.release_entity(copy)?;
                Err(err)
            }
        }
    }

    /// Removes every entity. Archetypes and their edges survive.
    pub fn clear(&mut self) {
        for archetype in &mut self.archetypes {
            archetype.clear();
        }
        self.directory.clear();
        self.entity_ids.clear();
        tracing::debug!(registry = self.id, "registry cleared");
    }

    // ========================================================================
    // COMPONENTS ON ENTITIES
    // ========================================================================

    /// Attaches `value` to `entity`, migrating it to the grown archetype.
    ///
    /// # Errors
    ///
    /// [`EcsError::DuplicateComponent`] if `entity` already holds a `T`,
    /// [`EcsError::Unregistered`] or [`EcsError::UnknownEntity`].
    #[track_caller]
    pub fn attach<T: Component>(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        let result = self.try_attach(entity, value);
        self.observe(result)
    }

    fn try_attach<T: Component>(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        let component = self.components.require::<T>()?;
        let record = self.record(entity)?;

        let Some(source) = record.location else {
            let archetype = self.archetype_for(Signature::EMPTY.with(component))?;
            let row = self.archetypes[archetype.index()].push_entity(entity, (value,), &[component])?;
            return self.set_location(entity, Some(EntityLocation { archetype, row }));
        };

        if self.archetypes[source.archetype.index()]
            .signature()
            .contains(component)
        {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: type_name::<T>(),
            });
        }

        let target = self.add_target(source.archetype, component)?;
        let (from, to) = pair_mut(&mut self.archetypes, source.archetype, target);
        to.require_column_mut(component)?.push(value)?;
        let moved = match from.transfer_row_with(source.row as usize, to, |_, column, row| {
            column.erase(row)
        }) {
            Ok(moved) => moved,
            Err(err) => {
                to.require_column_mut(component)?.pop()?;
                return Err(err);
            }
        };

        self.set_location(
            entity,
            Some(EntityLocation {
                archetype: target,
                row: moved.new_row,
            }),
        )?;
        self.repoint(moved.displaced, source)
    }

    /// Detaches `T` from `entity` and returns it, migrating the entity to
    /// the shrunk archetype (or to none if `T` was its last component).
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if `entity` holds no `T`,
    /// [`EcsError::Unregistered`] or [`EcsError::UnknownEntity`].
    #[track_caller]
    pub fn detach<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        let result = self.try_detach(entity);
        self.observe(result)
    }

    fn try_detach<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        let (component, source) = self.locate::<T>(entity)?;
        let row = source.row as usize;

        let mut taken: Option<T> = None;
        match self.remove_target(source.archetype, component)? {
            None => {
                let displaced = self.archetypes[source.archetype.index()]
                    .remove_row_with(row, |_, column, row| {
                        taken = Some(column.remove::<T>(row)?);
                        Ok(())
                    })?;
                self.set_location(entity, None)?;
                self.repoint(displaced, source)?;
            }
            Some(target) => {
                let (from, to) = pair_mut(&mut self.archetypes, source.archetype, target);
                let moved = from.transfer_row_with(row, to, |_, column, row| {
                    taken = Some(column.remove::<T>(row)?);
                    Ok(())
                })?;
                self.set_location(
                    entity,
                    Some(EntityLocation {
                        archetype: target,
                        row: moved.new_row,
                    }),
                )?;
                self.repoint(moved.displaced, source)?;
            }
        }

        taken.ok_or(EcsError::MissingComponent {
            entity,
            component: type_name::<T>(),
        })
    }

    /// Reads `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`], [`EcsError::Unregistered`] or
    /// [`EcsError::UnknownEntity`].
    #[track_caller]
    pub fn get<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        let result = self.locate::<T>(entity).and_then(|(component, location)| {
            self.archetypes[location.archetype.index()].get::<T>(component, location.row as usize)
        });
        self.observe(result)
    }

    /// Mutable access to `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get).
    #[track_caller]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        let found = self.locate::<T>(entity);
        let (component, location) = self.observe(found)?;
        let result = self.archetypes[location.archetype.index()]
            .get_mut::<T>(component, location.row as usize);
        if let Err(err) = &result {
            report_error(&*self.sink, err);
        }
        result
    }

    /// Returns `true` if `entity` is alive and holds a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.locate::<T>(entity).is_ok()
    }

    /// The component set `entity` currently holds.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if `entity` is not alive.
    #[track_caller]
    pub fn signature_of(&self, entity: Entity) -> EcsResult<Signature> {
        let result = self.record(entity).map(|record| {
            record.location.map_or(Signature::EMPTY, |location| {
                *self.archetypes[location.archetype.index()].signature()
            })
        });
        self.observe(result)
    }

    /// Where `entity`'s components live; `None` if it holds none.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if `entity` is not alive.
    #[track_caller]
    pub fn location_of(&self, entity: Entity) -> EcsResult<Option<EntityLocation>> {
        let result = self.record(entity).map(|record| record.location);
        self.observe(result)
    }

    // ========================================================================
    // ITERATION
    // ========================================================================

    /// Iterates the archetype whose signature is exactly `Q`'s types.
    ///
    /// Yields nothing if no entity has ever held exactly that set.
    ///
    /// # Errors
    ///
    /// [`EcsError::Unregistered`] or [`EcsError::RepeatedComponent`].
    #[track_caller]
    pub fn iterate<Q: Query>(&self) -> EcsResult<QueryIter<Q::Iter<'_>>> {
        let result = self.query_target::<Q>().and_then(|(ids, archetype)| match archetype {
            Some(archetype) => Ok(QueryIter::new(Some(Q::fetch(
                &self.archetypes[archetype.index()],
                &ids,
            )?))),
            None => Ok(QueryIter::empty()),
        });
        self.observe(result)
    }

    /// Mutable counterpart of [`iterate`](Self::iterate).
    ///
    /// # Errors
    ///
    /// [`EcsError::Unregistered`] or [`EcsError::RepeatedComponent`].
    #[track_caller]
    pub fn iterate_mut<Q: QueryMut>(&mut self) -> EcsResult<QueryIter<Q::IterMut<'_>>> {
        let found = self.query_target::<Q>();
        let (ids, archetype) = self.observe(found)?;
        let Some(archetype) = archetype else {
            return Ok(QueryIter::empty());
        };

        match Q::fetch_mut(&mut self.archetypes[archetype.index()], &ids) {
            Ok(iter) => Ok(QueryIter::new(Some(iter))),
            Err(err) => {
                report_error(&*self.sink, &err);
                Err(err)
            }
        }
    }

    fn query_target<Q: ComponentSet>(&self) -> EcsResult<(Vec<ComponentId>, Option<ArchetypeId>)> {
        let ids = Q::component_ids(&self.components)?;
        let archetype = self.by_signature.get(&Signature::from_ids(&ids)).copied();
        Ok((ids, archetype))
    }

    // ========================================================================
    // ARCHETYPES
    // ========================================================================

    /// Archetype `id`.
    #[inline]
    #[must_use]
    pub fn archetype(&self, id: ArchetypeId) -> Option<&Archetype> {
        self.archetypes.get(id.index())
    }

    /// Archetype with exactly `signature`, if one was ever created.
    #[must_use]
    pub fn archetype_by_signature(&self, signature: &Signature) -> Option<&Archetype> {
        self.by_signature
            .get(signature)
            .map(|id| &self.archetypes[id.index()])
    }

    /// Every archetype, in creation order.
    #[inline]
    #[must_use]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Number of archetypes created so far.
    #[inline]
    #[must_use]
    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    fn archetype_for(&mut self, signature: Signature) -> EcsResult<ArchetypeId> {
        if let Some(&id) = self.by_signature.get(&signature) {
            return Ok(id);
        }

        let id = ArchetypeId::new(self.archetypes.len());
        let archetype = Archetype::new(
            id,
            signature,
            &self.components,
            self.config.initial_column_capacity as usize,
        )?;
        self.archetypes.push(archetype);
        self.by_signature.insert(signature, id);

        tracing::debug!(registry = self.id, archetype = %id, %signature, "archetype created");
        Ok(id)
    }

    /// Archetype reached by adding `component` to `source`, cached both ways.
    fn add_target(&mut self, source: ArchetypeId, component: ComponentId) -> EcsResult<ArchetypeId> {
        if let Some(target) = self.archetypes[source.index()].add_edge(component) {
            return Ok(target);
        }

        let signature = self.archetypes[source.index()].signature().with(component);
        let target = self.archetype_for(signature)?;
        self.archetypes[source.index()].set_add_edge(component, target);
        self.archetypes[target.index()].set_remove_edge(component, source);
        tracing::trace!(from = %source, to = %target, component, "add edge cached");
        Ok(target)
    }

    /// Archetype reached by removing `component` from `source`; `None` for
    /// the empty signature.
    fn remove_target(
        &mut self,
        source: ArchetypeId,
        component: ComponentId,
    ) -> EcsResult<Option<ArchetypeId>> {
        if let Some(target) = self.archetypes[source.index()].remove_edge(component) {
            return Ok(Some(target));
        }

        let signature = self.archetypes[source.index()].signature().without(component);
        if signature.is_empty() {
            return Ok(None);
        }
        let target = self.archetype_for(signature)?;
        self.archetypes[source.index()].set_remove_edge(component, target);
        self.archetypes[target.index()].set_add_edge(component, source);
        tracing::trace!(from = %source, to = %target, component, "remove edge cached");
        Ok(Some(target))
    }

    // ========================================================================
    // DIRECTORY
    // ========================================================================

    fn record(&self, entity: Entity) -> EcsResult<EntityRecord> {
        self.directory
            .get(entity.id())
            .filter(|record| record.entity == entity)
            .copied()
            .ok_or(EcsError::UnknownEntity(entity))
    }

    /// Component id of `T` and the location of `entity`, which must hold it.
    fn locate<T: Component>(&self, entity: Entity) -> EcsResult<(ComponentId, EntityLocation)> {
        let component = self.components.require::<T>()?;
        let missing = EcsError::MissingComponent {
            entity,
            component: type_name::<T>(),
        };
        let location = self.record(entity)?.location.ok_or_else(|| missing.clone())?;
        if self.archetypes[location.archetype.index()]
            .signature()
            .contains(component)
        {
            Ok((component, location))
        } else {
            Err(missing)
        }
    }

    fn set_location(&mut self, entity: Entity, location: Option<EntityLocation>) -> EcsResult<()> {
        let id = entity.id();
        self.directory
            .get_mut(id)
            .ok_or(EcsError::MissingKey(id))?
            .location = location;
        Ok(())
    }

    /// Points the entity that filled a vacated row at that row.
    fn repoint(&mut self, displaced: Option<Entity>, vacated: EntityLocation) -> EcsResult<()> {
        match displaced {
            Some(entity) => self.set_location(entity, Some(vacated)),
            None => Ok(()),
        }
    }

    fn remove_from_archetype(&mut self, location: EntityLocation) -> EcsResult<()> {
        let displaced =
            self.archetypes[location.archetype.index()].remove_entity(location.row as usize)?;
        self.repoint(displaced, location)
    }

    fn release_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.directory.erase(entity.id())?;
        self.entity_ids.release(entity.id())
    }

    /// Checks every archetype's column lengths and every directory record.
    ///
    /// Meant for tests and debug assertions.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let archetypes_ok = self.archetypes.iter().all(Archetype::is_consistent);
        let directory_ok = self.directory.iter().all(|record| match record.location {
            Some(location) => self
                .archetype(location.archetype)
                .and_then(|archetype| archetype.entity_at(location.row as usize))
                == Some(record.entity),
            None => true,
        });
        let rows: usize = self.archetypes.iter().map(Archetype::len).sum();
        let placed = self
            .directory
            .iter()
            .filter(|record| record.location.is_some())
            .count();
        archetypes_ok && directory_ok && rows == placed
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        if let Err(err) = REGISTRY_IDS.lock().release(u32::from(self.id)) {
            tracing::error!(registry = self.id, %err, "failed to release registry id");
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("id", &self.id)
            .field("components", &self.components.len())
            .field("archetypes", &self.archetypes.len())
            .field("entities", &self.directory.len())
            .finish_non_exhaustive()
    }
}
