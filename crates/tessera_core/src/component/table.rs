//! Per-registry mapping from Rust types to component ids.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use super::ops::{Component, ComponentOps};
use crate::constants::ComponentId;
use crate::error::{EcsError, EcsResult, IdKind};
use crate::storage::IdPool;

/// A registered component type.
#[derive(Clone, Copy, Debug)]
pub struct ComponentInfo {
    /// Id assigned at registration.
    pub id: ComponentId,
    /// Operations every column of this type is bound to.
    pub ops: ComponentOps,
}

/// Component types known to one registry.
///
/// Ids are dense, handed out in registration order and never reused while
/// the table lives.
#[derive(Debug)]
pub struct ComponentTable {
    ids: IdPool,
    by_type: HashMap<TypeId, ComponentId>,
    infos: Vec<ComponentInfo>,
}

impl ComponentTable {
    /// Creates an empty table that accepts up to `capacity` types.
    #[must_use]
    pub fn new(capacity: ComponentId) -> Self {
        Self {
            ids: IdPool::new(IdKind::Component, u32::from(capacity)),
            by_type: HashMap::new(),
            infos: Vec::new(),
        }
    }

    /// Registers `T` without clone support.
    ///
    /// # Errors
    ///
    /// [`EcsError::AlreadyRegistered`] or [`EcsError::CapacityExhausted`].
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentId> {
        self.insert(ComponentOps::of::<T>())
    }

    /// Registers `T` with clone support.
    ///
    /// # Errors
    ///
    /// [`EcsError::AlreadyRegistered`] or [`EcsError::CapacityExhausted`].
    pub fn register_cloneable<T: Component + Clone>(&mut self) -> EcsResult<ComponentId> {
        self.insert(ComponentOps::cloneable::<T>())
    }

    fn insert(&mut self, ops: ComponentOps) -> EcsResult<ComponentId> {
        if self.by_type.contains_key(&ops.type_id()) {
            return Err(EcsError::AlreadyRegistered(ops.name()));
        }

        // Pool capacity never exceeds `ComponentId::MAX`.
        let id = self.ids.allocate()? as ComponentId;
        self.by_type.insert(ops.type_id(), id);
        self.infos.push(ComponentInfo { id, ops });

        tracing::debug!(component = ops.name(), id, "component registered");
        Ok(id)
    }

    /// Id of `T`, if registered.
    #[inline]
    #[must_use]
    pub fn id_of<T: Component>(&self) -> Option<ComponentId> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Id of `T`.
    ///
    /// # Errors
    ///
    /// [`EcsError::Unregistered`] if `T` was never registered.
    pub fn require<T: Component>(&self) -> EcsResult<ComponentId> {
        self.id_of::<T>()
            .ok_or_else(|| EcsError::Unregistered(type_name::<T>()))
    }

    /// Registration record of `id`.
    #[inline]
    #[must_use]
    pub fn info(&self, id: ComponentId) -> Option<&ComponentInfo> {
        self.infos.get(usize::from(id))
    }

    /// Number of registered types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Iterates over every registration in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, ComponentInfo> {
        self.infos.iter()
    }
}
