//! Entity handles and directory records.

use std::fmt;

use crate::constants::{
    EntityValue, ENTITY_ID_MASK, ENTITY_NULL, ENTITY_VERSION_MASK, ENTITY_VERSION_SHIFT,
};
use crate::ecs::archetype::ArchetypeId;
use crate::storage::SparseKey;

/// An opaque entity handle.
///
/// Packs an id (low 20 bits) and a reserved version (high 12 bits). The
/// version is carried but never checked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(EntityValue);

impl Entity {
    /// The null entity.
    pub const NULL: Self = Self(ENTITY_NULL);

    /// Packs an id and a version.
    #[inline]
    #[must_use]
    pub const fn new(id: u32, version: u32) -> Self {
        Self((id & ENTITY_ID_MASK) | ((version << ENTITY_VERSION_SHIFT) & ENTITY_VERSION_MASK))
    }

    /// Wraps a raw packed value.
    #[inline]
    #[must_use]
    pub const fn from_value(value: EntityValue) -> Self {
        Self(value)
    }

    /// The id bits.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0 & ENTITY_ID_MASK
    }

    /// The version bits, shifted down.
    #[inline]
    #[must_use]
    pub const fn version(self) -> u32 {
        (self.0 & ENTITY_VERSION_MASK) >> ENTITY_VERSION_SHIFT
    }

    /// The raw packed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> EntityValue {
        self.0
    }

    /// Returns `true` for [`Entity::NULL`].
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == ENTITY_NULL
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.id(), self.version())
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("null")
        } else {
            write!(f, "#{}", self.id())
        }
    }
}

/// Where an entity's components live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityLocation {
    /// Archetype holding the entity.
    pub archetype: ArchetypeId,
    /// Row within every column of that archetype.
    pub row: u32,
}

/// Directory entry of a live entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EntityRecord {
    pub entity: Entity,
    /// `None` while the entity holds no components.
    pub location: Option<EntityLocation>,
}

impl EntityRecord {
    pub const fn new(entity: Entity) -> Self {
        Self {
            entity,
            location: None,
        }
    }
}

impl SparseKey for EntityRecord {
    #[inline]
    fn sparse_key(&self) -> u32 {
        self.entity.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing() {
        let entity = Entity::new(42, 3);
        assert_eq!(entity.id(), 42);
        assert_eq!(entity.version(), 3);
        assert_eq!(entity.value(), (3 << 20) | 42);
    }

    #[test]
    fn test_id_truncated_to_mask() {
        let entity = Entity::new(0x0010_0001, 0);
        assert_eq!(entity.id(), 1);
    }

    #[test]
    fn test_null() {
        assert!(Entity::NULL.is_null());
        assert!(Entity::default().is_null());
        assert!(!Entity::new(0, 0).is_null());
        assert_eq!(Entity::NULL.to_string(), "null");
        assert_eq!(Entity::new(7, 0).to_string(), "#7");
    }
}
