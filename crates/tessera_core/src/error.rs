//! # Storage Error Types
//!
//! Every failure the engine can detect, graded by how bad it is.
//!
//! Errors are returned, never thrown across layers. The registry reports
//! each one to its diagnostic sink at the point it is returned, so a caller
//! that ignores the `Err` still leaves a trace.

use std::fmt;

use tessera_diagnostics::Severity;
use thiserror::Error;

use crate::ecs::Entity;

/// Which identifier domain a pool serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// Entity ids within one registry.
    Entity,
    /// Component ids within one registry.
    Component,
    /// Registry ids within the process.
    Registry,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entity => "entity",
            Self::Component => "component",
            Self::Registry => "registry",
        })
    }
}

/// Errors that can occur in the storage engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// An identifier pool has handed out every id it owns.
    #[error("{kind} identifier pool exhausted: capacity {capacity}")]
    CapacityExhausted {
        /// Domain of the exhausted pool.
        kind: IdKind,
        /// Number of ids the pool owns.
        capacity: u32,
    },

    /// An id was released that the pool never handed out, or released twice.
    #[error("{kind} identifier {id} is not allocated")]
    InvalidId {
        /// Domain of the pool.
        kind: IdKind,
        /// Offending id.
        id: u32,
    },

    /// Dense index past the live length of an array.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Live length at the time of the request.
        len: usize,
    },

    /// Sparse key outside the domain of a paged array.
    #[error("key {key} out of range: maximum {max}")]
    KeyOutOfRange {
        /// Requested key.
        key: u32,
        /// Size of the key domain.
        max: u32,
    },

    /// No page backs the requested key.
    #[error("no storage page backs key {0}")]
    MissingPage(u32),

    /// The page exists but the key holds no value.
    #[error("key {0} holds no value")]
    MissingKey(u32),

    /// The key already maps to a value.
    #[error("key {0} is already present")]
    DuplicateKey(u32),

    /// Typed access to a column bound to a different type.
    #[error("component type mismatch: column holds {expected}, accessed as {found}")]
    TypeMismatch {
        /// Type the column is bound to.
        expected: &'static str,
        /// Type the caller asked for.
        found: &'static str,
    },

    /// A component type was registered twice in one registry.
    #[error("component {0} is already registered")]
    AlreadyRegistered(&'static str),

    /// A component type was used before registration.
    #[error("component {0} is not registered")]
    Unregistered(&'static str),

    /// Attaching a component the entity already holds.
    #[error("entity {entity} already has component {component}")]
    DuplicateComponent {
        /// Target entity.
        entity: Entity,
        /// Component type name.
        component: &'static str,
    },

    /// Reading or detaching a component the entity does not hold.
    #[error("entity {entity} has no component {component}")]
    MissingComponent {
        /// Target entity.
        entity: Entity,
        /// Component type name.
        component: &'static str,
    },

    /// The entity is not alive in this registry.
    #[error("unknown entity {0}")]
    UnknownEntity(Entity),

    /// Clone requested for a type registered without clone support.
    #[error("component {0} cannot be cloned")]
    NotCloneable(&'static str),

    /// A bundle with no components.
    #[error("component bundle is empty")]
    EmptyBundle,

    /// The same component type appears twice in one bundle or query.
    #[error("component {0} listed more than once")]
    RepeatedComponent(&'static str),

    /// A configuration value outside the compile-time bounds.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EcsError {
    /// Severity this error is reported with.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::CapacityExhausted { .. } | Self::MissingPage(_) | Self::MissingKey(_) => {
                Severity::Fatal
            }
            _ => Severity::Error,
        }
    }

    /// Returns `true` if the error signals a broken invariant or hard limit.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.severity(), Severity::Fatal)
    }
}

/// Result type for storage operations.
pub type EcsResult<T> = Result<T, EcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_grading() {
        let exhausted = EcsError::CapacityExhausted {
            kind: IdKind::Entity,
            capacity: 4,
        };
        assert!(exhausted.is_fatal());
        assert!(EcsError::MissingPage(3).is_fatal());
        assert_eq!(
            EcsError::IndexOutOfBounds { index: 3, len: 2 }.severity(),
            Severity::Error
        );
        assert_eq!(EcsError::AlreadyRegistered("i32").severity(), Severity::Error);
    }

    #[test]
    fn test_display() {
        let err = EcsError::CapacityExhausted {
            kind: IdKind::Entity,
            capacity: 4,
        };
        assert_eq!(err.to_string(), "entity identifier pool exhausted: capacity 4");
    }
}
