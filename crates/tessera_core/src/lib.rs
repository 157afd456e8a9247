//! # TESSERA Core
//!
//! Archetype-based entity/component storage engine.
//!
//! - Components are stored in type-erased, densely packed columns
//! - Entities sharing one exact component set share one archetype
//! - Attaching or detaching a component migrates the entity's row between
//!   archetypes without cloning its data
//!
//! ## Layers
//!
//! ```text
//! Registry ──> Archetype ──> ComponentArray ──> ComponentOps
//!    │
//!    ├── IdPool            (entity ids)
//!    └── SparseSet         (entity id -> archetype + row)
//!          └── PagedArray
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::prelude::*;
//!
//! let mut registry = Registry::new().unwrap();
//! registry.register_component::<i32>().unwrap();
//! registry.register_component::<f32>().unwrap();
//!
//! let x = registry.spawn((5i32, 7.0f32)).unwrap();
//! let y = registry.spawn((4i32, 3.5f32)).unwrap();
//!
//! let total: i32 = registry
//!     .iterate::<(i32, f32)>()
//!     .unwrap()
//!     .map(|(number, _)| *number)
//!     .sum();
//! assert_eq!(total, 9);
//!
//! registry.destroy_entity(x).unwrap();
//! assert_eq!(*registry.get::<i32>(y).unwrap(), 4);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod component;
pub mod config;
pub mod constants;
pub mod ecs;
pub mod error;
pub mod storage;

pub use component::{Component, ComponentArray, ComponentOps, ComponentTable};
pub use config::RegistryConfig;
pub use ecs::{
    Archetype, ArchetypeId, Bundle, Entity, EntityLocation, Query, QueryMut, Registry, Signature,
};
pub use error::{EcsError, EcsResult, IdKind};
pub use tessera_diagnostics as diagnostics;

/// Common imports.
pub mod prelude {
    pub use crate::config::RegistryConfig;
    pub use crate::ecs::{Entity, Registry, Signature};
    pub use crate::error::{EcsError, EcsResult};
    pub use tessera_diagnostics::{DiagnosticLog, Severity};
}
