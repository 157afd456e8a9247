//! # Entity Component System
//!
//! Signatures, archetypes, the migration protocol and the registry that
//! ties them together.
//!
//! ## Design Philosophy
//!
//! - Entities are plain integer handles; their data lives in archetypes
//! - One archetype per exact component set, one packed column per component
//! - Archetypes live in an arena and are addressed by stable index
//! - Add/remove transitions between archetypes are memoized per component

mod archetype;
mod bundle;
mod entity;
mod query;
mod registry;
mod signature;

pub use archetype::{Archetype, ArchetypeId};
pub use bundle::Bundle;
pub use entity::{Entity, EntityLocation};
pub use query::{ComponentSet, Lockstep, Query, QueryIter, QueryMut};
pub use registry::{Registry, SharedSink};
pub use signature::{Signature, SignatureIter};
