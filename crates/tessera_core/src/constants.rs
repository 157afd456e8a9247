//! # Compile-Time Capacities
//!
//! Hard limits for every identifier domain. [`RegistryConfig`] may narrow
//! them per registry but never widen them.
//!
//! [`RegistryConfig`]: crate::config::RegistryConfig

/// Runtime identifier of a component type within one registry.
pub type ComponentId = u16;
/// Raw packed entity value (`| version:12 | id:20 |`).
pub type EntityValue = u32;
/// Identifier of a registry instance.
pub type RegistryId = u16;

/// Sentinel component id; never handed out.
pub const COMPONENT_NULL_ID: ComponentId = 0xff;
/// Width of a [`Signature`](crate::ecs::Signature) in bits.
pub const MAX_COMPONENTS: usize = COMPONENT_NULL_ID as usize + 1;

/// Sentinel registry id; never handed out.
pub const REGISTRY_NULL_ID: RegistryId = 0xffff;
/// Size of the registry id domain.
pub const MAX_REGISTRIES: u32 = REGISTRY_NULL_ID as u32 + 1;

/// Packed value of the null entity.
pub const ENTITY_NULL: EntityValue = 0xffff_ffff;
/// Sentinel entity id; never handed out.
pub const ENTITY_NULL_ID: EntityValue = 0x000f_ffff;
/// Number of entity ids a registry can hand out.
pub const MAX_ENTITIES: u32 = ENTITY_NULL_ID;
/// Bits of an [`EntityValue`] holding the id.
pub const ENTITY_ID_MASK: EntityValue = ENTITY_NULL_ID;
/// Bits of an [`EntityValue`] holding the reserved version.
pub const ENTITY_VERSION_MASK: EntityValue = 0xfff0_0000;
/// Shift from version bits to a plain version number.
pub const ENTITY_VERSION_SHIFT: u32 = 20;

/// Number of keys covered by one sparse page.
pub const SPARSE_PAGE_SIZE: u32 = 1024;

const _: () = assert!(ENTITY_ID_MASK & ENTITY_VERSION_MASK == 0);
const _: () = assert!(ENTITY_ID_MASK | ENTITY_VERSION_MASK == ENTITY_NULL);
const _: () = assert!(MAX_COMPONENTS % 64 == 0);
