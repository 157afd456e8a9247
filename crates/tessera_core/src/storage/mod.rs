//! # Sparse Storage
//!
//! The index structures underneath the registry.
//!
//! - [`IdPool`] hands out and recycles integer ids.
//! - [`PagedArray`] maps a large, sparsely used key domain to values,
//!   allocating only the pages in use.
//! - [`SparseSet`] keeps values packed while addressing them by key.

mod id_pool;
mod paged;
mod sparse_set;

pub use id_pool::IdPool;
pub use paged::PagedArray;
pub use sparse_set::{SparseKey, SparseSet};
