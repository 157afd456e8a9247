//! # Components
//!
//! Type-erased component storage.
//!
//! - [`ComponentOps`] - per-type table of move/clone/drop operations
//! - [`ComponentArray`] - a growable column bound to one table
//! - [`ComponentTable`] - the types a registry knows, and their ids

mod array;
mod ops;
mod table;

pub use array::ComponentArray;
pub use ops::{Component, ComponentOps};
pub use table::{ComponentInfo, ComponentTable};
