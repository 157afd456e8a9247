//! # Registry Configuration
//!
//! Per-registry capacities, loaded once at startup from TOML.
//!
//! ```toml
//! entity_capacity = 65536
//! component_capacity = 64
//! sparse_page_size = 512
//! initial_column_capacity = 16
//! ```
//!
//! Every field is optional; missing fields take the compile-time maxima
//! from [`constants`](crate::constants).

use serde::{Deserialize, Serialize};

use crate::constants::{COMPONENT_NULL_ID, MAX_ENTITIES, SPARSE_PAGE_SIZE};
use crate::error::{EcsError, EcsResult};

/// Capacities of one registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Entity ids the registry may hand out (`1..=MAX_ENTITIES`).
    pub entity_capacity: u32,
    /// Component types the registry may register (`1..=COMPONENT_NULL_ID`).
    pub component_capacity: u16,
    /// Keys per page of the entity directory.
    pub sparse_page_size: u32,
    /// Elements reserved up front in every new component column
    /// (`0..=entity_capacity`).
    pub initial_column_capacity: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            entity_capacity: MAX_ENTITIES,
            component_capacity: COMPONENT_NULL_ID,
            sparse_page_size: SPARSE_PAGE_SIZE,
            initial_column_capacity: 0,
        }
    }
}

impl RegistryConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if the document does not parse or a value
    /// is outside its bounds.
    pub fn from_toml_str(source: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|err| EcsError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to a TOML document.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> EcsResult<String> {
        toml::to_string(self).map_err(|err| EcsError::InvalidConfig(err.to_string()))
    }

    /// Checks every value against the compile-time bounds.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> EcsResult<()> {
        if self.entity_capacity == 0 || self.entity_capacity > MAX_ENTITIES {
            return Err(EcsError::InvalidConfig(format!(
                "entity_capacity {} outside 1..={MAX_ENTITIES}",
                self.entity_capacity
            )));
        }
        if self.component_capacity == 0 || self.component_capacity > COMPONENT_NULL_ID {
            return Err(EcsError::InvalidConfig(format!(
                "component_capacity {} outside 1..={COMPONENT_NULL_ID}",
                self.component_capacity
            )));
        }
        if self.sparse_page_size == 0 || self.sparse_page_size > MAX_ENTITIES {
            return Err(EcsError::InvalidConfig(format!(
                "sparse_page_size {} outside 1..={MAX_ENTITIES}",
                self.sparse_page_size
            )));
        }
        if self.initial_column_capacity > self.entity_capacity {
            return Err(EcsError::InvalidConfig(format!(
                "initial_column_capacity {} outside 0..={}",
                self.initial_column_capacity, self.entity_capacity
            )));
        }
        Ok(())
    }
}
