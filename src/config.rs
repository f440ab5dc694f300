//! Index map configuration
//!
//! Settings are plain serde data so they can live in a host application's
//! config file alongside its other sections.

use serde::{Deserialize, Serialize};

/// Default collection name used in log events.
pub const DEFAULT_NAME: &str = "indexmap";

/// Configuration for an `IndexMap`.
///
/// # Example
///
/// ```toml
/// # Name attached to every log event emitted by this collection
/// name = "replicas"
///
/// # Entries to pre-allocate in the primary index
/// initial_capacity = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMapConfig {
    /// Collection name, attached to log events as the `map` field.
    #[serde(default = "default_name")]
    pub name: String,
    /// Entries to pre-allocate in the primary index (default: 0).
    #[serde(default)]
    pub initial_capacity: usize,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl Default for IndexMapConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            initial_capacity: 0,
        }
    }
}

impl IndexMapConfig {
    /// Set the collection name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the number of entries to pre-allocate
    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}
