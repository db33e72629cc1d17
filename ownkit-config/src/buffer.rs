//! Buffer sizing defaults.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct BufferConfig {
    /// Capacity used when a buffer is created without an explicit size
    /// (bytes, terminator included).
    #[validate(range(min = 1, max = 1048576))]
    pub default_capacity: usize,

    /// Capacity of the buffer a `BufferOwner` builds for itself.
    #[validate(range(min = 1, max = 4096))]
    pub owner_capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            default_capacity: 115,
            owner_capacity: 10,
        }
    }
}
