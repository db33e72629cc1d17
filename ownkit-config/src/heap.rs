//! Bucket heap layout.
//!
//! - Block count and block size (fixed for the heap's lifetime)
//! - Free-block search policy

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct HeapConfig {
    /// Number of blocks in the heap.
    #[validate(range(min = 1, max = 65536))]
    pub block_count: usize,

    /// Size of every block (bytes, must be a power of two).
    #[validate(range(min = 16, max = 1048576))]
    #[validate(custom(function = validation::validate_power_of_two))]
    pub block_size: usize,

    /// `linear-scan` or `free-stack`.
    #[validate(custom(function = validation::validate_policy))]
    pub policy: String,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            block_count: 10,
            block_size: 4096,
            policy: "linear-scan".into(),
        }
    }
}
