//! ## ownkit-core::alloc
//! **Fixed-size bucket allocator**
//!
//! ### Key Submodules:
//! - `heap/`: `BucketHeap`, first-fit allocation over equally sized blocks
//! - `stats/`: allocation counters kept by each heap

pub mod heap;
pub mod stats;

use crate::error::CoreError;

pub use heap::{global, BlockHandle, BucketHeap, SearchPolicy};
pub use stats::HeapStats;

/// `vec![value; len]` that reports a failed or oversized allocation instead
/// of panicking.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, CoreError> {
    let mut items = Vec::new();
    items
        .try_reserve_exact(len)
        .map_err(|_| CoreError::OutOfMemory {
            requested: len.saturating_mul(std::mem::size_of::<T>()),
            available: 0,
        })?;
    items.resize(len, value);
    Ok(items)
}
