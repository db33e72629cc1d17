//! ## ownkit-core::alloc::heap
//! **Fixed-size bucket allocator**
//!
//! `BucketHeap` owns one contiguous slab split into `block_count` blocks of
//! `block_size` bytes, plus an in-use flag per block. Allocation claims one
//! whole free block; release looks the block up by address and clears its
//! flag. There is no coalescing and no variable sizing.
//!
//! All mutation goes through `&mut self` and nothing locks internally. Callers
//! that share a heap across threads must wrap it themselves, as [`global`]
//! does.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::stats::HeapStats;
use super::try_filled;
use crate::error::CoreError;

/// How `allocate` finds a free block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchPolicy {
    /// First free block in index order.
    #[default]
    LinearScan,
    /// Most recently freed block first, from a stack of free indices.
    FreeStack,
}

impl SearchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchPolicy::LinearScan => "linear-scan",
            SearchPolicy::FreeStack => "free-stack",
        }
    }
}

impl fmt::Display for SearchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear-scan" => Ok(SearchPolicy::LinearScan),
            "free-stack" => Ok(SearchPolicy::FreeStack),
            other => Err(CoreError::invalid(format!(
                "unknown search policy '{other}' (expected linear-scan or free-stack)"
            ))),
        }
    }
}

/// Identifies one claimed block: its index and the address of its first byte.
///
/// A handle only reaches memory through the heap that issued it, and only
/// while the block is still claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHandle {
    index: usize,
    addr: usize,
}

impl BlockHandle {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn addr(&self) -> usize {
        self.addr
    }
}

pub struct BucketHeap {
    slab: Box<[u8]>,
    block_size: usize,
    in_use: Vec<bool>,
    free_stack: Vec<usize>,
    policy: SearchPolicy,
    claimed: usize,
    stats: HeapStats,
}

impl BucketHeap {
    pub const DEFAULT_BLOCK_COUNT: usize = 10;
    pub const DEFAULT_BLOCK_SIZE: usize = 4096;

    /// Creates a linear-scan heap.
    pub fn new(block_count: usize, block_size: usize) -> Result<Self, CoreError> {
        Self::with_policy(block_count, block_size, SearchPolicy::default())
    }

    /// # Errors
    ///
    /// - `CoreError::InvalidArgument` if either dimension is zero or the slab
    ///   size overflows `usize`
    /// - `CoreError::OutOfMemory` if the slab or block table cannot be
    ///   allocated
    pub fn with_policy(
        block_count: usize,
        block_size: usize,
        policy: SearchPolicy,
    ) -> Result<Self, CoreError> {
        if block_count == 0 {
            return Err(CoreError::invalid("block count must be at least 1"));
        }
        if block_size == 0 {
            return Err(CoreError::invalid("block size must be at least 1"));
        }
        let total = block_count.checked_mul(block_size).ok_or_else(|| {
            CoreError::invalid(format!(
                "{block_count} blocks of {block_size} bytes overflow the address space"
            ))
        })?;

        // Reversed so that `pop` hands out index 0 first.
        let free_stack = match policy {
            SearchPolicy::LinearScan => Vec::new(),
            SearchPolicy::FreeStack => {
                let mut stack = try_filled(block_count, 0usize)?;
                stack
                    .iter_mut()
                    .zip((0..block_count).rev())
                    .for_each(|(slot, index)| *slot = index);
                stack
            }
        };

        let heap = Self {
            slab: try_filled(total, 0u8)?.into_boxed_slice(),
            block_size,
            in_use: try_filled(block_count, false)?,
            free_stack,
            policy,
            claimed: 0,
            stats: HeapStats::new(),
        };
        debug!(block_count, block_size, %policy, "created bucket heap");
        Ok(heap)
    }

    /// Claims one free block able to hold `size` bytes.
    ///
    /// # Errors
    ///
    /// `CoreError::OutOfMemory` when `size` exceeds the block size or every
    /// block is claimed.
    pub fn allocate(&mut self, size: usize) -> Result<BlockHandle, CoreError> {
        if size > self.block_size {
            self.stats.record_failed_allocation();
            warn!(
                requested = size,
                block_size = self.block_size,
                "request larger than a block"
            );
            return Err(CoreError::OutOfMemory {
                requested: size,
                available: self.block_size,
            });
        }

        let found = match self.policy {
            SearchPolicy::LinearScan => self.in_use.iter().position(|used| !used),
            SearchPolicy::FreeStack => self.free_stack.pop(),
        };

        let Some(index) = found else {
            self.stats.record_failed_allocation();
            warn!(
                requested = size,
                blocks = self.block_count(),
                "all blocks in use"
            );
            return Err(CoreError::OutOfMemory {
                requested: size,
                available: 0,
            });
        };

        self.in_use[index] = true;
        self.claimed += 1;
        self.stats.record_allocation(self.claimed);

        let handle = BlockHandle {
            index,
            addr: self.block_addr(index),
        };
        debug!(index, addr = handle.addr, size, "block allocated");
        Ok(handle)
    }

    /// Releases the block whose address matches `handle`.
    ///
    /// A handle that matches no claimed block of this heap (foreign, or
    /// already freed) is ignored. Returns whether a block was released.
    pub fn free(&mut self, handle: BlockHandle) -> bool {
        let found = (0..self.block_count()).find(|&i| self.block_addr(i) == handle.addr);

        match found {
            Some(index) if self.in_use[index] => {
                self.in_use[index] = false;
                self.claimed -= 1;
                if self.policy == SearchPolicy::FreeStack {
                    self.free_stack.push(index);
                }
                self.stats.record_free(self.claimed);
                debug!(index, addr = handle.addr, "block freed");
                true
            }
            _ => {
                self.stats.record_ignored_free();
                debug!(addr = handle.addr, "free of unowned address ignored");
                false
            }
        }
    }

    /// Contents of a claimed block.
    pub fn block(&self, handle: &BlockHandle) -> Option<&[u8]> {
        let range = self.claimed_range(handle)?;
        Some(&self.slab[range])
    }

    pub fn block_mut(&mut self, handle: &BlockHandle) -> Option<&mut [u8]> {
        let range = self.claimed_range(handle)?;
        Some(&mut self.slab[range])
    }

    fn claimed_range(&self, handle: &BlockHandle) -> Option<std::ops::Range<usize>> {
        let claimed = self.in_use.get(handle.index).copied().unwrap_or(false);
        if !claimed || self.block_addr(handle.index) != handle.addr {
            return None;
        }
        let start = handle.index * self.block_size;
        Some(start..start + self.block_size)
    }

    #[inline]
    fn block_addr(&self, index: usize) -> usize {
        self.slab.as_ptr() as usize + index * self.block_size
    }

    /// Whether `handle` currently refers to a claimed block of this heap.
    pub fn owns(&self, handle: &BlockHandle) -> bool {
        self.claimed_range(handle).is_some()
    }

    pub fn block_count(&self) -> usize {
        self.in_use.len()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    pub fn in_use(&self) -> usize {
        self.claimed
    }

    pub fn available(&self) -> usize {
        self.block_count() - self.claimed
    }

    pub fn is_full(&self) -> bool {
        self.available() == 0
    }

    pub fn stats(&self) -> HeapStats {
        self.stats
    }
}

impl Default for BucketHeap {
    fn default() -> Self {
        Self {
            slab: vec![0u8; Self::DEFAULT_BLOCK_COUNT * Self::DEFAULT_BLOCK_SIZE]
                .into_boxed_slice(),
            block_size: Self::DEFAULT_BLOCK_SIZE,
            in_use: vec![false; Self::DEFAULT_BLOCK_COUNT],
            free_stack: Vec::new(),
            policy: SearchPolicy::LinearScan,
            claimed: 0,
            stats: HeapStats::new(),
        }
    }
}

impl fmt::Debug for BucketHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketHeap")
            .field("block_count", &self.block_count())
            .field("block_size", &self.block_size)
            .field("policy", &self.policy)
            .field("in_use", &self.claimed)
            .finish()
    }
}

static GLOBAL_HEAP: Lazy<Mutex<BucketHeap>> = Lazy::new(|| Mutex::new(BucketHeap::default()));

/// Process-wide heap with the default layout, created on first use.
pub fn global() -> &'static Mutex<BucketHeap> {
    &GLOBAL_HEAP
}
