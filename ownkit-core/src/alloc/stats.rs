//! ## ownkit-core::alloc::stats
//! **Allocation counters for `BucketHeap`**
//!
//! Plain counters, updated through `&mut` by the heap that owns them. Copy the
//! struct out with [`BucketHeap::stats`](super::heap::BucketHeap::stats) to
//! report it.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    allocations: usize,
    failed_allocations: usize,
    frees: usize,
    ignored_frees: usize,
    in_use: usize,
    peak_in_use: usize,
}

impl HeapStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful allocation that left `in_use` blocks claimed.
    #[inline]
    pub fn record_allocation(&mut self, in_use: usize) {
        self.allocations += 1;
        self.in_use = in_use;
        self.peak_in_use = self.peak_in_use.max(in_use);
    }

    #[inline]
    pub fn record_failed_allocation(&mut self) {
        self.failed_allocations += 1;
    }

    #[inline]
    pub fn record_free(&mut self, in_use: usize) {
        self.frees += 1;
        self.in_use = in_use;
    }

    /// A `free` that matched no outstanding block.
    #[inline]
    pub fn record_ignored_free(&mut self) {
        self.ignored_frees += 1;
    }

    pub fn allocations(&self) -> usize {
        self.allocations
    }

    pub fn failed_allocations(&self) -> usize {
        self.failed_allocations
    }

    pub fn frees(&self) -> usize {
        self.frees
    }

    pub fn ignored_frees(&self) -> usize {
        self.ignored_frees
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn peak_in_use(&self) -> usize {
        self.peak_in_use
    }
}
