//! ## ownkit-telemetry::metrics
//! **Prometheus counters for heap and buffer activity**
//!
//! Heap counters are synced from a `HeapStats` snapshot rather than bumped on
//! every call, so the recorder stays out of the allocator's hot path. Use one
//! recorder per heap.

use ownkit_core::alloc::HeapStats;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::error::TelemetryError;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub allocations: IntCounter,
    pub failed_allocations: IntCounter,
    pub frees: IntCounter,
    pub ignored_frees: IntCounter,
    pub blocks_in_use: IntGauge,
    pub peak_blocks_in_use: IntGauge,
    pub buffer_appends: IntCounterVec,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let allocations =
            IntCounter::new("ownkit_heap_allocations_total", "Blocks handed out")?;
        let failed_allocations = IntCounter::new(
            "ownkit_heap_failed_allocations_total",
            "Allocation requests refused with OutOfMemory",
        )?;
        let frees = IntCounter::new("ownkit_heap_frees_total", "Blocks returned")?;
        let ignored_frees = IntCounter::new(
            "ownkit_heap_ignored_frees_total",
            "Frees that matched no claimed block",
        )?;
        let blocks_in_use = IntGauge::new("ownkit_heap_blocks_in_use", "Blocks currently claimed")?;
        let peak_blocks_in_use = IntGauge::new(
            "ownkit_heap_peak_blocks_in_use",
            "Highest number of blocks claimed at once",
        )?;
        let buffer_appends = IntCounterVec::new(
            Opts::new("ownkit_buffer_appends_total", "Line appends by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(allocations.clone()))?;
        registry.register(Box::new(failed_allocations.clone()))?;
        registry.register(Box::new(frees.clone()))?;
        registry.register(Box::new(ignored_frees.clone()))?;
        registry.register(Box::new(blocks_in_use.clone()))?;
        registry.register(Box::new(peak_blocks_in_use.clone()))?;
        registry.register(Box::new(buffer_appends.clone()))?;

        Ok(Self {
            registry,
            allocations,
            failed_allocations,
            frees,
            ignored_frees,
            blocks_in_use,
            peak_blocks_in_use,
            buffer_appends,
        })
    }

    /// Brings the heap metrics up to date with `stats`.
    pub fn record_heap(&self, stats: &HeapStats) {
        sync_counter(&self.allocations, stats.allocations());
        sync_counter(&self.failed_allocations, stats.failed_allocations());
        sync_counter(&self.frees, stats.frees());
        sync_counter(&self.ignored_frees, stats.ignored_frees());
        self.blocks_in_use.set(stats.in_use() as i64);
        self.peak_blocks_in_use.set(stats.peak_in_use() as i64);
    }

    pub fn record_append(&self, accepted: bool) {
        let outcome = if accepted { "accepted" } else { "rejected" };
        self.buffer_appends.with_label_values(&[outcome]).inc();
    }

    pub fn gather_metrics(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

// Counters only move forward; a smaller total means a different heap fed
// this recorder and is ignored.
fn sync_counter(counter: &IntCounter, total: usize) {
    let total = total as u64;
    let seen = counter.get();
    if total > seen {
        counter.inc_by(total - seen);
    }
}
