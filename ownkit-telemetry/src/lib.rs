//! # ownkit Telemetry
//!
//! Log subscriber setup and Prometheus counters for the ownkit demos.

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
