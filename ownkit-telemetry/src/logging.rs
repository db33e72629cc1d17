//! ## ownkit-telemetry::logging
//! **`tracing-subscriber` setup**
//!
//! The configured level becomes the default directive; `RUST_LOG`, when set,
//! adds to or overrides it.

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::TelemetryError;

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global fmt subscriber.
    ///
    /// Fails if `level` is not a log level or a subscriber is already set.
    pub fn init(level: &str) -> Result<(), TelemetryError> {
        fmt()
            .with_env_filter(Self::filter(level)?)
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|e| TelemetryError::Subscriber(e.to_string()))
    }

    /// Builds the filter `init` uses.
    pub fn filter(level: &str) -> Result<EnvFilter, TelemetryError> {
        let level: Level = level
            .parse()
            .map_err(|_| TelemetryError::InvalidLevel(level.to_owned()))?;

        Ok(EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(level).into())
            .from_env_lossy())
    }
}
