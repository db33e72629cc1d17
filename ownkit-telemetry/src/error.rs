use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Unknown log level: {0}")]
    InvalidLevel(String),

    #[error("Failed to install log subscriber: {0}")]
    Subscriber(String),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Metrics output is not UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}
