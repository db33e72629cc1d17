use ownkit_config::ConfigError;
use ownkit_core::CoreError;
use ownkit_telemetry::TelemetryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("Failed to render configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
