//! # ownkit Configuration
//!
//! Layered configuration for the ownkit buffer, heap and telemetry settings.
//!
//! ## Sources, lowest precedence first
//! 1. Built-in defaults
//! 2. `config/ownkit.yaml`
//! 3. `config/<OWNKIT_ENV>.yaml`
//! 4. `OWNKIT_*` environment variables, nested keys split on `__`
//!    (e.g. `OWNKIT_HEAP__BLOCK_COUNT=32`)

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

mod buffer;
mod error;
mod heap;
mod telemetry;
mod validation;

pub use buffer::BufferConfig;
pub use error::ConfigError;
pub use heap::HeapConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/ownkit.yaml";
const ENV_PREFIX: &str = "OWNKIT_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
#[serde(default)]
pub struct OwnkitConfig {
    #[validate(nested)]
    pub buffer: BufferConfig,

    #[validate(nested)]
    pub heap: HeapConfig,

    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl OwnkitConfig {
    /// Load configuration from the default files and environment.
    ///
    /// Missing files are skipped; the result is validated before it is
    /// returned.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(OwnkitConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        } else {
            debug!("{BASE_FILE} not found, using default configuration");
        }

        let env = std::env::var("OWNKIT_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::finish(figment)
    }

    /// Load configuration from a specific file, still honouring `OWNKIT_*`
    /// overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        Self::finish(
            Figment::from(Serialized::defaults(OwnkitConfig::default())).merge(Yaml::file(path)),
        )
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
