//! Configuration system
//!
//! Sections are declared with `config_struct!` in `schemas`, loaded and
//! overlaid in `utils`. The resolved `Config` is passed explicitly to the
//! services that need it.

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{Config, InspectorConfig, PollerConfig, RegistryConfig, RpcConfig};
pub use utils::{
    apply_cli_overlay, apply_env_overlay, derive_ws_url, finalize_config, http_url_from_ws,
    load_config_from_path, resolve_config, DEFAULT_CONFIG_FILE_PATH,
};

use thiserror::Error;

/// Startup configuration failures; all of them are fatal
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVariable(&'static str),

    #[error("invalid URL in {field} ('{value}'): {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid wallet address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
