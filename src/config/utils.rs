use super::schemas::Config;
use super::ConfigError;
/// Configuration utilities - loading, overlays and validation
///
/// Precedence, lowest first:
/// 1. Schema defaults
/// 2. TOML file (`--config <path>` or `walletscan.toml` when present)
/// 3. Environment (`RPC_URL`, `WALLET_ADDRESS`, `WS_URL`)
/// 4. Command-line flags (`--limit`, `--full`, `--no-poll`, `--no-portfolio`)
use crate::arguments;
use crate::logger::{self, LogTag};
use solana_sdk::pubkey::Pubkey;
use std::path::Path;
use std::str::FromStr;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE_PATH: &str = "walletscan.toml";

pub const ENV_RPC_URL: &str = "RPC_URL";
pub const ENV_WALLET_ADDRESS: &str = "WALLET_ADDRESS";
pub const ENV_WS_URL: &str = "WS_URL";

/// Build the complete runtime configuration
///
/// Loads `.env` values already present in the process environment; call
/// `dotenv::dotenv()` before this.
pub fn resolve_config() -> Result<Config, ConfigError> {
    let explicit = arguments::get_config_path();
    let mut config = match explicit.as_deref() {
        Some(path) => load_config_from_path(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE_PATH).exists() => {
            load_config_from_path(DEFAULT_CONFIG_FILE_PATH)?
        }
        None => Config::default(),
    };

    apply_env_overlay(&mut config, |key| std::env::var(key).ok());
    apply_cli_overlay(&mut config);
    finalize_config(&mut config)?;

    logger::debug(
        LogTag::Config,
        &format!(
            "Resolved config: rpc={} ws={} limit={} concurrency={}",
            config.rpc.url,
            config.rpc.ws_url,
            config.inspector.transactions_limit,
            config.inspector.max_concurrent_fetches
        ),
    );

    Ok(config)
}

/// Load configuration from a TOML file
pub fn load_config_from_path(path: &str) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;

    let config = toml::from_str::<Config>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;

    logger::info(LogTag::Config, &format!("Loaded config file '{}'", path));
    Ok(config)
}

/// Overlay environment variables; empty values count as unset
pub fn apply_env_overlay<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = get(ENV_RPC_URL) {
        config.rpc.url = url;
    }
    if let Some(address) = get(ENV_WALLET_ADDRESS) {
        config.inspector.wallet_address = address;
    }
    if let Some(ws) = get(ENV_WS_URL) {
        config.rpc.ws_url = ws;
    }
}

/// Overlay command-line flags
pub fn apply_cli_overlay(config: &mut Config) {
    if let Some(limit) = arguments::get_limit_override() {
        config.inspector.transactions_limit = limit;
    }
    if arguments::is_full_data_enabled() {
        config.inspector.show_full_data = true;
    }
    if arguments::is_poll_disabled() {
        config.poller.enabled = false;
    }
    if arguments::is_portfolio_disabled() {
        config.inspector.show_portfolio = false;
    }
}

/// Check required values, derive the live endpoint, validate sections
pub fn finalize_config(config: &mut Config) -> Result<(), ConfigError> {
    if config.rpc.url.is_empty() {
        return Err(ConfigError::MissingVariable(ENV_RPC_URL));
    }
    validate_url("rpc.url", &config.rpc.url)?;

    if config.inspector.wallet_address.is_empty() {
        return Err(ConfigError::MissingVariable(ENV_WALLET_ADDRESS));
    }
    Pubkey::from_str(&config.inspector.wallet_address).map_err(|e| {
        ConfigError::InvalidAddress {
            value: config.inspector.wallet_address.clone(),
            reason: e.to_string(),
        }
    })?;

    if config.rpc.ws_url.is_empty() {
        config.rpc.ws_url = derive_ws_url(&config.rpc.url);
    }
    validate_url("rpc.ws_url", &config.rpc.ws_url)?;

    config.inspector.validate()?;
    config.poller.validate()?;
    config.registry.validate()?;
    Ok(())
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Live endpoint for an HTTP endpoint: `https://` -> `wss://`, `http://` -> `ws://`
pub fn derive_ws_url(http_url: &str) -> String {
    if let Some(rest) = http_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = http_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        http_url.to_string()
    }
}

/// HTTP endpoint for a live endpoint: `wss://` -> `https://`, `ws://` -> `http://`
pub fn http_url_from_ws(ws_url: &str) -> String {
    if let Some(rest) = ws_url.strip_prefix("wss://") {
        format!("https://{}", rest)
    } else if let Some(rest) = ws_url.strip_prefix("ws://") {
        format!("http://{}", rest)
    } else {
        ws_url.to_string()
    }
}
