/// Configuration schemas - all config sections defined once with defaults
///
/// Each section uses `config_struct!`, so a TOML file only needs to name
/// the keys it overrides.
use crate::config_struct;
use crate::constants::{
    DEFAULT_POLL_INTERVAL_SECS, JUPITER_ALL_TOKENS_URL, JUPITER_STRICT_TOKENS_URL,
    SOLANA_TOKEN_LIST_URL, TRANSACTIONS_LIMIT,
};

use super::ConfigError;

// ============================================================================
// RPC CONFIGURATION
// ============================================================================

config_struct! {
    /// RPC endpoint configuration
    pub struct RpcConfig {
        /// HTTP JSON-RPC endpoint (RPC_URL)
        url: String = String::new(),
        /// Live endpoint (WS_URL), derived from `url` when empty
        ws_url: String = String::new(),
        /// Per-request HTTP timeout
        request_timeout_secs: u64 = 30,
    }
}

// ============================================================================
// INSPECTOR CONFIGURATION
// ============================================================================

config_struct! {
    /// Wallet report configuration
    pub struct InspectorConfig {
        /// Wallet to inspect (WALLET_ADDRESS)
        wallet_address: String = String::new(),

        /// Signatures requested and enriched per run (0 = all listed)
        transactions_limit: usize = TRANSACTIONS_LIMIT,

        /// Upper bound on in-flight getTransaction calls
        max_concurrent_fetches: usize = 10,

        /// Deadline for a whole enrichment batch (0 = none)
        batch_timeout_secs: u64 = 0,

        // Rendering
        show_full_data: bool = false,
        show_portfolio: bool = true,
    }
}

// ============================================================================
// POLLER CONFIGURATION
// ============================================================================

config_struct! {
    /// Live signature poller configuration
    pub struct PollerConfig {
        enabled: bool = true,
        interval_secs: u64 = DEFAULT_POLL_INTERVAL_SECS,
    }
}

// ============================================================================
// REGISTRY CONFIGURATION
// ============================================================================

config_struct! {
    /// Token registry sources, highest precedence first
    pub struct RegistryConfig {
        sources: Vec<String> = vec![
            JUPITER_ALL_TOKENS_URL.to_string(),
            JUPITER_STRICT_TOKENS_URL.to_string(),
            SOLANA_TOKEN_LIST_URL.to_string(),
        ],
        request_timeout_secs: u64 = 20,
    }
}

// ============================================================================
// MAIN CONFIGURATION
// ============================================================================

config_struct! {
    /// Complete walletscan configuration
    pub struct Config {
        rpc: RpcConfig = RpcConfig::default(),
        inspector: InspectorConfig = InspectorConfig::default(),
        poller: PollerConfig = PollerConfig::default(),
        registry: RegistryConfig = RegistryConfig::default(),
    }
}

impl InspectorConfig {
    /// Validate numeric bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidValue {
                field: "inspector.max_concurrent_fetches",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

impl PollerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poller.interval_secs",
                reason: "must be > 0 when the poller is enabled".to_string(),
            });
        }
        Ok(())
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for source in &self.sources {
            url::Url::parse(source).map_err(|e| ConfigError::InvalidUrl {
                field: "registry.sources",
                value: source.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}
