//! Merged mint -> metadata registry
//!
//! Several public token lists are fetched and merged; the first source to
//! name a mint wins. A failing source is skipped. The merge result is
//! computed at most once per `RegistryCache`, failures included.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::RegistryConfig;
use crate::logger::{self, LogTag};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

pub type TokenMap = HashMap<String, TokenInfo>;

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("token list request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("token list {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("token list {url} is not valid JSON: {reason}")]
    Parse { url: String, reason: String },

    #[error("no token registry sources available")]
    NoSources,
}

/// Both list layouts seen in the wild
#[derive(Deserialize)]
#[serde(untagged)]
enum TokenListBody {
    /// Jupiter: bare array
    Array(Vec<TokenInfo>),
    /// solana-labs: `{ "tokens": [...] }`
    Wrapped { tokens: Vec<TokenInfo> },
}

/// Parse one source body; entries without an address are dropped
pub fn parse_token_list(url: &str, body: &str) -> Result<Vec<TokenInfo>, RegistryError> {
    let parsed: TokenListBody = serde_json::from_str(body).map_err(|e| RegistryError::Parse {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let tokens = match parsed {
        TokenListBody::Array(tokens) => tokens,
        TokenListBody::Wrapped { tokens } => tokens,
    };
    Ok(tokens.into_iter().filter(|t| !t.address.is_empty()).collect())
}

/// Merge sources given in precedence order; the first entry for a mint wins
///
/// Failed sources are skipped. Errors only when nothing was loaded.
pub fn merge_sources<I>(sources: I) -> Result<TokenMap, RegistryError>
where
    I: IntoIterator<Item = Result<Vec<TokenInfo>, RegistryError>>,
{
    let mut merged = TokenMap::new();
    for source in sources {
        match source {
            Ok(tokens) => {
                for token in tokens {
                    merged.entry(token.address.clone()).or_insert(token);
                }
            }
            Err(e) => logger::warning(LogTag::Registry, &format!("Skipping source: {}", e)),
        }
    }

    if merged.is_empty() {
        return Err(RegistryError::NoSources);
    }
    Ok(merged)
}

/// Where the merged map comes from
#[async_trait]
pub trait RegistryLoader: Send + Sync {
    async fn load(&self) -> Result<TokenMap, RegistryError>;
}

/// Fetches every configured source over HTTP
pub struct HttpRegistryLoader {
    http: reqwest::Client,
    sources: Vec<String>,
}

impl HttpRegistryLoader {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RegistryError::Http {
                url: String::new(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            sources: config.sources.clone(),
        })
    }

    async fn fetch_source(&self, url: &str) -> Result<Vec<TokenInfo>, RegistryError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RegistryError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| RegistryError::Http {
            url: url.to_string(),
            reason: format!("Failed to read response: {}", e),
        })?;

        let tokens = parse_token_list(url, &body)?;
        logger::debug(
            LogTag::Registry,
            &format!("Loaded {} tokens from {}", tokens.len(), url),
        );
        Ok(tokens)
    }
}

#[async_trait]
impl RegistryLoader for HttpRegistryLoader {
    async fn load(&self) -> Result<TokenMap, RegistryError> {
        let mut results = Vec::with_capacity(self.sources.len());
        for url in &self.sources {
            results.push(self.fetch_source(url).await);
        }
        merge_sources(results)
    }
}

/// Loads the registry on first use and keeps the outcome
pub struct RegistryCache {
    loader: Box<dyn RegistryLoader>,
    cell: OnceCell<Result<Arc<TokenMap>, RegistryError>>,
}

impl RegistryCache {
    pub fn new(loader: Box<dyn RegistryLoader>) -> Self {
        Self {
            loader,
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<Arc<TokenMap>, RegistryError> {
        self.cell
            .get_or_init(|| async {
                let result = self.loader.load().await.map(Arc::new);
                match &result {
                    Ok(map) => logger::info(
                        LogTag::Registry,
                        &format!("Token registry ready: {} mints", map.len()),
                    ),
                    Err(e) => logger::warning(LogTag::Registry, &format!("Token registry unavailable: {}", e)),
                }
                result
            })
            .await
            .clone()
    }
}
