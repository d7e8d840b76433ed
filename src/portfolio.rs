/// SPL token holdings of a wallet
///
/// Lists the owner's token accounts with `jsonParsed` encoding, drops empty
/// balances and attaches registry names. Registry failures only cost the
/// names; listing failures are returned.
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::constants::{SOL_DISPLAY_NAME, SOL_DISPLAY_SYMBOL, SOL_MINT, TOKEN_PROGRAM_ID};
use crate::logger::{self, LogTag};
use crate::rpc::{RpcError, RpcGateway, TokenAccountEntry};
use crate::tokens::{RegistryCache, TokenMap};

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("failed to list token accounts for {owner}: {source}")]
    TokenAccounts {
        owner: String,
        #[source]
        source: RpcError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenHolding {
    pub mint: String,
    pub ui_amount: String,
    pub decimals: u8,
    /// Empty when the registry has no entry
    pub name: String,
    pub symbol: String,
}

impl TokenHolding {
    fn amount_value(&self) -> f64 {
        self.ui_amount.parse().unwrap_or(0.0)
    }
}

pub struct PortfolioService<G: RpcGateway> {
    gateway: Arc<G>,
    registry: Arc<RegistryCache>,
}

impl<G: RpcGateway> PortfolioService<G> {
    pub fn new(gateway: Arc<G>, registry: Arc<RegistryCache>) -> Self {
        Self { gateway, registry }
    }

    /// Non-zero holdings, largest amount first
    pub async fn fetch_holdings(&self, owner: &str) -> Result<Vec<TokenHolding>, PortfolioError> {
        let accounts = self
            .gateway
            .get_token_accounts_by_owner(owner, TOKEN_PROGRAM_ID)
            .await
            .map_err(|source| PortfolioError::TokenAccounts {
                owner: owner.to_string(),
                source,
            })?;

        logger::debug(
            LogTag::Portfolio,
            &format!("{} token accounts for {}", accounts.len(), owner),
        );

        let registry = match self.registry.get().await {
            Ok(map) => map,
            Err(e) => {
                logger::warning(
                    LogTag::Portfolio,
                    &format!("Continuing without token names: {}", e),
                );
                Arc::new(TokenMap::new())
            }
        };

        Ok(build_holdings(accounts, &registry))
    }
}

/// `true` for empty or numerically zero UI amounts ("0", "0.000", ...)
pub fn is_zero_amount(ui_amount: &str) -> bool {
    let trimmed = ui_amount.trim();
    trimmed.is_empty() || trimmed.parse::<f64>().map_or(false, |v| v == 0.0)
}

pub fn build_holdings(accounts: Vec<TokenAccountEntry>, registry: &TokenMap) -> Vec<TokenHolding> {
    let mut holdings: Vec<TokenHolding> = accounts
        .into_iter()
        .filter(|account| !is_zero_amount(&account.token_amount.ui_amount_string))
        .map(|account| {
            let (name, symbol) = match registry.get(&account.mint) {
                Some(info) => (info.name.clone(), info.symbol.clone()),
                None if account.mint == SOL_MINT => {
                    (SOL_DISPLAY_NAME.to_string(), SOL_DISPLAY_SYMBOL.to_string())
                }
                None => (String::new(), String::new()),
            };
            TokenHolding {
                mint: account.mint,
                ui_amount: account.token_amount.ui_amount_string,
                decimals: account.token_amount.decimals,
                name,
                symbol,
            }
        })
        .collect();

    holdings.sort_by(|a, b| b.amount_value().total_cmp(&a.amount_value()));
    holdings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::testing::{token_account, MockGateway};
    use crate::tokens::registry::testing::FixedLoader;

    const OWNER: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn service(gateway: MockGateway, loader: FixedLoader) -> PortfolioService<MockGateway> {
        PortfolioService::new(
            Arc::new(gateway),
            Arc::new(RegistryCache::new(Box::new(loader))),
        )
    }

    #[test]
    fn test_zero_amounts() {
        for zero in ["", "0", "0.0", "0.000", " 0 "] {
            assert!(is_zero_amount(zero), "{:?} should be zero", zero);
        }
        assert!(!is_zero_amount("0.0001"));
        assert!(!is_zero_amount("12"));
    }

    #[tokio::test]
    async fn test_holdings_sorted_and_named() {
        let gateway = MockGateway::new().with_token_accounts(vec![
            token_account("MintSmall", 1.5, 6),
            token_account(USDC, 250.0, 6),
            token_account("MintEmpty", 0.0, 9),
            token_account(SOL_MINT, 3.0, 9),
        ]);
        let loader = FixedLoader::new(&[(USDC, "USDC", "USD Coin")]);

        let holdings = service(gateway, loader).fetch_holdings(OWNER).await.unwrap();

        let mints: Vec<&str> = holdings.iter().map(|h| h.mint.as_str()).collect();
        assert_eq!(mints, vec![USDC, SOL_MINT, "MintSmall"]);
        assert_eq!(holdings[0].symbol, "USDC");
        assert_eq!(holdings[1].name, SOL_DISPLAY_NAME);
        assert_eq!(holdings[1].symbol, SOL_DISPLAY_SYMBOL);
        assert!(holdings[2].name.is_empty());
    }

    #[tokio::test]
    async fn test_registry_failure_is_not_fatal() {
        let gateway = MockGateway::new().with_token_accounts(vec![token_account(USDC, 5.0, 6)]);
        let holdings = service(gateway, FixedLoader::new(&[]))
            .fetch_holdings(OWNER)
            .await
            .unwrap();

        assert_eq!(holdings.len(), 1);
        assert!(holdings[0].symbol.is_empty());
    }

    #[tokio::test]
    async fn test_empty_wallet() {
        let holdings = service(MockGateway::new(), FixedLoader::new(&[]))
            .fetch_holdings(OWNER)
            .await
            .unwrap();
        assert!(holdings.is_empty());
    }
}
