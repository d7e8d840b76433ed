/// Top-level error for a walletscan run
///
/// Each layer keeps its own error enum; this one only tags which stage
/// stopped the run.
use thiserror::Error;

use crate::config::ConfigError;
use crate::portfolio::PortfolioError;
use crate::rpc::RpcError;
use crate::tokens::RegistryError;
use crate::transactions::TransactionsError;

#[derive(Debug, Error)]
pub enum WalletscanError {
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    #[error("RPC Error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Transactions Error: {0}")]
    Transactions(#[from] TransactionsError),

    #[error("Portfolio Error: {0}")]
    Portfolio(#[from] PortfolioError),

    #[error("Registry Error: {0}")]
    Registry(#[from] RegistryError),
}
