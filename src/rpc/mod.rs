//! Solana JSON-RPC access
//!
//! - `RpcGateway`: the trait the rest of the crate depends on
//! - `RpcClient`: reqwest-backed implementation
//! - `types`: response shapes and `RpcError`

mod client;
mod gateway;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use client::RpcClient;
pub use gateway::RpcGateway;
pub use types::{
    EncodedPayload, LoadedAddresses, RawTransaction, RpcError, RpcResult, SignatureRef,
    TokenAccountEntry, TokenBalance, TransactionMeta, UiTokenAmount,
};
