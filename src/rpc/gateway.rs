use async_trait::async_trait;

use super::types::{RawTransaction, RpcResult, SignatureRef, TokenAccountEntry};

/// Read-only chain access used by the pipeline, portfolio and poller
///
/// `RpcClient` talks to a real node; tests drive the same code through an
/// in-memory implementation.
#[async_trait]
pub trait RpcGateway: Send + Sync {
    /// Recent signatures for an address, newest first, at most `limit`
    async fn get_signatures_for_address(
        &self,
        address: &str,
        limit: usize,
    ) -> RpcResult<Vec<SignatureRef>>;

    /// Full transaction record; a null result is `RpcError::NotFound`
    async fn get_transaction(&self, signature: &str) -> RpcResult<RawTransaction>;

    /// Token accounts owned by `owner` under `program_id`, jsonParsed
    async fn get_token_accounts_by_owner(
        &self,
        owner: &str,
        program_id: &str,
    ) -> RpcResult<Vec<TokenAccountEntry>>;
}
