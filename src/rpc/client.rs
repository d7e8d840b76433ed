//! HTTP JSON-RPC client
//!
//! Every method builds its params and goes through `execute_raw`, which
//! owns the envelope, HTTP status and JSON-RPC error handling.

use super::gateway::RpcGateway;
use super::types::{
    KeyedAccount, RawTransaction, RpcError, RpcResult, SignatureRef, TokenAccountEntry,
};
use crate::constants::MAX_SUPPORTED_TRANSACTION_VERSION;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use serde_json::{json, Value};
use solana_client::rpc_config::{RpcSignaturesForAddressConfig, RpcTransactionConfig};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_transaction_status::UiTransactionEncoding;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Longest response body echoed back in an HTTP status error
const ERROR_BODY_PREVIEW: usize = 200;

pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str, timeout: Duration) -> RpcResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Send one JSON-RPC request and return its `result` (may be null)
    pub async fn execute_raw(&self, method: &str, params: Value) -> RpcResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        logger::debug(LogTag::Rpc, &format!("→ {} #{} {}", method, id, params));
        let start = Instant::now();

        let response = self
            .http
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        let mut body: Value = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        logger::debug(
            LogTag::Rpc,
            &format!("← {} #{} in {}ms", method, id, start.elapsed().as_millis()),
        );

        if let Some(err) = body.get("error") {
            return Err(RpcError::Rpc {
                code: err.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: err
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }

        match body.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(RpcError::InvalidResponse(format!(
                "{}: missing result field",
                method
            ))),
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> RpcError {
    if e.is_timeout() {
        RpcError::Timeout
    } else {
        RpcError::Transport(e.to_string())
    }
}

fn to_params<T: serde::Serialize>(value: &T) -> RpcResult<Value> {
    serde_json::to_value(value).map_err(|e| RpcError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl RpcGateway for RpcClient {
    async fn get_signatures_for_address(
        &self,
        address: &str,
        limit: usize,
    ) -> RpcResult<Vec<SignatureRef>> {
        let config = RpcSignaturesForAddressConfig {
            before: None,
            until: None,
            limit: Some(limit),
            commitment: Some(CommitmentConfig::confirmed()),
            min_context_slot: None,
        };
        let params = json!([address, to_params(&config)?]);

        let result = self.execute_raw("getSignaturesForAddress", params).await?;
        serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("Invalid signature list: {}", e)))
    }

    async fn get_transaction(&self, signature: &str) -> RpcResult<RawTransaction> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Base64),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(MAX_SUPPORTED_TRANSACTION_VERSION),
        };
        let params = json!([signature, to_params(&config)?]);

        let result = self.execute_raw("getTransaction", params).await?;
        if result.is_null() {
            return Err(RpcError::NotFound(format!("transaction {}", signature)));
        }

        serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("Failed to parse transaction: {}", e)))
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &str,
        program_id: &str,
    ) -> RpcResult<Vec<TokenAccountEntry>> {
        let params = json!([
            owner,
            { "programId": program_id },
            { "encoding": "jsonParsed", "commitment": "confirmed" }
        ]);

        let result = self.execute_raw("getTokenAccountsByOwner", params).await?;
        let values = result
            .get("value")
            .and_then(Value::as_array)
            .ok_or_else(|| RpcError::InvalidResponse("missing value array".to_string()))?;

        let mut entries = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<KeyedAccount>(value.clone()) {
                Ok(keyed) => entries.push(TokenAccountEntry::from(keyed)),
                Err(e) => logger::debug(
                    LogTag::Rpc,
                    &format!("Skipping unparsed token account: {}", e),
                ),
            }
        }
        Ok(entries)
    }
}
