//! In-memory gateway for tests
//!
//! Scripted signature listings, per-signature results with artificial
//! latency, and counters for how the code under test drove the gateway.

use super::gateway::RpcGateway;
use super::types::{
    EncodedPayload, RawTransaction, RpcError, RpcResult, SignatureRef, TokenAccountEntry,
    TransactionMeta, UiTokenAmount,
};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use parking_lot::Mutex;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::message::{Message, VersionedMessage};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct ScriptedFetch {
    result: RpcResult<RawTransaction>,
    delay: Duration,
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockGateway {
    listing: Mutex<Option<RpcResult<Vec<SignatureRef>>>>,
    fetches: Mutex<HashMap<String, ScriptedFetch>>,
    token_accounts: Mutex<Vec<TokenAccountEntry>>,
    fetched: Mutex<Vec<String>>,
    listing_delay: Mutex<Duration>,
    listing_calls: AtomicUsize,
    token_account_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signatures(self, signatures: Vec<SignatureRef>) -> Self {
        self.set_signatures(signatures);
        self
    }

    pub fn with_listing_error(self, error: RpcError) -> Self {
        *self.listing.lock() = Some(Err(error));
        self
    }

    /// Delay every signature listing by `delay`
    pub fn with_listing_delay(self, delay: Duration) -> Self {
        *self.listing_delay.lock() = delay;
        self
    }

    pub fn with_transaction(self, signature: &str, tx: RawTransaction, delay: Duration) -> Self {
        self.fetches.lock().insert(
            signature.to_string(),
            ScriptedFetch {
                result: Ok(tx),
                delay,
            },
        );
        self
    }

    pub fn with_fetch_error(self, signature: &str, error: RpcError, delay: Duration) -> Self {
        self.fetches.lock().insert(
            signature.to_string(),
            ScriptedFetch {
                result: Err(error),
                delay,
            },
        );
        self
    }

    pub fn with_token_accounts(self, accounts: Vec<TokenAccountEntry>) -> Self {
        *self.token_accounts.lock() = accounts;
        self
    }

    /// Replace the listing returned from now on
    pub fn set_signatures(&self, signatures: Vec<SignatureRef>) {
        *self.listing.lock() = Some(Ok(signatures));
    }

    /// Signatures passed to `get_transaction`, in call order
    pub fn fetched_signatures(&self) -> Vec<String> {
        self.fetched.lock().clone()
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub fn token_account_calls(&self) -> usize {
        self.token_account_calls.load(Ordering::SeqCst)
    }

    /// `get_transaction` calls currently running (dropped calls included)
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of concurrently running `get_transaction` calls
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcGateway for MockGateway {
    async fn get_signatures_for_address(
        &self,
        _address: &str,
        limit: usize,
    ) -> RpcResult<Vec<SignatureRef>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.listing_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match self.listing.lock().clone() {
            Some(Ok(mut signatures)) => {
                signatures.truncate(limit);
                Ok(signatures)
            }
            Some(Err(e)) => Err(e),
            None => Ok(Vec::new()),
        }
    }

    async fn get_transaction(&self, signature: &str) -> RpcResult<RawTransaction> {
        self.fetched.lock().push(signature.to_string());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        // Decrements even when the caller drops this future mid-sleep
        let _in_flight = InFlightGuard(&self.in_flight);

        let scripted = self
            .fetches
            .lock()
            .get(signature)
            .map(|s| (s.result.clone(), s.delay));

        match scripted {
            Some((result, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Err(RpcError::NotFound(format!("transaction {}", signature))),
        }
    }

    async fn get_token_accounts_by_owner(
        &self,
        _owner: &str,
        _program_id: &str,
    ) -> RpcResult<Vec<TokenAccountEntry>> {
        self.token_account_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.token_accounts.lock().clone())
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

/// A one-instruction legacy transaction, bincode encoded
pub fn sample_transaction() -> VersionedTransaction {
    let payer = Pubkey::new_unique();
    let destination = Pubkey::new_unique();
    let program = Pubkey::new_unique();
    let instruction = Instruction::new_with_bytes(
        program,
        &[2, 0, 0, 0, 64, 66, 15, 0],
        vec![AccountMeta::new(payer, true), AccountMeta::new(destination, false)],
    );
    let message = Message::new(&[instruction], Some(&payer));

    VersionedTransaction {
        signatures: vec![Signature::default()],
        message: VersionedMessage::Legacy(message),
    }
}

pub fn sample_payload() -> EncodedPayload {
    let bytes = bincode::serialize(&sample_transaction()).unwrap_or_default();
    EncodedPayload::Binary(general_purpose::STANDARD.encode(bytes), "base64".to_string())
}

pub fn sample_meta(fee: u64) -> TransactionMeta {
    TransactionMeta {
        fee,
        pre_balances: vec![1_000_000_000, 0, 1],
        post_balances: vec![1_000_000_000 - fee - 250_000, 250_000, 1],
        compute_units_consumed: Some(450),
        log_messages: vec!["Program 11111111111111111111111111111111 invoke [1]".to_string()],
        ..Default::default()
    }
}

pub fn raw_transaction(slot: u64, fee: u64) -> RawTransaction {
    RawTransaction {
        slot,
        block_time: Some(1_700_000_000 + slot as i64),
        meta: Some(sample_meta(fee)),
        transaction: sample_payload(),
        version: Some(serde_json::json!("legacy")),
    }
}

pub fn token_account(mint: &str, ui_amount: f64, decimals: u8) -> TokenAccountEntry {
    TokenAccountEntry {
        pubkey: Pubkey::new_unique().to_string(),
        mint: mint.to_string(),
        owner: Pubkey::new_unique().to_string(),
        token_amount: UiTokenAmount {
            amount: format!("{}", (ui_amount * 10f64.powi(decimals as i32)) as u64),
            decimals,
            ui_amount: Some(ui_amount),
            ui_amount_string: ui_amount.to_string(),
        },
    }
}
