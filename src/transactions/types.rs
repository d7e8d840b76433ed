// =============================================================================
// CORE DATA STRUCTURES
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::rpc::TransactionMeta;

/// Enriched transaction record, built once per successful fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionInfo {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub meta: Option<TransactionMeta>,
    /// `None` when the payload could not be decoded
    pub decoded: Option<DecodedTransaction>,
}

impl TransactionInfo {
    pub fn is_success(&self) -> bool {
        self.meta.as_ref().map_or(true, |m| m.is_success())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageVersion {
    Legacy,
    V0,
}

impl std::fmt::Display for MessageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageVersion::Legacy => write!(f, "legacy"),
            MessageVersion::V0 => write!(f, "v0"),
        }
    }
}

/// Signer and account-role counts from the message header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageHeaderInfo {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressTableLookupInfo {
    pub account_key: String,
    pub writable_indexes: Vec<u8>,
    pub readonly_indexes: Vec<u8>,
}

/// Structured message content of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedTransaction {
    pub signatures: Vec<String>,
    pub version: MessageVersion,
    pub recent_blockhash: String,
    pub header: MessageHeaderInfo,
    /// Static keys only; lookup-table keys live in the meta block
    pub account_keys: Vec<String>,
    pub instructions: Vec<DecodedInstruction>,
    pub address_table_lookups: Vec<AddressTableLookupInfo>,
}

/// Per-batch outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentStats {
    /// Indices launched (`process_count`)
    pub requested: usize,
    /// Records in the batch
    pub succeeded: usize,
    pub fetch_failed: usize,
    /// Records kept with metadata only
    pub decode_failed: usize,
    /// Indices abandoned on shutdown or deadline
    pub cancelled: usize,
}

/// Ordered batch result for one account
#[derive(Debug, Clone, Serialize)]
pub struct AccountTransactions {
    pub account: String,
    /// Ascending input order; failed indices omitted
    pub transactions: Vec<TransactionInfo>,
    pub fetched_at: DateTime<Utc>,
    pub stats: EnrichmentStats,
}

impl AccountTransactions {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }
}
