/// Wire types for the JSON-RPC methods walletscan calls
///
/// Only the fields the inspector reads are modelled. Unknown fields are
/// ignored; nullable arrays collapse to empty.
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RpcError {
    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type RpcResult<T> = Result<T, RpcError>;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// getSignaturesForAddress
// =============================================================================

/// One entry of an address history listing, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRef {
    pub signature: String,
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

impl SignatureRef {
    pub fn new(signature: impl Into<String>, slot: u64, block_time: Option<i64>) -> Self {
        Self {
            signature: signature.into(),
            slot,
            block_time,
            err: None,
            confirmation_status: None,
        }
    }
}

// =============================================================================
// getTransaction
// =============================================================================

/// `getTransaction` result for a non-null response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    pub transaction: EncodedPayload,
    /// `"legacy"` or a version number
    #[serde(default)]
    pub version: Option<serde_json::Value>,
}

/// The `transaction` field as sent by the node
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EncodedPayload {
    /// `["<data>", "base64"]`
    Binary(String, String),
    /// Bare base58 string from nodes that ignore `encoding`
    LegacyBinary(String),
    /// `json` / `jsonParsed` object
    Json(serde_json::Value),
}

/// Execution outcome attached to a transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    pub fee: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pre_balances: Vec<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_balances: Vec<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pre_token_balances: Vec<TokenBalance>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_token_balances: Vec<TokenBalance>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub log_messages: Vec<String>,
    #[serde(default)]
    pub compute_units_consumed: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub loaded_addresses: LoadedAddresses,
}

impl TransactionMeta {
    pub fn is_success(&self) -> bool {
        self.err.as_ref().map_or(true, |e| e.is_null())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub account_index: u32,
    pub mint: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub program_id: Option<String>,
    pub ui_token_amount: UiTokenAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    pub amount: String,
    pub decimals: u8,
    #[serde(default)]
    pub ui_amount: Option<f64>,
    #[serde(default)]
    pub ui_amount_string: String,
}

/// Accounts pulled in through address lookup tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedAddresses {
    #[serde(default)]
    pub writable: Vec<String>,
    #[serde(default)]
    pub readonly: Vec<String>,
}

// =============================================================================
// getTokenAccountsByOwner (jsonParsed)
// =============================================================================

/// One SPL token account held by the owner
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAccountEntry {
    pub pubkey: String,
    pub mint: String,
    pub owner: String,
    pub token_amount: UiTokenAmount,
}

#[derive(Deserialize)]
pub(crate) struct KeyedAccount {
    pub pubkey: String,
    pub account: ParsedAccount,
}

#[derive(Deserialize)]
pub(crate) struct ParsedAccount {
    pub data: ParsedAccountData,
}

#[derive(Deserialize)]
pub(crate) struct ParsedAccountData {
    pub parsed: ParsedTokenData,
}

#[derive(Deserialize)]
pub(crate) struct ParsedTokenData {
    pub info: ParsedTokenInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ParsedTokenInfo {
    pub mint: String,
    pub owner: String,
    pub token_amount: UiTokenAmount,
}

impl From<KeyedAccount> for TokenAccountEntry {
    fn from(keyed: KeyedAccount) -> Self {
        let info = keyed.account.data.parsed.info;
        Self {
            pubkey: keyed.pubkey,
            mint: info.mint,
            owner: info.owner,
            token_amount: info.token_amount,
        }
    }
}
