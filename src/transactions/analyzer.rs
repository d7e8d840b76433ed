/// Pure derivations over one enriched record
///
/// Nothing here touches the network; the display layer and the batch
/// summary log both read from these helpers.
use crate::constants::LAMPORTS_PER_SOL;
use crate::rpc::TransactionMeta;

use super::types::{DecodedInstruction, DecodedTransaction, TransactionInfo};

/// Signatures longer than this are shortened as `first8...last8`
const SHORT_SIGNATURE_THRESHOLD: usize = 16;
const SHORT_SIGNATURE_EDGE: usize = 8;

/// Non-zero lamport change of one account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChange {
    pub index: usize,
    pub pre: u64,
    pub post: u64,
    pub change: i64,
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

pub fn signed_lamports_to_sol(lamports: i64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

pub fn fee_sol(tx: &TransactionInfo) -> Option<f64> {
    tx.meta.as_ref().map(|m| lamports_to_sol(m.fee))
}

/// Lamport change of account `index`; `None` when either balance is missing
pub fn balance_change_lamports(meta: &TransactionMeta, index: usize) -> Option<i64> {
    let pre = *meta.pre_balances.get(index)?;
    let post = *meta.post_balances.get(index)?;
    Some(post as i64 - pre as i64)
}

/// Change for the fee payer (account 0)
pub fn signer_balance_change_lamports(tx: &TransactionInfo) -> Option<i64> {
    tx.meta.as_ref().and_then(|m| balance_change_lamports(m, 0))
}

/// Every account whose lamport balance moved, in account order
pub fn balance_changes(meta: &TransactionMeta) -> Vec<BalanceChange> {
    meta.pre_balances
        .iter()
        .zip(meta.post_balances.iter())
        .enumerate()
        .filter_map(|(index, (&pre, &post))| {
            let change = post as i64 - pre as i64;
            (change != 0).then_some(BalanceChange {
                index,
                pre,
                post,
                change,
            })
        })
        .collect()
}

pub fn short_signature(signature: &str) -> String {
    let chars: Vec<char> = signature.chars().collect();
    if chars.len() <= SHORT_SIGNATURE_THRESHOLD {
        return signature.to_string();
    }
    let head: String = chars[..SHORT_SIGNATURE_EDGE].iter().collect();
    let tail: String = chars[chars.len() - SHORT_SIGNATURE_EDGE..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Program account of an instruction, if its index resolves
pub fn program_id<'a>(decoded: &'a DecodedTransaction, ix: &DecodedInstruction) -> Option<&'a str> {
    decoded
        .account_keys
        .get(ix.program_id_index as usize)
        .map(String::as_str)
}

/// Error value rendered for display, `None` on success
pub fn error_description(meta: &TransactionMeta) -> Option<String> {
    match &meta.err {
        Some(err) if !err.is_null() => Some(err.to_string()),
        _ => None,
    }
}
