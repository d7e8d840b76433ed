/// Transaction summary and detail tables
use chrono::{DateTime, Local, SecondsFormat, Utc};
use colored::*;
use tabled::Tabled;

use super::{abbreviate, render_table, section, truncate_with_ellipsis, FieldRow};
use crate::rpc::TransactionMeta;
use crate::transactions::analyzer::{
    balance_changes, error_description, lamports_to_sol, program_id, short_signature,
    signed_lamports_to_sol, signer_balance_change_lamports,
};
use crate::transactions::{AccountTransactions, DecodedTransaction, TransactionInfo};

/// Row limits when the full view is off
const MAX_LOGS: usize = 5;
const MAX_ACCOUNT_KEYS: usize = 5;
const MAX_INSTRUCTIONS: usize = 3;

const LOG_LINE_MAX: usize = 80;
const ACCOUNTS_COLUMN_MAX: usize = 20;
const ABBREVIATED_KEY_CHARS: usize = 8;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Signature (Short)")]
    signature: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Slot")]
    slot: u64,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Fee (SOL)")]
    fee: String,
    #[tabled(rename = "Balance Change")]
    balance_change: String,
}

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Pre (SOL)")]
    pre: String,
    #[tabled(rename = "Post (SOL)")]
    post: String,
    #[tabled(rename = "Change (SOL)")]
    change: String,
}

#[derive(Tabled)]
struct TokenBalanceRow {
    #[tabled(rename = "Mint")]
    mint: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Decimals")]
    decimals: u8,
}

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "Message")]
    value: String,
}

#[derive(Tabled)]
struct AccountKeyRow {
    #[tabled(rename = "Index")]
    index: String,
    #[tabled(rename = "Public Key")]
    value: String,
}

#[derive(Tabled)]
struct InstructionRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "Program")]
    program: String,
    #[tabled(rename = "Accounts")]
    accounts: String,
    #[tabled(rename = "Data Size")]
    data_size: String,
}

/// Renders enriched batches; `show_full_data` lifts the row limits
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFormatter {
    show_full_data: bool,
}

impl TransactionFormatter {
    pub fn new(show_full_data: bool) -> Self {
        Self { show_full_data }
    }

    pub fn print_summary(&self, batch: &AccountTransactions) {
        println!("{}", self.render_summary(batch));
    }

    pub fn print_details(&self, tx: &TransactionInfo, index: usize) {
        println!("{}", self.render_details(tx, index));
    }

    pub fn render_summary(&self, batch: &AccountTransactions) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&" SOLANA TRANSACTION EXPLORER ".white().on_blue().to_string());
        out.push('\n');
        out.push_str(&format!("Account: {}\n", batch.account.cyan()));
        out.push_str(&format!(
            "Total Transactions: {}\n",
            batch.transactions.len().to_string().green()
        ));
        out.push_str(&format!(
            "Last Fetched: {}\n",
            batch
                .fetched_at
                .to_rfc3339_opts(SecondsFormat::Secs, true)
                .yellow()
        ));

        let stats = &batch.stats;
        if stats.fetch_failed + stats.cancelled + stats.decode_failed > 0 {
            out.push_str(&format!(
                "{}\n",
                format!(
                    "⚠️  {} of {} requested: {} failed, {} cancelled, {} without decoded message",
                    stats.succeeded,
                    stats.requested,
                    stats.fetch_failed,
                    stats.cancelled,
                    stats.decode_failed
                )
                .yellow()
            ));
        }

        let rows: Vec<SummaryRow> = batch
            .transactions
            .iter()
            .enumerate()
            .map(|(i, tx)| summary_row(i, tx))
            .collect();

        section(&mut out, "Transaction Summary".bold(), render_table(rows));
        out
    }

    pub fn render_details(&self, tx: &TransactionInfo, index: usize) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(
            &format!(" TRANSACTION #{} DETAILS ", index + 1)
                .white()
                .on_green()
                .to_string(),
        );
        out.push('\n');

        let mut basic = vec![
            FieldRow::new("Signature", &tx.signature),
            FieldRow::new("Slot", tx.slot),
        ];
        if let Some(time) = tx.block_time.and_then(utc_time) {
            basic.push(FieldRow::new(
                "Block Time",
                time.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        section(&mut out, "Basic Information".bold(), render_table(basic));

        if let Some(meta) = &tx.meta {
            self.render_meta(&mut out, meta);
        }

        match &tx.decoded {
            Some(decoded) => self.render_message(&mut out, decoded),
            None => {
                out.push('\n');
                out.push_str(&"📄 Transaction message could not be decoded".dimmed().to_string());
                out.push('\n');
            }
        }

        out
    }

    fn render_meta(&self, out: &mut String, meta: &TransactionMeta) {
        let status = match error_description(meta) {
            None => "SUCCESS ✅".to_string(),
            Some(err) => format!("FAILED ❌ - {}", err),
        };

        let mut rows = vec![
            FieldRow::new("Fee (lamports)", meta.fee),
            FieldRow::new("Fee (SOL)", format!("{:.9}", lamports_to_sol(meta.fee))),
            FieldRow::new("Status", status),
        ];
        if let Some(units) = meta.compute_units_consumed {
            rows.push(FieldRow::new("Compute Units", units));
        }
        section(out, "💰 TRANSACTION META".yellow(), render_table(rows));

        let changes: Vec<BalanceRow> = balance_changes(meta)
            .into_iter()
            .map(|c| {
                let change = format!("{:+.6}", signed_lamports_to_sol(c.change));
                BalanceRow {
                    account: format!("Account[{}]", c.index),
                    pre: format!("{:.6}", lamports_to_sol(c.pre)),
                    post: format!("{:.6}", lamports_to_sol(c.post)),
                    change: if c.change > 0 {
                        change.green().to_string()
                    } else {
                        change.red().to_string()
                    },
                }
            })
            .collect();
        if !changes.is_empty() {
            section(out, "📊 SOL BALANCE CHANGES".cyan(), render_table(changes));
        }

        if !meta.post_token_balances.is_empty() {
            let tokens: Vec<TokenBalanceRow> = meta
                .post_token_balances
                .iter()
                .map(|b| TokenBalanceRow {
                    mint: abbreviate(&b.mint, ABBREVIATED_KEY_CHARS),
                    amount: b.ui_token_amount.ui_amount_string.clone(),
                    decimals: b.ui_token_amount.decimals,
                })
                .collect();
            section(out, "🪙 TOKEN BALANCES".magenta(), render_table(tokens));
        }

        if !meta.log_messages.is_empty() {
            section(
                out,
                "📝 PROGRAM LOGS".yellow(),
                render_table(self.log_rows(&meta.log_messages)),
            );
        }
    }

    fn log_rows(&self, logs: &[String]) -> Vec<LogRow> {
        let limit = self.limit(MAX_LOGS, logs.len());
        let mut rows: Vec<LogRow> = logs
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, line)| LogRow {
                index: (i + 1).to_string(),
                value: if self.show_full_data {
                    line.clone()
                } else {
                    truncate_with_ellipsis(line, LOG_LINE_MAX, LOG_LINE_MAX - 3)
                },
            })
            .collect();
        if logs.len() > limit {
            rows.push(LogRow {
                index: "...".to_string(),
                value: format!("and {} more logs", logs.len() - limit),
            });
        }
        rows
    }

    fn render_message(&self, out: &mut String, decoded: &DecodedTransaction) {
        let mut rows = vec![
            FieldRow::new("Version", decoded.version),
            FieldRow::new("Recent Blockhash", &decoded.recent_blockhash),
            FieldRow::new("Required Signatures", decoded.header.num_required_signatures),
            FieldRow::new("Readonly Signed", decoded.header.num_readonly_signed_accounts),
            FieldRow::new("Readonly Unsigned", decoded.header.num_readonly_unsigned_accounts),
            FieldRow::new("Total Accounts", decoded.account_keys.len()),
            FieldRow::new("Total Instructions", decoded.instructions.len()),
        ];
        if !decoded.address_table_lookups.is_empty() {
            rows.push(FieldRow::new(
                "Address Table Lookups",
                decoded.address_table_lookups.len(),
            ));
        }
        section(out, "📄 TRANSACTION MESSAGE".blue(), render_table(rows));

        if !decoded.account_keys.is_empty() {
            section(
                out,
                "🔑 ACCOUNT KEYS".green(),
                render_table(self.account_key_rows(&decoded.account_keys)),
            );
        }

        if !decoded.instructions.is_empty() {
            section(
                out,
                "⚙️ INSTRUCTIONS".red(),
                render_table(self.instruction_rows(decoded)),
            );
        }
    }

    fn account_key_rows(&self, keys: &[String]) -> Vec<AccountKeyRow> {
        let limit = self.limit(MAX_ACCOUNT_KEYS, keys.len());
        let mut rows: Vec<AccountKeyRow> = keys
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, key)| AccountKeyRow {
                index: i.to_string(),
                value: key.clone(),
            })
            .collect();
        if keys.len() > limit {
            rows.push(AccountKeyRow {
                index: "...".to_string(),
                value: format!("and {} more accounts", keys.len() - limit),
            });
        }
        rows
    }

    fn instruction_rows(&self, decoded: &DecodedTransaction) -> Vec<InstructionRow> {
        let total = decoded.instructions.len();
        let limit = self.limit(MAX_INSTRUCTIONS, total);
        let mut rows: Vec<InstructionRow> = decoded
            .instructions
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, ix)| {
                let accounts = format_index_list(&ix.accounts);
                InstructionRow {
                    index: (i + 1).to_string(),
                    program: program_id(decoded, ix)
                        .map(|p| abbreviate(p, ABBREVIATED_KEY_CHARS))
                        .unwrap_or_else(|| "Unknown".to_string()),
                    accounts: if self.show_full_data {
                        accounts
                    } else {
                        truncate_with_ellipsis(
                            &accounts,
                            ACCOUNTS_COLUMN_MAX,
                            ACCOUNTS_COLUMN_MAX - 3,
                        )
                    },
                    data_size: format!("{} bytes", ix.data.len()),
                }
            })
            .collect();
        if total > limit {
            rows.push(InstructionRow {
                index: "...".to_string(),
                program: format!("and {} more instructions", total - limit),
                accounts: String::new(),
                data_size: String::new(),
            });
        }
        rows
    }

    fn limit(&self, default: usize, len: usize) -> usize {
        if self.show_full_data {
            len
        } else {
            default.min(len)
        }
    }
}

fn summary_row(index: usize, tx: &TransactionInfo) -> SummaryRow {
    let status = if tx.is_success() { "✅ SUCCESS" } else { "❌ FAILED" };

    let time = tx
        .block_time
        .and_then(utc_time)
        .map(|t| t.with_timezone(&Local).format("%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let fee = tx
        .meta
        .as_ref()
        .map(|m| format!("{:.6}", lamports_to_sol(m.fee)))
        .unwrap_or_else(|| "0".to_string());

    let balance_change = match signer_balance_change_lamports(tx) {
        Some(change) if change != 0 => format!("{:+.6}", signed_lamports_to_sol(change)),
        _ => "0".to_string(),
    };

    SummaryRow {
        index: index + 1,
        signature: short_signature(&tx.signature),
        status: status.to_string(),
        slot: tx.slot,
        time,
        fee,
        balance_change,
    }
}

fn utc_time(unix_secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(unix_secs, 0)
}

/// `[0 1 2]`, the bracketed space-separated form
fn format_index_list(indexes: &[u8]) -> String {
    let joined: Vec<String> = indexes.iter().map(|i| i.to_string()).collect();
    format!("[{}]", joined.join(" "))
}
