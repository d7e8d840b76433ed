//! Console rendering
//!
//! Every table is rendered to a `String` first so callers decide where it
//! goes; the `print_*` helpers write to stdout.

pub mod portfolio;
pub mod transactions;

pub use portfolio::{print_portfolio, render_portfolio};
pub use transactions::TransactionFormatter;

use colored::*;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Two-column table row for key/value sections
#[derive(Tabled)]
pub(crate) struct FieldRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl FieldRow {
    pub fn new(field: &str, value: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Rounded table with a centered header row
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

/// Section heading followed by its table
pub(crate) fn section(out: &mut String, heading: ColoredString, table: String) {
    out.push('\n');
    out.push_str(&heading.to_string());
    out.push('\n');
    out.push_str(&table);
    out.push('\n');
}

/// Keep the first `keep` chars and append "..." when longer than `max`
pub(crate) fn truncate_with_ellipsis(text: &str, max: usize, keep: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(keep).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// First `keep` chars plus "..." unconditionally (mint and program columns)
pub(crate) fn abbreviate(text: &str, keep: usize) -> String {
    let head: String = text.chars().take(keep).collect();
    format!("{}...", head)
}
