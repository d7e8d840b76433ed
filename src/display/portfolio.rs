use colored::*;
use tabled::Tabled;

use super::{render_table, section};
use crate::portfolio::TokenHolding;

#[derive(Tabled)]
struct HoldingRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Mint")]
    mint: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Decimals")]
    decimals: u8,
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

pub fn render_portfolio(owner: &str, holdings: &[TokenHolding]) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&" TOKEN PORTFOLIO ".white().on_magenta().to_string());
    out.push('\n');
    out.push_str(&format!("Owner: {}\n", owner.cyan()));

    if holdings.is_empty() {
        out.push_str(&format!("{}\n", "No token balances".dimmed()));
        return out;
    }

    let rows: Vec<HoldingRow> = holdings
        .iter()
        .enumerate()
        .map(|(i, h)| HoldingRow {
            index: i + 1,
            symbol: or_unknown(&h.symbol),
            name: or_unknown(&h.name),
            mint: h.mint.clone(),
            amount: h.ui_amount.clone(),
            decimals: h.decimals,
        })
        .collect();

    section(&mut out, "🪙 HOLDINGS".magenta(), render_table(rows));
    out.push_str(&format!(
        "Total tokens: {}\n",
        holdings.len().to_string().green()
    ));
    out
}

pub fn print_portfolio(owner: &str, holdings: &[TokenHolding]) {
    println!("{}", render_portfolio(owner, holdings));
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    #[test]
    fn test_render_holdings() {
        let holdings = vec![
            TokenHolding {
                mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
                ui_amount: "250".to_string(),
                decimals: 6,
                name: "USD Coin".to_string(),
                symbol: "USDC".to_string(),
            },
            TokenHolding {
                mint: "MintUnknown".to_string(),
                ui_amount: "1.5".to_string(),
                decimals: 9,
                name: String::new(),
                symbol: String::new(),
            },
        ];

        let out = render_portfolio(OWNER, &holdings);
        assert!(out.contains("TOKEN PORTFOLIO"));
        assert!(out.contains(OWNER));
        assert!(out.contains("USD Coin"));
        assert!(out.contains("MintUnknown"));
        assert!(out.contains("1.5"));
        assert!(out.contains("Total tokens"));
    }

    #[test]
    fn test_render_empty_portfolio() {
        let out = render_portfolio(OWNER, &[]);
        assert!(out.contains("No token balances"));
        assert!(!out.contains("HOLDINGS"));
    }
}
