/// Centralized argument handling for walletscan
///
/// The binary takes no required arguments; everything here is an optional
/// flag layered over the environment configuration.
///
/// Features:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Flag checking functions for every optional mode
/// - Debug flag discovery for the startup banner
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

use crate::logger::LogTag;

/// Global command-line arguments storage
/// Thread-safe singleton that stores arguments for access throughout the application
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    has_arg_in(&get_cmd_args(), arg)
}

/// Gets the value of a command-line argument that follows a flag
pub fn get_arg_value(flag: &str) -> Option<String> {
    get_arg_value_in(&get_cmd_args(), flag)
}

fn has_arg_in(args: &[String], arg: &str) -> bool {
    args.iter().any(|a| a == arg)
}

fn get_arg_value_in(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|value| !value.starts_with("--"))
        .cloned()
}

// =============================================================================
// MODE FLAGS
// =============================================================================

/// Show every log line, account key and instruction instead of the first few
pub fn is_full_data_enabled() -> bool {
    has_arg("--full")
}

/// Skip the live signature poller after the report
pub fn is_poll_disabled() -> bool {
    has_arg("--no-poll")
}

/// Skip the token portfolio table
pub fn is_portfolio_disabled() -> bool {
    has_arg("--no-portfolio")
}

/// Override for the number of transactions to enrich
pub fn get_limit_override() -> Option<usize> {
    get_arg_value("--limit").and_then(|s| s.parse().ok())
}

/// Path of an optional TOML config file
pub fn get_config_path() -> Option<String> {
    get_arg_value("--config")
}

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

// =============================================================================
// DEBUG FLAGS
// =============================================================================

/// Debug modes enabled on the command line, by tag key
pub fn get_enabled_debug_modes() -> Vec<String> {
    enabled_debug_modes_in(&get_cmd_args())
}

fn enabled_debug_modes_in(args: &[String]) -> Vec<String> {
    let known: Vec<String> = LogTag::all().iter().map(|t| t.to_debug_key()).collect();
    args.iter()
        .filter_map(|a| a.strip_prefix("--debug-"))
        .filter(|key| *key == "all" || known.iter().any(|k| k == key))
        .map(|key| key.to_string())
        .collect()
}

/// Prints the enabled debug modes at startup, if any
pub fn print_debug_info() {
    let modes = get_enabled_debug_modes();
    if !modes.is_empty() {
        crate::logger::info(
            LogTag::System,
            &format!("🐛 Debug modes enabled: {}", modes.join(", ")),
        );
    }
}

pub fn print_help() {
    println!("walletscan - read-only Solana wallet inspector");
    println!();
    println!("USAGE:");
    println!("    walletscan [FLAGS]");
    println!();
    println!("ENVIRONMENT:");
    println!("    RPC_URL                   Solana JSON-RPC endpoint (required)");
    println!("    WALLET_ADDRESS            Wallet to inspect (required)");
    println!("    WS_URL                    Live endpoint (optional, derived from RPC_URL)");
    println!();
    println!("FLAGS:");
    println!("    --help, -h                Show this help message");
    println!("    --full                    Show all logs, account keys and instructions");
    println!("    --limit <n>               Number of recent transactions to enrich");
    println!("    --config <path>           Load settings from a TOML file");
    println!("    --no-poll                 Exit after the report instead of polling");
    println!("    --no-portfolio            Skip the token portfolio table");
    println!();
    println!("LOGGING FLAGS:");
    println!("    --quiet                   Warnings and errors only");
    println!("    --verbose                 Everything, including verbose traces");
    println!("    --log-file <path>         Also append log lines to a file");
    println!("    --debug-rpc               RPC requests debug mode");
    println!("    --debug-transactions      Enrichment pipeline debug mode");
    println!("    --debug-registry          Token registry debug mode");
    println!("    --debug-portfolio         Portfolio debug mode");
    println!("    --debug-poller            Live poller debug mode");
    println!("    --debug-all               Every debug mode");
    println!();
    println!("EXAMPLES:");
    println!("    walletscan                         # Report, portfolio, then poll");
    println!("    walletscan --limit 25 --full       # Larger, detailed report");
    println!("    walletscan --no-poll --debug-rpc   # One-shot run with RPC tracing");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_get_arg_value_in() {
        let list = args(&["walletscan", "--limit", "25", "--config"]);
        assert_eq!(get_arg_value_in(&list, "--limit"), Some("25".to_string()));
        assert_eq!(get_arg_value_in(&list, "--config"), None);
        assert_eq!(get_arg_value_in(&list, "--missing"), None);
    }

    #[test]
    fn test_flag_value_not_taken_from_next_flag() {
        let list = args(&["walletscan", "--limit", "--full"]);
        assert_eq!(get_arg_value_in(&list, "--limit"), None);
        assert!(has_arg_in(&list, "--full"));
    }

    #[test]
    fn test_enabled_debug_modes_ignores_unknown() {
        let list = args(&["walletscan", "--debug-rpc", "--debug-bogus", "--debug-all"]);
        assert_eq!(enabled_debug_modes_in(&list), vec!["rpc".to_string(), "all".to_string()]);
    }

    #[test]
    fn test_global_args_roundtrip() {
        set_cmd_args(args(&["walletscan", "--full", "--limit", "7", "--no-poll"]));

        assert!(is_full_data_enabled());
        assert!(is_poll_disabled());
        assert!(!is_portfolio_disabled());
        assert_eq!(get_limit_override(), Some(7));
        assert_eq!(get_config_path(), None);
        assert!(!is_help_requested());
    }
}
