/// Global constants used across walletscan
///
/// System-wide values that are not configurable, plus the defaults that
/// config sections start from.

// ============================================================================
// SOLANA BLOCKCHAIN CONSTANTS
// ============================================================================

/// SOL token mint address (wrapped SOL / WSOL)
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Number of decimal places for SOL token
pub const SOL_DECIMALS: u8 = 9;

/// Lamports per SOL (10^9)
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// SPL Token program, owner of the token accounts listed for the portfolio
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Registry fallback for wrapped SOL
pub const SOL_DISPLAY_NAME: &str = "Wrapped SOL";
pub const SOL_DISPLAY_SYMBOL: &str = "wSOL";

// ============================================================================
// INSPECTOR DEFAULTS
// ============================================================================

/// Signatures requested per run unless overridden
pub const TRANSACTIONS_LIMIT: usize = 10;

/// Highest transaction version getTransaction is allowed to return
pub const MAX_SUPPORTED_TRANSACTION_VERSION: u8 = 0;

/// Seconds between live poller ticks
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 4;

// ============================================================================
// TOKEN REGISTRY SOURCES
// ============================================================================

pub const JUPITER_ALL_TOKENS_URL: &str = "https://token.jup.ag/all";
pub const JUPITER_STRICT_TOKENS_URL: &str = "https://token.jup.ag/strict";
pub const SOLANA_TOKEN_LIST_URL: &str =
    "https://cdn.jsdelivr.net/gh/solana-labs/token-list@main/src/tokens/solana.tokenlist.json";
