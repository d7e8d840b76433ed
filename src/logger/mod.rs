//! Structured logging system for walletscan
//!
//! This module provides a clean, ergonomic logging API with:
//! - Automatic debug mode filtering from command-line arguments
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-tag debug control via --debug-<tag> flags
//! - Dual output: colored console + optional file persistence
//!
//! ## Usage
//!
//! ```rust
//! use walletscan::logger::{self, LogTag};
//!
//! logger::error(LogTag::Rpc, "Connection failed");
//! logger::warning(LogTag::Registry, "Token list source unavailable");
//! logger::info(LogTag::Transactions, "Fetched 10 signatures");
//! logger::debug(LogTag::Rpc, "Request details: ..."); // Only if --debug-rpc
//! logger::verbose(LogTag::Poller, "Raw poll result: ..."); // Only if --verbose
//! ```
//!
//! ## Initialization
//!
//! Call once at startup, before any logging occurs:
//! ```rust
//! walletscan::logger::init();
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{
    config_from_args, get_logger_config, init_from_args, is_debug_enabled_for_tag,
    set_logger_config, LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// 1. Parse command-line arguments for debug flags
/// 2. Open the log file when `--log-file` is given
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues)
///
/// Warnings are shown by default (also with --quiet).
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (detailed diagnostics)
///
/// Debug logs are ONLY shown when the --debug-<tag> flag is provided.
///
/// # Example
/// ```rust
/// use walletscan::logger::{self, LogTag};
///
/// // Only shown with --debug-rpc
/// logger::debug(LogTag::Rpc, "getTransaction params: {...}");
/// ```
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (very detailed tracing)
///
/// Verbose logs are ONLY shown with --verbose or --verbose-<tag>.
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
///
/// Call this during shutdown to ensure all logs are written to disk.
pub fn flush() {
    file::flush_file_logging();
}
