/// Logger configuration and command-line driven debug modes
///
/// The configuration is process-wide. It is built once from the command
/// line by `init_from_args` and can be replaced or updated afterwards
/// (tests use `set_logger_config`).

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped
    pub min_level: LogLevel,
    /// Tags with debug output unlocked (`--debug-<tag>`)
    pub debug_tags: HashSet<String>,
    /// Tags with verbose output unlocked (`--verbose-<tag>`)
    pub verbose_tags: HashSet<String>,
    /// When non-empty, only these tags are printed
    pub enabled_tags: HashSet<String>,
    /// Optional log file (`--log-file <path>`)
    pub log_file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            log_file: None,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Get a snapshot of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Replace the logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    match LOGGER_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Build the configuration from the process arguments
pub fn init_from_args() {
    set_logger_config(config_from_args(&get_cmd_args()));
}

/// Parse logger flags out of an argument list
///
/// Recognized flags:
/// - `--quiet` (warnings and errors only)
/// - `--verbose` (everything)
/// - `--debug-<tag>` / `--verbose-<tag>`
/// - `--only-<tag>` (restrict output to the listed tags)
/// - `--log-file <path>`
pub fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        if arg == "--quiet" {
            config.min_level = LogLevel::Warning;
        } else if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
        } else if arg == "--log-file" {
            if let Some(path) = iter.peek() {
                config.log_file = Some(PathBuf::from(path.as_str()));
                iter.next();
            }
        } else if let Some(tag) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(tag.to_lowercase());
        } else if let Some(tag) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(tag.to_lowercase());
        } else if let Some(tag) = arg.strip_prefix("--only-") {
            config.enabled_tags.insert(tag.to_lowercase());
        }
    }

    config
}

impl LoggerConfig {
    /// Whether `--debug-<tag>` (or `--debug-all`) was given for this tag
    pub fn is_debug_enabled_for_tag(&self, tag: &LogTag) -> bool {
        self.debug_tags.contains("all") || self.debug_tags.contains(&tag.to_debug_key())
    }

    /// Whether `--verbose-<tag>` was given for this tag
    pub fn is_verbose_enabled_for_tag(&self, tag: &LogTag) -> bool {
        self.verbose_tags.contains(&tag.to_debug_key())
    }
}

/// Whether debug output is unlocked for this tag in the global config
pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config().is_debug_enabled_for_tag(tag)
}
