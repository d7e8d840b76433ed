/// Core logging implementation with automatic filtering
///
/// This module contains the central logging logic that:
/// - Checks if a log should be displayed based on level and tag
/// - Delegates to the format module for formatting/writing
/// - Implements the filtering rules

use super::config::{get_logger_config, LoggerConfig};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Debug level requires --debug-<tag> for that tag (or --verbose)
/// 3. Verbose level requires --verbose OR --verbose-<tag> for that tag
/// 4. Other levels are checked against the minimum level threshold
/// 5. If enabled_tags is non-empty, tag must be in the set
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    should_log_with(&get_logger_config(), tag, level)
}

pub fn should_log_with(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    // Rule 1: Errors always log (critical)
    if level == LogLevel::Error {
        return true;
    }

    let allowed = match level {
        LogLevel::Debug => {
            config.is_debug_enabled_for_tag(tag) || config.min_level == LogLevel::Verbose
        }
        LogLevel::Verbose => {
            config.min_level == LogLevel::Verbose || config.is_verbose_enabled_for_tag(tag)
        }
        _ => level <= config.min_level,
    };
    if !allowed {
        return false;
    }

    // Rule 5: Check if tag is enabled (empty set = all enabled)
    if !config.enabled_tags.is_empty() && !config.enabled_tags.contains(&tag.to_debug_key()) {
        return false;
    }

    true
}

/// Internal logging function with automatic filtering
pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level.as_str(), message);
}
