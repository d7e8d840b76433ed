/// Optional file sink for log lines
///
/// Enabled with `--log-file <path>`. Lines are appended without ANSI codes.

use super::config::get_logger_config;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

static LOG_WRITER: Lazy<Mutex<Option<BufWriter<File>>>> = Lazy::new(|| Mutex::new(None));

/// Open the configured log file, if any
pub fn init_file_logging() {
    let Some(path) = get_logger_config().log_file else {
        return;
    };

    if let Err(e) = open_log_file(&path) {
        eprintln!("⚠️  Failed to open log file '{}': {}", path.display(), e);
    }
}

fn open_log_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    *LOG_WRITER.lock() = Some(BufWriter::new(file));
    Ok(())
}

/// Append one line to the log file (no-op when file logging is off)
pub fn write_to_file(line: &str) {
    let mut guard = LOG_WRITER.lock();
    if let Some(writer) = guard.as_mut() {
        if writeln!(writer, "{}", line).is_err() {
            // Disk full or file removed: stop trying
            *guard = None;
        }
    }
}

/// Flush pending writes
pub fn flush_file_logging() {
    if let Some(writer) = LOG_WRITER.lock().as_mut() {
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("walletscan.log");

        open_log_file(&path).unwrap();
        write_to_file("first line");
        flush_file_logging();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("first line"));

        *LOG_WRITER.lock() = None;
    }
}
