pub(crate) mod config;
pub(crate) mod convert;
pub(crate) mod export;
pub(crate) mod import;
pub(crate) mod query;
pub(crate) mod stats;
pub(crate) mod vacuum;

use std::path::Path;

use camspec_db::Connection;

use crate::CliError;

/// Convert a `--delimiter` character into the byte the CSV reader expects.
pub(crate) fn delimiter_byte(c: char) -> Result<u8, CliError> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| CliError::invalid_argument(format!("delimiter must be ASCII, got '{c}'")))
}

/// Open an existing database, or report how to create one.
pub(crate) fn open_existing(db_path: &Path) -> Result<Connection, CliError> {
    if !db_path.exists() {
        return Err(CliError::database(format!(
            "No camera database found at {} (run 'camspec import <csv>' to create one)",
            db_path.display()
        )));
    }
    camspec_db::open_database(db_path)
        .map_err(|e| CliError::database(format!("Failed to open camera database: {}", e)))
}

/// Truncate a string to a maximum width, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}

/// Format a file size in human-readable form.
pub(crate) fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
