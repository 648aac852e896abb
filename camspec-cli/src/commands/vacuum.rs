use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::{format_file_size, open_existing};
use crate::CliError;

/// Compact the database file and report the space reclaimed.
pub(crate) fn run_vacuum(db_path: &Path) -> Result<(), CliError> {
    let conn = open_existing(db_path)?;
    let before = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    camspec_db::vacuum(&conn)
        .map_err(|e| CliError::database(format!("Failed to vacuum database: {}", e)))?;

    let after = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    log::info!(
        "{}",
        "Database compacted.".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Path: {}", db_path.display());
    log::info!(
        "  Size: {} -> {}",
        format_file_size(before),
        format_file_size(after),
    );
    Ok(())
}
