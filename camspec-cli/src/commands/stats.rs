use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::format_file_size;
use crate::CliError;

pub(crate) fn run_stats(db_path: &Path) -> Result<(), CliError> {
    if !db_path.exists() {
        log::warn!("No camera database found at {}", db_path.display());
        log::info!("Run 'camspec import <csv>' to create one.");
        return Ok(());
    }

    let conn = super::open_existing(db_path)?;
    let cameras = camspec_db::count_cameras(&conn)
        .map_err(|e| CliError::database(format!("Failed to count cameras: {}", e)))?;
    let file_size = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    log::info!(
        "{}",
        "Camera Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Cameras:  {:>8}", cameras);
    log::info!("  Size:     {:>8}", format_file_size(file_size));

    Ok(())
}
