use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::open_existing;
use crate::CliError;

/// Dump the whole camera table to a JSON file.
pub(crate) fn run_export(db_path: &Path, output: &Path) -> Result<(), CliError> {
    let conn = open_existing(db_path)?;
    let count = camspec_db::dump_json_file(&conn, output)
        .map_err(|e| CliError::database(format!("Failed to export cameras: {}", e)))?;

    log::info!(
        "  {} Exported {} camera(s) to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        count,
        output.display(),
    );
    Ok(())
}
