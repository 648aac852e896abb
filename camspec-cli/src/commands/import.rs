use std::path::Path;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use camspec_import::{ImportOptions, ImportProgress, ImportStats};

use super::delimiter_byte;
use crate::CliError;

/// Import a delimited export (or JSON snapshot) into the camera database.
pub(crate) fn run_import(
    db_path: &Path,
    input: &Path,
    delimiter: char,
    json: bool,
    replace: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let options = ImportOptions {
        delimiter: delimiter_byte(delimiter)?,
    };

    if replace && db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| {
            CliError::database(format!("Failed to delete {}: {}", db_path.display(), e))
        })?;
        log::info!("Removed existing database at {}", db_path.display());
    }
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = camspec_db::open_database(db_path).map_err(|e| {
        CliError::database(format!(
            "Failed to open camera database at {}: {}",
            db_path.display(),
            e
        ))
    })?;

    log::info!(
        "{}",
        format!("Importing {} into {}", input.display(), db_path.display())
            .if_supports_color(Stdout, |t| t.bold()),
    );

    let progress = CliImportProgress::new(quiet);
    let stats = if json {
        camspec_import::import_json(&conn, input, Some(&progress))
    } else {
        camspec_import::import_csv(&conn, input, &options, Some(&progress))
    }
    .map_err(|e| CliError::import(e.to_string()))?;

    log_stats(&stats, db_path);
    Ok(())
}

fn log_stats(stats: &ImportStats, db_path: &Path) {
    crate::log_blank();
    log::info!(
        "{}",
        "Import complete".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "  {} {} inserted",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        stats.rows_inserted,
    );
    if stats.rows_skipped > 0 {
        log::info!(
            "  {} {} skipped (invalid rows, see warnings above)",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            stats.rows_skipped,
        );
    }
    if stats.rows_malformed > 0 {
        log::info!(
            "  {} {} malformed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            stats.rows_malformed,
        );
    }
    if !stats.unknown_columns.is_empty() {
        log::info!(
            "  {} Ignored columns: {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            stats.unknown_columns.join(", "),
        );
    }
    log::info!("  Rows read: {}", stats.rows_read);
    log::info!("  Database: {}", db_path.display());
}

/// CLI progress reporter: a row counter bar, hidden with `--quiet`.
struct CliImportProgress {
    bar: ProgressBar,
}

impl CliImportProgress {
    fn new(quiet: bool) -> Self {
        let target = if quiet {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stdout()
        };
        let bar = ProgressBar::with_draw_target(None, target);
        bar.set_style(
            ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {wide_msg}")
                .expect("static pattern")
                .progress_chars("=> "),
        );
        Self { bar }
    }
}

impl ImportProgress for CliImportProgress {
    fn on_row(&self, current: usize, total: usize, label: &str) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
        self.bar.set_message(label.to_string());
    }

    fn on_phase(&self, message: &str) {
        self.bar.suspend(|| log::info!("{}", message));
    }

    fn on_complete(&self, message: &str) {
        self.bar.finish_and_clear();
        log::info!("{}", message);
    }
}
