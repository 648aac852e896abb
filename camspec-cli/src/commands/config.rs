use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::settings;
use crate::CliError;

/// Show the settings file and where the database path comes from.
pub(crate) fn run_config_show(resolved_db: &Path) -> Result<(), CliError> {
    let path = settings::settings_path();

    log::info!(
        "{}",
        "camspec Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let source = if settings::load_db_path(&path).as_deref() == Some(resolved_db) {
        "settings file"
    } else if resolved_db == settings::default_db_path() {
        "default"
    } else {
        "--db flag"
    };
    log::info!(
        "  Database:      {} {}",
        resolved_db.display().if_supports_color(Stdout, |t| t.cyan()),
        format!("({source})").if_supports_color(Stdout, |t| t.dimmed()),
    );

    if let Some(contents) = settings::load_settings_string(&path) {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("    {}", line);
        }
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings::settings_path().display());
    Ok(())
}

/// Save a default database path to the settings file.
pub(crate) fn run_config_set_db(db_path: &Path) -> Result<(), CliError> {
    let db_path = std::path::absolute(db_path)?;
    let path = settings::settings_path();
    settings::save_db_path(&path, Some(&db_path))
        .map_err(|e| CliError::config(format!("Failed to write {}: {}", path.display(), e)))?;

    log::info!(
        "  {} Default database set to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        db_path.display(),
    );
    Ok(())
}

/// Remove the saved database path from the settings file.
pub(crate) fn run_config_clear_db() -> Result<(), CliError> {
    let path = settings::settings_path();
    if !path.exists() {
        log::info!("No settings file at {}; nothing to clear.", path.display());
        return Ok(());
    }
    settings::save_db_path(&path, None)
        .map_err(|e| CliError::config(format!("Failed to write {}: {}", path.display(), e)))?;

    log::info!(
        "  {} Default database cleared (using {})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        settings::default_db_path().display(),
    );
    Ok(())
}
