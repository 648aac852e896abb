//! camspec CLI
//!
//! Command-line interface for importing and querying camera specifications.

mod cli_types;
mod commands;
mod error;
mod settings;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use log::{Level, LevelFilter};

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to set up logging: {e}");
        std::process::exit(1);
    }

    let db_path = settings::resolve_db_path(cli.db);
    log::debug!("database: {}", db_path.display());

    let result = match cli.command {
        Commands::Import {
            input,
            delimiter,
            json,
            replace,
        } => commands::import::run_import(&db_path, &input, delimiter, json, replace, cli.quiet),
        Commands::Convert {
            input,
            output,
            delimiter,
        } => commands::convert::run_convert(&input, &output, delimiter),
        Commands::Query(args) => commands::query::run_query(&db_path, &args),
        Commands::Export { output } => commands::export::run_export(&db_path, &output),
        Commands::Stats => commands::stats::run_stats(&db_path),
        Commands::Vacuum => commands::vacuum::run_vacuum(&db_path),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&db_path),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::SetDb { path } => commands::config::run_config_set_db(&path),
            ConfigAction::ClearDb => commands::config::run_config_clear_db(),
        },
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Log an empty line (used as a visual separator between output sections).
pub(crate) fn log_blank() {
    log::info!("");
}

/// Install the logger.
///
/// Info messages print bare, so they read as normal command output; warnings
/// and errors carry a coloured level prefix. `--verbose` adds timestamps and
/// debug messages. `RUST_LOG` overrides the level chosen by the flags.
fn init_logging(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    builder.format(move |buf, record| {
        if verbose {
            write!(buf, "[{} {:<5}] ", buf.timestamp_millis(), record.level())?;
        } else if record.level() <= Level::Warn {
            let style = buf.default_level_style(record.level());
            let label = record.level().as_str().to_lowercase();
            write!(buf, "{style}{label}{style:#}: ")?;
        }
        writeln!(buf, "{}", record.args())
    });

    match logfile {
        Some(path) => {
            let file = File::create(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(TeeWriter {
                console: io::stdout(),
                file: strip_ansi_escapes::Writer::new(file),
            })));
        }
        None => {
            builder.target(env_logger::Target::Stdout);
        }
    }

    builder.init();
    Ok(())
}

/// Writes log output to stdout and to a file with ANSI escapes removed.
struct TeeWriter {
    console: io::Stdout,
    file: strip_ansi_escapes::Writer<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        self.file.flush()
    }
}
