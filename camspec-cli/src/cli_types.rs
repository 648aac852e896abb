//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "camspec")]
#[command(about = "Import, store, and query camera specifications", long_about = None)]
pub(crate) struct Cli {
    /// Camera database path (defaults to the configured or standard location)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Import a camera export into the database
    Import {
        /// Delimited export (or JSON snapshot with --json)
        input: PathBuf,

        /// Field delimiter of the export
        #[arg(short, long, default_value_t = ';')]
        delimiter: char,

        /// Read a JSON snapshot instead of a delimited export
        #[arg(long)]
        json: bool,

        /// Delete the existing database before importing
        #[arg(long)]
        replace: bool,
    },

    /// Convert a delimited export into normalized JSON
    Convert {
        /// Delimited export to read
        input: PathBuf,

        /// JSON file to write
        output: PathBuf,

        /// Field delimiter of the export
        #[arg(short, long, default_value_t = ';')]
        delimiter: char,
    },

    /// Search cameras by field criteria
    Query(QueryArgs),

    /// Dump every camera to a JSON file
    Export {
        /// JSON file to write
        output: PathBuf,
    },

    /// Show database statistics
    Stats,

    /// Compact the database file
    Vacuum,

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Criteria for `camspec query`. Only one criteria style may be used per call;
/// with none, every camera is listed.
#[derive(Args, Clone, Default)]
pub(crate) struct QueryArgs {
    /// Exact match, as FIELD=VALUE
    #[arg(long, value_name = "FIELD=VALUE", conflicts_with_all = ["like", "all", "any", "conditions"])]
    pub eq: Option<String>,

    /// Case-insensitive substring match, as FIELD=VALUE
    #[arg(long, value_name = "FIELD=VALUE", conflicts_with_all = ["all", "any", "conditions"])]
    pub like: Option<String>,

    /// Substring match on every given FIELD=VALUE (repeatable)
    #[arg(long, value_name = "FIELD=VALUE", conflicts_with_all = ["any", "conditions"])]
    pub all: Vec<String>,

    /// Substring match on any given FIELD=VALUE (repeatable)
    #[arg(long, value_name = "FIELD=VALUE", conflicts_with = "conditions")]
    pub any: Vec<String>,

    /// Comparison such as "sensor_size_w > 35" (repeatable, all must hold)
    #[arg(long = "where", value_name = "FIELD OP VALUE")]
    pub conditions: Vec<String>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file and the resolved database path
    Show,

    /// Print the settings file path
    Path,

    /// Save a default database path
    SetDb {
        /// Database path to use when --db is not given
        path: PathBuf,
    },

    /// Remove the saved database path
    ClearDb,
}
