//! Import camera specification exports into the camera database.
//!
//! This crate owns all ETL logic: normalizing delimited rows into records,
//! validating them against the camera schema, and batch-inserting them.
//! JSON snapshots produced by the dump or by [`csv_to_json`] can be loaded
//! back through the same path.

pub mod csv_import;
pub mod json_import;
pub mod normalize;
pub mod progress;

pub use csv_import::{
    csv_to_json, import_csv, parse_csv, read_csv, ImportError, ImportOptions, ImportStats,
    NormalizedFile,
};
pub use json_import::{import_json, load_json};
pub use normalize::{
    coerce_booleans, normalize, normalize_key, parse_numeric_fields, HeaderMap, NormalizeError,
};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
