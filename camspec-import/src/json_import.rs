//! Load JSON camera snapshots back into the database.
//!
//! Accepts the array-of-objects format written by the full-table dump and by
//! [`csv_to_json`](crate::csv_to_json). Explicit `null` values are treated
//! as absent fields.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use camspec_catalog::{FieldValue, RawRecord};
use rusqlite::Connection;

use crate::csv_import::{insert_records, ImportError, ImportStats};
use crate::progress::ImportProgress;

/// Read a JSON array of camera mappings.
pub fn load_json(path: &Path) -> Result<Vec<RawRecord>, ImportError> {
    let file = File::open(path).map_err(|e| ImportError::io(path, e))?;
    let rows: Vec<BTreeMap<String, Option<FieldValue>>> =
        serde_json::from_reader(BufReader::new(file))?;

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v)))
                .collect()
        })
        .collect())
}

/// Import a JSON snapshot through the same validation path as CSV rows.
pub fn import_json(
    conn: &Connection,
    path: &Path,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    if let Some(p) = progress {
        p.on_phase(&format!("Loading {}", path.display()));
    }
    let rows = load_json(path)?;
    let stats = insert_records(conn, rows, progress)?;

    if let Some(p) = progress {
        p.on_complete(&format!(
            "Imported {} of {} camera(s) from {}",
            stats.rows_inserted,
            stats.rows_read,
            path.display()
        ));
    }
    Ok(stats)
}
