//! Import semicolon-delimited camera exports into the camera database.
//!
//! Each row is normalized, checked against the camera schema, and inserted
//! as one row. A row that cannot become a valid record is logged and
//! skipped; only unreadable input or a store failure stops the import.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use camspec_catalog::{CameraField, CameraRecord, RawRecord};
use camspec_db::operations::{self, OperationError};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::normalize::{parse_numeric_fields, HeaderMap, NormalizeError};
use crate::progress::ImportProgress;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Normalize(#[from] NormalizeError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl ImportError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Options for reading a delimited export.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Field separator byte.
    pub delimiter: u8,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { delimiter: b';' }
    }
}

/// Statistics from a single import.
#[derive(Debug, Default)]
pub struct ImportStats {
    pub rows_read: u64,
    pub rows_inserted: u64,
    /// Rows that could not be built into a valid record.
    pub rows_skipped: u64,
    /// Rows the CSV reader itself rejected.
    pub rows_malformed: u64,
    /// Normalized keys that are not camera columns, dropped from every row.
    pub unknown_columns: Vec<String>,
}

/// The normalized contents of one delimited file.
#[derive(Debug)]
pub struct NormalizedFile {
    pub header: HeaderMap,
    pub rows: Vec<RawRecord>,
    pub malformed: u64,
}

/// Read and normalize a delimited file.
///
/// A missing or unreadable file, or a file without a header row, fails
/// before any row is processed.
pub fn read_csv(path: &Path, delimiter: u8) -> Result<NormalizedFile, ImportError> {
    let file = File::open(path).map_err(|e| ImportError::io(path, e))?;
    parse_csv(BufReader::new(file), delimiter)
}

/// Normalize delimited text from any reader.
pub fn parse_csv<R: Read>(reader: R, delimiter: u8) -> Result<NormalizedFile, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let header = HeaderMap::new(&headers.iter().collect::<Vec<_>>())?;

    let mut rows = Vec::new();
    let mut malformed = 0;
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(header.normalize_row(record.iter())),
            Err(e) => {
                log::warn!("Skipping malformed CSV row: {e}");
                malformed += 1;
            }
        }
    }

    Ok(NormalizedFile {
        header,
        rows,
        malformed,
    })
}

/// Import a delimited camera export into the database.
///
/// All inserts run in one transaction, which is rolled back if the store
/// fails.
pub fn import_csv(
    conn: &Connection,
    path: &Path,
    options: &ImportOptions,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    if let Some(p) = progress {
        p.on_phase(&format!("Normalizing {}", path.display()));
    }
    let file = read_csv(path, options.delimiter)?;

    let mut stats = insert_records(conn, file.rows, progress)?;
    stats.rows_malformed = file.malformed;

    if let Some(p) = progress {
        p.on_complete(&format!(
            "Imported {} of {} row(s) from {}",
            stats.rows_inserted,
            stats.rows_read,
            path.display()
        ));
    }
    Ok(stats)
}

/// Validate and insert normalized records.
pub(crate) fn insert_records(
    conn: &Connection,
    rows: Vec<RawRecord>,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let mut stats = ImportStats {
        rows_read: rows.len() as u64,
        ..Default::default()
    };
    let mut unknown = BTreeSet::new();
    let total = rows.len();

    let tx = conn.unchecked_transaction()?;

    for (i, mut row) in rows.into_iter().enumerate() {
        row.retain(|key, _| {
            if key.parse::<CameraField>().is_ok() {
                return true;
            }
            if unknown.insert(key.clone()) {
                log::warn!("Ignoring unknown column '{key}'");
            }
            false
        });

        let label = row_label(&row);
        let built = parse_numeric_fields(&mut row).and_then(|()| CameraRecord::from_raw(&row));
        match built {
            Ok(camera) => {
                operations::insert_camera(&tx, &camera)?;
                stats.rows_inserted += 1;
            }
            Err(e) => {
                log::warn!("Skipping row {} ({}): {}", i + 1, label, e);
                stats.rows_skipped += 1;
            }
        }

        if let Some(p) = progress {
            p.on_row(i + 1, total, &label);
        }
    }

    tx.commit()?;

    stats.unknown_columns = unknown.into_iter().collect();
    Ok(stats)
}

fn row_label(row: &RawRecord) -> String {
    let part = |field: CameraField| {
        row.get(field.as_str())
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".to_string())
    };
    format!("{} {}", part(CameraField::Brand), part(CameraField::Model))
}

/// Convert a delimited export into a pretty-printed JSON array of
/// normalized rows. Rows are not checked against the camera schema.
///
/// Returns the number of rows written.
pub fn csv_to_json(csv_path: &Path, json_path: &Path, delimiter: u8) -> Result<usize, ImportError> {
    let file = read_csv(csv_path, delimiter)?;

    let out = File::create(json_path).map_err(|e| ImportError::io(json_path, e))?;
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(BufWriter::new(out), formatter);
    file.rows.serialize(&mut ser)?;
    let mut writer = ser.into_inner();
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| ImportError::io(json_path, e))?;

    log::info!(
        "Converted {} row(s) from {} to {}",
        file.rows.len(),
        csv_path.display(),
        json_path.display()
    );
    Ok(file.rows.len())
}
