//! Full-table JSON dump.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use camspec_catalog::CameraRecord;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::queries::{select_cameras, QueryError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A camera as a JSON object. Null fields are omitted and keys are sorted.
pub fn camera_to_json(camera: &CameraRecord) -> Result<Value, serde_json::Error> {
    // serde_json's default Map is ordered by key.
    let mut obj = Map::new();
    for (field, value) in camera.fields() {
        obj.insert(field.as_str().to_string(), serde_json::to_value(value)?);
    }
    Ok(Value::Object(obj))
}

/// Write cameras as a pretty-printed JSON array with four-space indents.
pub fn write_cameras_json<W: Write>(
    cameras: &[CameraRecord],
    writer: W,
) -> Result<usize, ExportError> {
    let rows = cameras
        .iter()
        .map(camera_to_json)
        .collect::<Result<Vec<_>, _>>()?;

    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    rows.serialize(&mut ser)?;
    let mut writer = ser.into_inner();
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(rows.len())
}

/// Write every camera as a JSON array of objects.
///
/// Returns the number of rows written.
pub fn dump_json<W: Write>(conn: &Connection, writer: W) -> Result<usize, ExportError> {
    let cameras = select_cameras(conn, None, Vec::new())?;
    write_cameras_json(&cameras, writer)
}

/// Dump every camera to a JSON file at `path`, replacing it if present.
pub fn dump_json_file(conn: &Connection, path: &Path) -> Result<usize, ExportError> {
    let file = File::create(path)?;
    let count = dump_json(conn, BufWriter::new(file))?;
    log::info!("Dumped {} camera(s) to {}", count, path.display());
    Ok(count)
}
