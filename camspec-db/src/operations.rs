//! Write and maintenance operations on the camera table.

use camspec_catalog::{CameraRecord, FieldValue};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Convert a field value into the SQLite value it is stored as.
///
/// Booleans are stored as 0/1 integers and lists as comma-joined text; an
/// empty list is NULL.
pub fn sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Bool(b) => Value::Integer(i64::from(*b)),
        FieldValue::Integer(n) => Value::Integer(*n),
        FieldValue::Real(x) => Value::Real(*x),
        FieldValue::Text(s) => Value::Text(s.clone()),
        FieldValue::List(items) if items.is_empty() => Value::Null,
        FieldValue::List(items) => Value::Text(FieldValue::join_list(items)),
    }
}

/// Insert one camera as a single row. Null fields are left out of the
/// statement so the column defaults to NULL.
pub fn insert_camera(conn: &Connection, camera: &CameraRecord) -> Result<(), OperationError> {
    let fields = camera.fields();

    let columns: Vec<&str> = fields.iter().map(|(f, _)| f.as_str()).collect();
    let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO cameras ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", "),
    );

    conn.execute(
        &sql,
        params_from_iter(fields.iter().map(|(_, v)| sql_value(v))),
    )?;
    Ok(())
}

/// Number of rows in the camera table.
pub fn count_cameras(conn: &Connection) -> Result<i64, OperationError> {
    let count = conn.query_row("SELECT COUNT(*) FROM cameras", [], |r| r.get(0))?;
    Ok(count)
}

/// Reclaim free pages. Must not run inside a transaction.
pub fn vacuum(conn: &Connection) -> Result<(), OperationError> {
    conn.execute_batch("VACUUM;")?;
    Ok(())
}
