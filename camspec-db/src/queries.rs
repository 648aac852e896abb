//! Criteria-driven read queries over the camera table.
//!
//! Filters name columns through [`CameraField`], so every identifier that
//! reaches SQL text comes from a closed set; values are always bound as
//! parameters.

use std::path::Path;

use camspec_catalog::{
    CameraField, CameraRecord, CameraRecordBuilder, FieldKind, FieldValue, RecordError,
};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Row};
use thiserror::Error;

use crate::operations::sql_value;
use crate::schema::{self, SchemaError};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Invalid row: {0}")]
    Record(#[from] RecordError),
    #[error("Unsupported value in column '{0}'")]
    UnsupportedValue(String),
    #[error("No criteria given")]
    EmptyCriteria,
}

// ── Operators ───────────────────────────────────────────────────────────────

/// Comparison operator for [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Case-insensitive substring match; the value is wrapped in wildcards.
    Like,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Like => "LIKE",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Error returned when a string is not a supported operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl std::fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown operator: '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl std::str::FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            other if other.eq_ignore_ascii_case("like") => Ok(Self::Like),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

/// One `field operator value` predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: CameraField,
    pub operator: Operator,
    pub value: FieldValue,
}

impl Condition {
    pub fn new(field: CameraField, operator: Operator, value: impl Into<FieldValue>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }
}

// ── Query layer ─────────────────────────────────────────────────────────────

/// Read access to the camera table through one exclusively owned connection.
///
/// Every method returns an empty `Vec` when nothing matches; store failures
/// are returned unchanged as [`QueryError::Sqlite`].
///
/// Results are all or nothing: if any matched row cannot be converted into a
/// [`CameraRecord`], the whole call fails with [`QueryError::Record`] and the
/// rows converted before it are discarded.
pub struct QueryLayer {
    conn: Connection,
}

impl QueryLayer {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, QueryError> {
        Ok(Self::new(schema::open_database(path)?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }

    /// Every camera in the table.
    pub fn all(&self) -> Result<Vec<CameraRecord>, QueryError> {
        select_cameras(&self.conn, None, Vec::new())
    }

    /// Cameras whose `field` equals `value`.
    pub fn exact_match(
        &self,
        field: CameraField,
        value: impl Into<FieldValue>,
    ) -> Result<Vec<CameraRecord>, QueryError> {
        let filter = format!("{} = ?1", field.as_str());
        select_cameras(&self.conn, Some(&filter), vec![sql_value(&value.into())])
    }

    /// Cameras whose `field`, read as text, contains `value` (case-insensitive).
    pub fn substring_match(
        &self,
        field: CameraField,
        value: &str,
    ) -> Result<Vec<CameraRecord>, QueryError> {
        let filter = like_clause(field, 1);
        select_cameras(&self.conn, Some(&filter), vec![like_pattern(value)])
    }

    /// Cameras matching a substring on every given field.
    pub fn all_of(&self, criteria: &[(CameraField, &str)]) -> Result<Vec<CameraRecord>, QueryError> {
        self.combined_like(criteria, " AND ")
    }

    /// Cameras matching a substring on at least one given field.
    pub fn any_of(&self, criteria: &[(CameraField, &str)]) -> Result<Vec<CameraRecord>, QueryError> {
        self.combined_like(criteria, " OR ")
    }

    /// Cameras satisfying every condition.
    pub fn with_operators(&self, conditions: &[Condition]) -> Result<Vec<CameraRecord>, QueryError> {
        if conditions.is_empty() {
            return Err(QueryError::EmptyCriteria);
        }

        let mut clauses = Vec::with_capacity(conditions.len());
        let mut params = Vec::with_capacity(conditions.len());
        for (i, cond) in conditions.iter().enumerate() {
            let n = i + 1;
            match cond.operator {
                Operator::Like => {
                    clauses.push(like_clause(cond.field, n));
                    params.push(like_pattern(&sql_text(&sql_value(&cond.value))));
                }
                op => {
                    clauses.push(format!("{} {} ?{}", cond.field.as_str(), op.as_sql(), n));
                    params.push(sql_value(&cond.value));
                }
            }
        }

        select_cameras(&self.conn, Some(&clauses.join(" AND ")), params)
    }

    fn combined_like(
        &self,
        criteria: &[(CameraField, &str)],
        joiner: &str,
    ) -> Result<Vec<CameraRecord>, QueryError> {
        if criteria.is_empty() {
            return Err(QueryError::EmptyCriteria);
        }

        let clauses: Vec<String> = criteria
            .iter()
            .enumerate()
            .map(|(i, (field, _))| like_clause(*field, i + 1))
            .collect();
        let params = criteria.iter().map(|(_, v)| like_pattern(v)).collect();

        select_cameras(&self.conn, Some(&clauses.join(joiner)), params)
    }
}

fn like_clause(field: CameraField, n: usize) -> String {
    format!("{} LIKE ?{} ESCAPE '\\'", field.as_str(), n)
}

/// `%value%` with LIKE metacharacters in `value` escaped.
fn like_pattern(value: &str) -> Value {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Value::Text(pattern)
}

fn sql_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(n) => n.to_string(),
        Value::Real(x) => x.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

// ── Row conversion ──────────────────────────────────────────────────────────

/// Run `SELECT *` with an optional filter and convert every row.
pub(crate) fn select_cameras(
    conn: &Connection,
    filter: Option<&str>,
    params: Vec<Value>,
) -> Result<Vec<CameraRecord>, QueryError> {
    let sql = match filter {
        Some(f) => format!("SELECT * FROM cameras WHERE {f} ORDER BY rowid"),
        None => "SELECT * FROM cameras ORDER BY rowid".to_string(),
    };
    log::debug!("query: {sql}");

    let mut stmt = conn.prepare(&sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params_from_iter(params))?;
    let mut cameras = Vec::new();
    while let Some(row) = rows.next()? {
        cameras.push(row_to_camera(row, &columns)?);
    }
    Ok(cameras)
}

/// Convert a result row into a camera, labelling values by `columns`.
///
/// `columns` must come from the statement that produced `row`; the live
/// column order is used rather than any fixed declaration order.
pub fn row_to_camera(row: &Row<'_>, columns: &[String]) -> Result<CameraRecord, QueryError> {
    let mut builder = CameraRecordBuilder::new();
    for (i, name) in columns.iter().enumerate() {
        let field: CameraField = name.parse().map_err(RecordError::from)?;
        if let Some(value) = from_sql(field, name, row.get_ref(i)?)? {
            builder.set(field, value)?;
        }
    }
    builder.build().map_err(Into::into)
}

fn from_sql(
    field: CameraField,
    column: &str,
    value: ValueRef<'_>,
) -> Result<Option<FieldValue>, QueryError> {
    let value = match value {
        ValueRef::Null => return Ok(None),
        ValueRef::Integer(n) if field.kind() == FieldKind::Bool => FieldValue::Bool(n != 0),
        ValueRef::Integer(n) => FieldValue::Integer(n),
        ValueRef::Real(x) => FieldValue::Real(x),
        ValueRef::Text(bytes) => FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => return Err(QueryError::UnsupportedValue(column.to_string())),
    };
    Ok(Some(value))
}
