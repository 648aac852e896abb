//! Dynamically typed field values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldKind;

/// A single non-null value in a camera record.
///
/// Serialized untagged, so JSON output reads as plain strings, numbers,
/// booleans, and arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    List(Vec<String>),
}

/// A loosely keyed record: normalized column name to value.
///
/// Null values are represented by absent keys.
pub type RawRecord = BTreeMap<String, FieldValue>;

impl FieldValue {
    /// The kind this value carries as-is, before any widening.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Bool,
            Self::Integer(_) => FieldKind::Integer,
            Self::Real(_) => FieldKind::Real,
            Self::Text(_) => FieldKind::Text,
            Self::List(_) => FieldKind::List,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Split comma-joined text into trimmed segments, preserving order.
    /// Blank text is the empty list.
    pub fn split_list(text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        text.split(',').map(|s| s.trim().to_string()).collect()
    }

    /// Join list segments the way they are stored in a single column.
    pub fn join_list(items: &[String]) -> String {
        items.join(",")
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("yes"),
            Self::Bool(false) => f.write_str("no"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Real(x)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_untagged() {
        let values = vec![
            FieldValue::Bool(true),
            FieldValue::Integer(6720),
            FieldValue::Real(36.0),
            FieldValue::Text("CMOS".to_string()),
            FieldValue::List(vec!["100".to_string(), "200".to_string()]),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[true,6720,36.0,"CMOS",["100","200"]]"#);
    }

    #[test]
    fn deserializes_numbers_by_shape() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"[24, 23.8, "x", false]"#).unwrap();
        assert_eq!(values[0], FieldValue::Integer(24));
        assert_eq!(values[1], FieldValue::Real(23.8));
        assert_eq!(values[2], FieldValue::Text("x".to_string()));
        assert_eq!(values[3], FieldValue::Bool(false));
    }

    #[test]
    fn split_list_trims_and_keeps_order() {
        assert_eq!(
            FieldValue::split_list("400, 100 ,100"),
            vec!["400", "100", "100"]
        );
    }

    #[test]
    fn split_blank_list() {
        assert!(FieldValue::split_list("").is_empty());
        assert!(FieldValue::split_list("  ").is_empty());
    }
}
