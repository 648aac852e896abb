//! Camera specification data model.
//!
//! This crate defines the record shape shared by the normalizer, the
//! SQLite store, and the query layer, without any database dependencies.
//! Consumers can use these types directly for serialization, display, or
//! passing to `camspec-db` for persistence.

pub mod field;
pub mod record;
pub mod value;

pub use field::{CameraField, FieldKind, UnknownField};
pub use record::{CameraRecord, CameraRecordBuilder, RecordError};
pub use value::{FieldValue, RawRecord};
