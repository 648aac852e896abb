//! SQLite persistence layer for camera specifications.
//!
//! Provides schema creation, single-row inserts, maintenance, the
//! criteria-driven query layer, and a full-table JSON dump, backed by
//! SQLite (via rusqlite with bundled feature).

pub mod export;
pub mod operations;
pub mod queries;
pub mod schema;

pub use rusqlite::Connection;

pub use export::{camera_to_json, dump_json, dump_json_file, write_cameras_json, ExportError};
pub use operations::{count_cameras, insert_camera, vacuum, OperationError};
pub use queries::{Condition, Operator, QueryError, QueryLayer, UnknownOperator};
pub use schema::{open_database, open_memory, SchemaError};
