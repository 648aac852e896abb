//! SQLite schema creation and version tracking.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database schema version {found} is newer than supported version {expected}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

/// Create the camera table if it doesn't exist.
///
/// This is idempotent: safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    if get_schema_version(conn)? < CURRENT_VERSION {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open or create a camera database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    let version = get_schema_version(&conn)?;
    if version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }
    if version < CURRENT_VERSION {
        log::debug!(
            "Creating camera schema v{} in {}",
            CURRENT_VERSION,
            path.display()
        );
        create_schema(&conn)?;
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

// Column order matches `CameraField::ALL`. No column is NOT NULL; required
// fields are enforced by `CameraRecordBuilder` before insert.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS cameras (
    url TEXT,
    image_url TEXT,
    brand TEXT,
    model TEXT,
    also_known_as TEXT,
    year INTEGER,
    megapixels REAL,
    effective_megapixels REAL,
    total_megapixels REAL,
    sensor_size TEXT,
    sensor_type TEXT,
    sensor_resolution TEXT,
    max_image_resolution TEXT,
    crop_factor REAL,
    optical_zoom REAL,
    digital_zoom TEXT,
    iso TEXT,
    raw_support INTEGER,
    manual_focus INTEGER,
    normal_focus_range TEXT,
    macro_focus_range TEXT,
    focal_length_35 TEXT,
    aperture_priority INTEGER,
    max_aperture TEXT,
    max_aperture_35 TEXT,
    depth_of_field TEXT,
    metering TEXT,
    exposure_compensation TEXT,
    shutter_priority INTEGER,
    min_shutter_speed TEXT,
    max_shutter_speed TEXT,
    built_in_flash INTEGER,
    external_flash INTEGER,
    viewfinder TEXT,
    white_balance_presets INTEGER,
    screen_size TEXT,
    screen_resolution TEXT,
    video_capture INTEGER,
    max_video_resolution TEXT,
    storage_types TEXT,
    usb TEXT,
    hdmi INTEGER,
    wireless INTEGER,
    gps TEXT,
    battery TEXT,
    weight TEXT,
    dimensions TEXT,
    sensor_size_w REAL,
    sensor_size_h REAL,
    sensor_px_w INTEGER,
    sensor_px_h INTEGER
);
CREATE INDEX IF NOT EXISTS idx_cameras_brand_model ON cameras(brand, model);
"#;
