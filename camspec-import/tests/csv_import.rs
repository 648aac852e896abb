use std::fs;
use std::path::{Path, PathBuf};

use camspec_catalog::{CameraField, FieldValue};
use camspec_db::{dump_json_file, open_memory, QueryLayer};
use camspec_import::*;
use tempfile::TempDir;

const EXPORT: &str = "\
Brand;Model;Sensor Size;Sensor Resolution;ISO;Raw support;GPS;Year;Lens mount
Canon;EOS R6;35.9 x 23.9 mm;6000 x 4000;100, 200, 400;Yes;No;2020;RF
Nikon;D750;35.9 x 24.0 mm;6016 x 4016;100, 12800;no;;2014;F
Acme;Mystery;unknown;unknown;;;;;
Fujifilm;X100V;23.5 x 15.6 mm;6240 x 4160;;;;twenty twenty;X
";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn import(path: &Path) -> (QueryLayer, ImportStats) {
    let conn = open_memory().unwrap();
    let stats = import_csv(&conn, path, &ImportOptions::default(), None).unwrap();
    (QueryLayer::new(conn), stats)
}

#[test]
fn import_inserts_valid_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cameras.csv", EXPORT);
    let (layer, stats) = import(&path);

    assert_eq!(stats.rows_read, 4);
    assert_eq!(stats.rows_inserted, 2);
    assert_eq!(stats.rows_skipped, 2);
    assert_eq!(stats.rows_malformed, 0);

    let all = layer.all().unwrap();
    let models: Vec<&str> = all.iter().map(|c| c.model.as_str()).collect();
    assert_eq!(models, vec!["EOS R6", "D750"]);
}

#[test]
fn imported_values_are_typed() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cameras.csv", EXPORT);
    let (layer, _) = import(&path);

    let canon = layer.exact_match(CameraField::Brand, "Canon").unwrap();
    assert_eq!(canon.len(), 1);
    let canon = &canon[0];
    assert_eq!(canon.sensor(), (35.9, 23.9, 6000, 4000));
    assert_eq!(
        canon.iso,
        Some(vec!["100".to_string(), "200".to_string(), "400".to_string()])
    );
    assert_eq!(canon.raw_support, Some(true));
    assert_eq!(canon.gps.as_deref(), Some("No"));
    assert_eq!(canon.year, Some(2020));

    let nikon = layer.exact_match(CameraField::Model, "D750").unwrap();
    assert_eq!(nikon[0].raw_support, Some(false));
    assert_eq!(nikon[0].gps, None);
}

#[test]
fn unknown_columns_are_reported_once() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cameras.csv", EXPORT);
    let (_, stats) = import(&path);
    assert_eq!(stats.unknown_columns, vec!["lens_mount".to_string()]);
}

#[test]
fn custom_delimiter() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "cameras.tsv",
        "Brand\tModel\tSensor Size\tSensor Resolution\nSony\tA7 III\t35.6 x 23.8 mm\t6000 x 4000\n",
    );
    let conn = open_memory().unwrap();
    let options = ImportOptions { delimiter: b'\t' };
    let stats = import_csv(&conn, &path, &options, Some(&SilentProgress)).unwrap();
    assert_eq!(stats.rows_inserted, 1);
}

#[test]
fn missing_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let err = import_csv(
        &conn,
        &dir.path().join("absent.csv"),
        &ImportOptions::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, ImportError::Io { .. }));
}

#[test]
fn empty_file_has_no_header() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "empty.csv", "");
    let err = read_csv(&path, b';').unwrap_err();
    assert!(matches!(err, ImportError::Normalize(NormalizeError::MissingHeader)));
}

#[test]
fn parse_from_reader() {
    let file = parse_csv("Brand;Model\nLeica;Q2\n".as_bytes(), b';').unwrap();
    assert_eq!(file.header.keys(), ["brand", "model"]);
    assert_eq!(file.rows.len(), 1);
    assert_eq!(file.rows[0]["model"], FieldValue::Text("Q2".to_string()));
}

#[test]
fn convert_writes_normalized_json() {
    let dir = TempDir::new().unwrap();
    let csv_path = write_file(&dir, "cameras.csv", EXPORT);
    let json_path = dir.path().join("cameras.json");

    let count = csv_to_json(&csv_path, &json_path, b';').unwrap();
    assert_eq!(count, 4);

    let text = fs::read_to_string(&json_path).unwrap();
    assert!(text.starts_with("[\n    {\n"));
    let rows: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(rows[0]["sensor_size_w"], 35.9);
    assert_eq!(rows[0]["raw_support"], true);
    assert_eq!(rows[0]["iso"], serde_json::json!(["100", "200", "400"]));
}

#[test]
fn converted_json_imports() {
    let dir = TempDir::new().unwrap();
    let csv_path = write_file(&dir, "cameras.csv", EXPORT);
    let json_path = dir.path().join("cameras.json");
    csv_to_json(&csv_path, &json_path, b';').unwrap();

    let conn = open_memory().unwrap();
    let stats = import_json(&conn, &json_path, None).unwrap();
    assert_eq!(stats.rows_read, 4);
    assert_eq!(stats.rows_inserted, 2);
    assert_eq!(stats.unknown_columns, vec!["lens_mount".to_string()]);
}

#[test]
fn dump_round_trip() {
    let dir = TempDir::new().unwrap();
    let csv_path = write_file(&dir, "cameras.csv", EXPORT);
    let (layer, _) = import(&csv_path);
    let original = layer.all().unwrap();

    let dump_path = dir.path().join("dump.json");
    dump_json_file(layer.connection(), &dump_path).unwrap();

    let conn = open_memory().unwrap();
    let stats = import_json(&conn, &dump_path, Some(&LogProgress)).unwrap();
    assert_eq!(stats.rows_inserted, 2);
    assert!(stats.unknown_columns.is_empty());
    assert_eq!(QueryLayer::new(conn).all().unwrap(), original);
}

#[test]
fn json_nulls_are_absent() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "cameras.json",
        r#"[{"brand": "Ricoh", "model": "GR III", "gps": null,
             "sensor_size_w": 23.5, "sensor_size_h": 15.6,
             "sensor_px_w": 6000, "sensor_px_h": 4000}]"#,
    );
    let rows = load_json(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].contains_key("gps"));
}

#[test]
fn json_empty_iso_reads_back_as_null() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "cameras.json",
        r#"[{"brand": "Ricoh", "model": "GR III", "iso": [],
             "sensor_size_w": 23.5, "sensor_size_h": 15.6,
             "sensor_px_w": 6000, "sensor_px_h": 4000}]"#,
    );
    let conn = open_memory().unwrap();
    assert_eq!(import_json(&conn, &path, None).unwrap().rows_inserted, 1);

    let stored: Option<String> = conn
        .query_row("SELECT iso FROM cameras", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stored, None);
    let cameras = QueryLayer::new(conn).all().unwrap();
    assert_eq!(cameras[0].iso, None);
}

#[test]
fn non_finite_numbers_skip_the_row() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "cameras.csv",
        "Brand;Model;Sensor Size;Sensor Resolution;Crop factor\n\
         Canon;EOS R6;35.9 x 23.9 mm;6000 x 4000;NaN\n\
         Nikon;Z6;35.9 x 23.9 mm;6048 x 4024;inf\n\
         Sony;A7 III;35.6 x 23.8 mm;6000 x 4000;1.0\n",
    );
    let (layer, stats) = import(&path);
    assert_eq!(stats.rows_inserted, 1);
    assert_eq!(stats.rows_skipped, 2);

    let all = layer.all().unwrap();
    assert_eq!(all[0].model, "A7 III");
    assert_eq!(all[0].crop_factor, Some(1.0));
}

#[test]
fn store_errors_abort_the_import() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cameras.csv", EXPORT);
    let conn = open_memory().unwrap();
    conn.execute_batch("DROP TABLE cameras").unwrap();
    let err = import_csv(&conn, &path, &ImportOptions::default(), None).unwrap_err();
    assert!(matches!(err, ImportError::Db(_)));
}
