use camspec_catalog::*;

fn canon_r6() -> CameraRecordBuilder {
    let mut b = CameraRecord::builder();
    b.set(CameraField::Brand, "Canon").unwrap();
    b.set(CameraField::Model, "EOS R6").unwrap();
    b.set(CameraField::SensorSizeW, 36.0).unwrap();
    b.set(CameraField::SensorSizeH, 24.0).unwrap();
    b.set(CameraField::SensorPxW, 6720i64).unwrap();
    b.set(CameraField::SensorPxH, 4480i64).unwrap();
    b
}

#[test]
fn build_with_required_fields_only() {
    let camera = canon_r6().build().unwrap();
    assert_eq!(camera.brand, "Canon");
    assert_eq!(camera.model, "EOS R6");
    assert_eq!(camera.sensor(), (36.0, 24.0, 6720, 4480));
    assert_eq!(camera.year, None);
    assert_eq!(camera.iso, None);
}

#[test]
fn missing_required_field() {
    let mut b = CameraRecord::builder();
    b.set(CameraField::Brand, "Canon").unwrap();
    b.set(CameraField::Model, "EOS R6").unwrap();
    let err = b.build().unwrap_err();
    assert!(matches!(err, RecordError::MissingField(CameraField::SensorSizeW)));
}

#[test]
fn integer_widens_to_real() {
    let mut b = CameraRecord::builder();
    b.set(CameraField::SensorSizeW, 36i64).unwrap();
    b.set(CameraField::Brand, "Sony").unwrap();
    b.set(CameraField::Model, "A7 III").unwrap();
    b.set(CameraField::SensorSizeH, 23.8).unwrap();
    b.set(CameraField::SensorPxW, 6000i64).unwrap();
    b.set(CameraField::SensorPxH, 4000i64).unwrap();
    let camera = b.build().unwrap();
    assert_eq!(camera.sensor_size_w, 36.0);
}

#[test]
fn real_does_not_narrow_to_integer() {
    let mut b = CameraRecord::builder();
    let err = b.set(CameraField::SensorPxW, 6720.5).unwrap_err();
    assert!(matches!(
        err,
        RecordError::TypeMismatch {
            field: CameraField::SensorPxW,
            expected: FieldKind::Integer,
            found: FieldKind::Real,
        }
    ));
}

#[test]
fn text_is_rejected_for_flag() {
    let mut b = CameraRecord::builder();
    let err = b.set(CameraField::Hdmi, "Yes").unwrap_err();
    assert!(matches!(err, RecordError::TypeMismatch { .. }));
}

#[test]
fn list_accepts_stored_text() {
    let mut b = canon_r6();
    b.set(CameraField::Iso, "100,200,400").unwrap();
    let camera = b.build().unwrap();
    assert_eq!(
        camera.iso,
        Some(vec!["100".to_string(), "200".to_string(), "400".to_string()])
    );
}

#[test]
fn empty_list_is_null() {
    let mut b = canon_r6();
    b.set(CameraField::Iso, Vec::<String>::new()).unwrap();
    b.set(CameraField::Iso, "").unwrap();
    assert_eq!(b.build().unwrap().iso, None);
}

#[test]
fn unknown_key_is_rejected() {
    let mut raw = RawRecord::new();
    raw.insert("brand".to_string(), "Canon".into());
    raw.insert("lens_mount".to_string(), "RF".into());
    let err = CameraRecord::from_raw(&raw).unwrap_err();
    match err {
        RecordError::UnknownField(UnknownField(name)) => assert_eq!(name, "lens_mount"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn from_raw_builds_typed_record() {
    let mut raw = RawRecord::new();
    raw.insert("brand".to_string(), "Nikon".into());
    raw.insert("model".to_string(), "D750".into());
    raw.insert("sensor_size_w".to_string(), 35.9.into());
    raw.insert("sensor_size_h".to_string(), 24.0.into());
    raw.insert("sensor_px_w".to_string(), 6016i64.into());
    raw.insert("sensor_px_h".to_string(), 4016i64.into());
    raw.insert("year".to_string(), 2014i64.into());
    raw.insert("wireless".to_string(), true.into());
    raw.insert("gps".to_string(), "No".into());

    let camera = CameraRecord::from_raw(&raw).unwrap();
    assert_eq!(camera.year, Some(2014));
    assert_eq!(camera.wireless, Some(true));
    assert_eq!(camera.gps.as_deref(), Some("No"));
}

#[test]
fn fields_skips_nulls_in_column_order() {
    let mut b = canon_r6();
    b.set(CameraField::Year, 2020i64).unwrap();
    b.set(CameraField::Hdmi, true).unwrap();
    let camera = b.build().unwrap();

    let keys: Vec<_> = camera.fields().iter().map(|(f, _)| f.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "brand",
            "model",
            "year",
            "hdmi",
            "sensor_size_w",
            "sensor_size_h",
            "sensor_px_w",
            "sensor_px_h"
        ]
    );
}

#[test]
fn get_matches_struct_fields() {
    let mut b = canon_r6();
    b.set(CameraField::FocalLength35, "24-105 mm").unwrap();
    let camera = b.build().unwrap();
    for &field in CameraField::ALL {
        let via_get = camera.get(field);
        let via_fields = camera
            .fields()
            .into_iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v);
        assert_eq!(via_get, via_fields, "field {field}");
    }
    assert_eq!(
        camera.get(CameraField::FocalLength35),
        Some(FieldValue::Text("24-105 mm".to_string()))
    );
}

#[test]
fn sensor_diagonals() {
    let camera = canon_r6().build().unwrap();
    let mm = (36.0f64 * 36.0 + 24.0 * 24.0).sqrt();
    let px = (6720.0f64 * 6720.0 + 4480.0 * 4480.0).sqrt();
    assert!((camera.diagonal_size_mm() - mm).abs() < 1e-9);
    assert!((camera.diagonal_size_px() - px).abs() < 1e-6);
}
