//! Row normalization: raw delimited cells to a keyed, partially typed record.
//!
//! The pass is pure and stateless. Composite values that do not match the
//! expected shape leave their derived fields absent instead of failing.

use std::collections::HashMap;
use std::sync::LazyLock;

use camspec_catalog::{CameraField, FieldKind, FieldValue, RawRecord, RecordError};
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Input has no header row")]
    MissingHeader,
}

/// Normalized forms of the two 35mm-equivalent source columns.
const FOCAL_LENGTH_35_SOURCE: &str = "focal_length_(35mm_equiv.)";
const MAX_APERTURE_35_SOURCE: &str = "max._aperture_(35mm_equiv.)";

/// `<number> x <number>`, e.g. "35.9 x 23.9 mm".
static SENSOR_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*[x×]\s*(\d+(?:\.\d+)?)").expect("valid regex")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+|\d+").expect("valid regex"));

/// Turn a source column header into a record key.
///
/// Lower-cases and replaces spaces with underscores, renames the two
/// 35mm-equivalent columns, then strips `.`, `(` and `)` and turns `-` into
/// `_` so the key is a valid column identifier.
pub fn normalize_key(header: &str) -> String {
    let key = header.trim().to_lowercase().replace(' ', "_");
    match key.as_str() {
        FOCAL_LENGTH_35_SOURCE => CameraField::FocalLength35.as_str().to_string(),
        MAX_APERTURE_35_SOURCE => CameraField::MaxAperture35.as_str().to_string(),
        _ => key.replace(['.', '(', ')'], "").replace('-', "_"),
    }
}

/// Normalized keys for one input file, computed once from its header.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    keys: Vec<String>,
}

impl HeaderMap {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Result<Self, NormalizeError> {
        if header.iter().all(|h| h.as_ref().trim().is_empty()) {
            return Err(NormalizeError::MissingHeader);
        }
        Ok(Self {
            keys: header.iter().map(|h| normalize_key(h.as_ref())).collect(),
        })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Normalize one row of cells given in header order.
    ///
    /// Cells beyond the header are ignored; missing trailing cells are null.
    pub fn normalize_row<'a, I>(&self, cells: I) -> RawRecord
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut record = RawRecord::new();
        for (key, cell) in self.keys.iter().zip(cells) {
            if let Some(value) = clean_value(cell) {
                record.insert(key.clone(), FieldValue::Text(value));
            }
        }

        split_sensor_size(&mut record);
        split_sensor_resolution(&mut record);
        split_iso(&mut record);
        coerce_booleans(&mut record);
        record
    }
}

/// Normalize a row given as a mapping from raw header name to cell text.
pub fn normalize<S: AsRef<str>>(
    header: &[S],
    row: &HashMap<String, String>,
) -> Result<RawRecord, NormalizeError> {
    let map = HeaderMap::new(header)?;
    let cells = header
        .iter()
        .map(|h| row.get(h.as_ref()).map(String::as_str).unwrap_or(""));
    Ok(map.normalize_row(cells))
}

/// Trim, decode HTML entities, and map empty results to `None`.
fn clean_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let decoded = html_escape::decode_html_entities(trimmed);
    let decoded = decoded.trim();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded.to_string())
    }
}

fn text<'r>(record: &'r RawRecord, field: CameraField) -> Option<&'r str> {
    record.get(field.as_str()).and_then(FieldValue::as_text)
}

fn split_sensor_size(record: &mut RawRecord) {
    let Some((w, h)) = text(record, CameraField::SensorSize).and_then(parse_sensor_size) else {
        return;
    };
    record.insert(CameraField::SensorSizeW.as_str().to_string(), FieldValue::Real(w));
    record.insert(CameraField::SensorSizeH.as_str().to_string(), FieldValue::Real(h));
}

/// First `<w> x <h>` pair in the text, in millimetres.
fn parse_sensor_size(size: &str) -> Option<(f64, f64)> {
    let caps = SENSOR_SIZE_RE.captures(size)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

fn split_sensor_resolution(record: &mut RawRecord) {
    let Some((w, h)) = text(record, CameraField::SensorResolution).and_then(parse_resolution)
    else {
        return;
    };
    record.insert(CameraField::SensorPxW.as_str().to_string(), FieldValue::Integer(w));
    record.insert(CameraField::SensorPxH.as_str().to_string(), FieldValue::Integer(h));
}

/// The first two numeric tokens of the text as pixel counts.
fn parse_resolution(resolution: &str) -> Option<(i64, i64)> {
    let mut tokens = NUMBER_RE.find_iter(resolution);
    let w = parse_pixels(tokens.next()?.as_str())?;
    let h = parse_pixels(tokens.next()?.as_str())?;
    Some((w, h))
}

/// Parse a pixel count. Decimal tokens are truncated toward zero.
fn parse_pixels(token: &str) -> Option<i64> {
    if token.contains('.') {
        token.parse::<f64>().ok().map(|x| x.trunc() as i64)
    } else {
        token.parse().ok()
    }
}

fn split_iso(record: &mut RawRecord) {
    let key = CameraField::Iso.as_str();
    let list = match record.get(key) {
        Some(FieldValue::Text(iso)) => FieldValue::split_list(iso),
        _ => return,
    };
    record.insert(key.to_string(), FieldValue::List(list));
}

/// Replace "yes"/"no" text (any casing) with booleans on the capability
/// flag fields. Other fields keep their text, and values that are already
/// booleans are left alone, so running this twice changes nothing.
pub fn coerce_booleans(record: &mut RawRecord) {
    for field in CameraField::boolean_fields() {
        let flag = match record.get(field.as_str()) {
            Some(FieldValue::Text(v)) if v.eq_ignore_ascii_case("yes") => true,
            Some(FieldValue::Text(v)) if v.eq_ignore_ascii_case("no") => false,
            _ => continue,
        };
        record.insert(field.as_str().to_string(), FieldValue::Bool(flag));
    }
}

/// Parse text values of integer and real fields into numbers.
///
/// Keys that are not camera fields are left for the record builder to
/// reject. A value that is not a number in full is a type mismatch.
pub fn parse_numeric_fields(record: &mut RawRecord) -> Result<(), RecordError> {
    for (key, value) in record.iter_mut() {
        let Ok(field) = key.parse::<CameraField>() else {
            continue;
        };
        let FieldValue::Text(s) = value else {
            continue;
        };
        let parsed = match field.kind() {
            FieldKind::Integer => s.parse::<i64>().ok().map(FieldValue::Integer),
            FieldKind::Real => s
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(FieldValue::Real),
            _ => continue,
        };
        match parsed {
            Some(v) => *value = v,
            None => {
                return Err(RecordError::TypeMismatch {
                    field,
                    expected: field.kind(),
                    found: FieldKind::Text,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_lowercase_and_underscores() {
        assert_eq!(normalize_key("Sensor Size"), "sensor_size");
        assert_eq!(normalize_key("Effective megapixels"), "effective_megapixels");
        assert_eq!(normalize_key("ISO"), "iso");
    }

    #[test]
    fn key_35mm_renames() {
        assert_eq!(normalize_key("Focal length (35mm equiv.)"), "focal_length_35");
        assert_eq!(normalize_key("Max. aperture (35mm equiv.)"), "max_aperture_35");
    }

    #[test]
    fn key_punctuation_is_stripped() {
        assert_eq!(normalize_key("Built-in flash"), "built_in_flash");
        assert_eq!(normalize_key("Max. aperture"), "max_aperture");
    }

    #[test]
    fn clean_value_rules() {
        assert_eq!(clean_value("  Canon  "), Some("Canon".to_string()));
        assert_eq!(clean_value("AT&amp;T"), Some("AT&T".to_string()));
        assert_eq!(clean_value(""), None);
        assert_eq!(clean_value("   "), None);
    }

    #[test]
    fn sensor_size_pattern() {
        assert_eq!(parse_sensor_size("36.0 x 24.0 mm"), Some((36.0, 24.0)));
        assert_eq!(parse_sensor_size("1/2.3\" (6.17 x 4.55 mm)"), Some((6.17, 4.55)));
        assert_eq!(parse_sensor_size("23.5×15.6mm"), Some((23.5, 15.6)));
        assert_eq!(parse_sensor_size("Full frame"), None);
    }

    #[test]
    fn resolution_tokens() {
        assert_eq!(parse_resolution("6720 x 4480"), Some((6720, 4480)));
        assert_eq!(parse_resolution("6000.5 x 4000.7"), Some((6000, 4000)));
        assert_eq!(parse_resolution("24 MP"), None);
    }

    #[test]
    fn pixel_tokens_truncate() {
        assert_eq!(parse_pixels("6720"), Some(6720));
        assert_eq!(parse_pixels("4480.9"), Some(4480));
    }

    #[test]
    fn numeric_text_is_parsed() {
        let mut record = RawRecord::new();
        record.insert("year".to_string(), "2020".into());
        record.insert("megapixels".to_string(), "20.1".into());
        record.insert("model".to_string(), "1234".into());
        parse_numeric_fields(&mut record).unwrap();
        assert_eq!(record["year"], FieldValue::Integer(2020));
        assert_eq!(record["megapixels"], FieldValue::Real(20.1));
        assert_eq!(record["model"], FieldValue::Text("1234".to_string()));
    }

    #[test]
    fn numeric_text_mismatch() {
        let mut record = RawRecord::new();
        record.insert("crop_factor".to_string(), "about 1.5".into());
        let err = parse_numeric_fields(&mut record).unwrap_err();
        assert!(matches!(
            err,
            RecordError::TypeMismatch {
                field: CameraField::CropFactor,
                ..
            }
        ));
    }

    #[test]
    fn non_finite_reals_are_mismatches() {
        for text in ["NaN", "nan", "inf", "-infinity"] {
            let mut record = RawRecord::new();
            record.insert("crop_factor".to_string(), text.into());
            assert!(
                matches!(
                    parse_numeric_fields(&mut record),
                    Err(RecordError::TypeMismatch {
                        field: CameraField::CropFactor,
                        ..
                    })
                ),
                "{text} was accepted"
            );
        }
    }
}
