use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use camspec_catalog::{CameraField, CameraRecord, FieldKind, FieldValue};
use camspec_db::{Condition, Operator, QueryLayer};

use super::{open_existing, truncate_str};
use crate::cli_types::QueryArgs;
use crate::CliError;

/// Search the camera table and print the matches.
pub(crate) fn run_query(db_path: &Path, args: &QueryArgs) -> Result<(), CliError> {
    let layer = QueryLayer::new(open_existing(db_path)?);

    let cameras = if let Some(arg) = &args.eq {
        let (field, value) = parse_pair(arg)?;
        layer.exact_match(field, typed_value(field, &value)?)
    } else if let Some(arg) = &args.like {
        let (field, value) = parse_pair(arg)?;
        layer.substring_match(field, &value)
    } else if !args.all.is_empty() {
        let pairs = parse_pairs(&args.all)?;
        layer.all_of(&borrow_pairs(&pairs))
    } else if !args.any.is_empty() {
        let pairs = parse_pairs(&args.any)?;
        layer.any_of(&borrow_pairs(&pairs))
    } else if !args.conditions.is_empty() {
        let conditions = args
            .conditions
            .iter()
            .map(|c| parse_condition(c))
            .collect::<Result<Vec<_>, _>>()?;
        layer.with_operators(&conditions)
    } else {
        layer.all()
    }
    .map_err(|e| CliError::query(e.to_string()))?;

    if args.json {
        let stdout = std::io::stdout();
        camspec_db::write_cameras_json(&cameras, stdout.lock())
            .map_err(|e| CliError::query(format!("Failed to write JSON: {}", e)))?;
    } else {
        print_table(&cameras);
    }
    Ok(())
}

fn print_table(cameras: &[CameraRecord]) {
    if cameras.is_empty() {
        log::info!("No matching cameras.");
        return;
    }

    log::info!(
        "{}",
        format!(
            "  {:<14} {:<26} {:>4}  {:<13} {:<12}",
            "Brand", "Model", "Year", "Sensor (mm)", "Pixels"
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    for camera in cameras {
        let year = camera
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        log::info!(
            "  {:<14} {:<26} {:>4}  {:<13} {:<12}",
            truncate_str(&camera.brand, 14),
            truncate_str(&camera.model, 26),
            year,
            format!("{:.1} x {:.1}", camera.sensor_size_w, camera.sensor_size_h),
            format!("{} x {}", camera.sensor_px_w, camera.sensor_px_h),
        );
    }
    crate::log_blank();
    log::info!(
        "{} camera(s)",
        cameras.len().if_supports_color(Stdout, |t| t.bold()),
    );
}

/// Parse `FIELD=VALUE`.
fn parse_pair(arg: &str) -> Result<(CameraField, String), CliError> {
    let (field, value) = arg.split_once('=').ok_or_else(|| {
        CliError::invalid_argument(format!("expected FIELD=VALUE, got '{arg}'"))
    })?;
    Ok((parse_field(field)?, value.trim().to_string()))
}

fn parse_pairs(args: &[String]) -> Result<Vec<(CameraField, String)>, CliError> {
    args.iter().map(|a| parse_pair(a)).collect()
}

fn borrow_pairs(pairs: &[(CameraField, String)]) -> Vec<(CameraField, &str)> {
    pairs.iter().map(|(f, v)| (*f, v.as_str())).collect()
}

fn parse_field(name: &str) -> Result<CameraField, CliError> {
    name.trim()
        .parse()
        .map_err(|e: camspec_catalog::UnknownField| CliError::invalid_argument(e.to_string()))
}

/// Parse `FIELD OP VALUE`; the value is everything after the operator.
fn parse_condition(arg: &str) -> Result<Condition, CliError> {
    let invalid =
        || CliError::invalid_argument(format!("expected \"FIELD OP VALUE\", got '{arg}'"));

    let (field, rest) = arg.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
    let (op, value) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(invalid)?;

    let field = parse_field(field)?;
    let operator: Operator = op
        .parse()
        .map_err(|e: camspec_db::UnknownOperator| CliError::invalid_argument(e.to_string()))?;
    let value = match operator {
        Operator::Like => FieldValue::Text(value.trim().to_string()),
        _ => typed_value(field, value.trim())?,
    };
    Ok(Condition::new(field, operator, value))
}

/// Interpret command-line text as a value of the field's type.
fn typed_value(field: CameraField, text: &str) -> Result<FieldValue, CliError> {
    let mismatch = || {
        CliError::invalid_argument(format!(
            "'{text}' is not a valid {} value for {field}",
            field.kind()
        ))
    };
    match field.kind() {
        FieldKind::Integer => text.parse().map(FieldValue::Integer).map_err(|_| mismatch()),
        FieldKind::Real => text
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map(FieldValue::Real)
            .ok_or_else(mismatch),
        FieldKind::Bool => match text.to_ascii_lowercase().as_str() {
            "yes" | "true" | "1" => Ok(FieldValue::Bool(true)),
            "no" | "false" | "0" => Ok(FieldValue::Bool(false)),
            _ => Err(mismatch()),
        },
        FieldKind::Text | FieldKind::List => Ok(FieldValue::Text(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair() {
        let (field, value) = parse_pair("brand=Canon").unwrap();
        assert_eq!(field, CameraField::Brand);
        assert_eq!(value, "Canon");

        let (field, value) = parse_pair("model = EOS R6").unwrap();
        assert_eq!(field, CameraField::Model);
        assert_eq!(value, "EOS R6");
    }

    #[test]
    fn pair_errors() {
        assert!(parse_pair("brand").is_err());
        assert!(parse_pair("lens_mount=RF").is_err());
    }

    #[test]
    fn condition_with_typed_value() {
        let cond = parse_condition("sensor_size_w > 35").unwrap();
        assert_eq!(cond.field, CameraField::SensorSizeW);
        assert_eq!(cond.operator, Operator::Gt);
        assert_eq!(cond.value, FieldValue::Real(35.0));

        let cond = parse_condition("model   like  eos r").unwrap();
        assert_eq!(cond.operator, Operator::Like);
        assert_eq!(cond.value, FieldValue::Text("eos r".to_string()));
    }

    #[test]
    fn condition_errors() {
        assert!(parse_condition("brand").is_err());
        assert!(parse_condition("brand ~ Canon").is_err());
        assert!(parse_condition("year >= soon").is_err());
    }

    #[test]
    fn typed_values() {
        assert_eq!(
            typed_value(CameraField::Year, "2020").unwrap(),
            FieldValue::Integer(2020)
        );
        assert_eq!(
            typed_value(CameraField::Hdmi, "Yes").unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(
            typed_value(CameraField::Gps, "Yes").unwrap(),
            FieldValue::Text("Yes".to_string())
        );
        assert!(typed_value(CameraField::SensorPxW, "6000.5").is_err());
        assert!(typed_value(CameraField::CropFactor, "NaN").is_err());
        assert!(typed_value(CameraField::CropFactor, "inf").is_err());
    }
}
