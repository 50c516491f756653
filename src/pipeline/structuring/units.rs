//! Splitting of combined "value + unit" vital-sign strings.
//!
//! The model often answers `"120/80 mmHg"` where the record wants the
//! magnitude and the unit in two fields. [`split_value_and_unit`] reads a
//! leading numeric token (digits, `.`, `/`), skips whitespace, then reads an
//! optional unit token (ASCII letters, `%`, `°`, `/`, spaces). Anything after
//! the unit token is ignored.

use serde_json::Value;

pub const BLOOD_PRESSURE_UNIT: &str = "mmHg";
pub const HEART_RATE_UNIT: &str = "beats/min";
pub const WEIGHT_UNIT: &str = "kg";

/// A vital-sign value split into its magnitude and unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMeasurement {
    pub magnitude: Option<String>,
    pub unit: String,
}

impl SplitMeasurement {
    fn missing(default_unit: &str) -> Self {
        Self {
            magnitude: None,
            unit: default_unit.to_string(),
        }
    }
}

/// Split a model-provided value into magnitude and unit.
///
/// - absent, non-string, or blank → no magnitude, default unit
/// - no leading numeric token → trimmed input as magnitude, default unit
/// - numeric token only → numeric token, default unit
/// - numeric token and unit token → numeric token, trimmed unit token
pub fn split_value_and_unit(value: Option<&Value>, default_unit: &str) -> SplitMeasurement {
    match value {
        Some(Value::String(text)) => split_text(text, default_unit),
        _ => SplitMeasurement::missing(default_unit),
    }
}

/// Same as [`split_value_and_unit`] for an already-extracted string.
pub fn split_text(text: &str, default_unit: &str) -> SplitMeasurement {
    let text = text.trim();
    if text.is_empty() {
        return SplitMeasurement::missing(default_unit);
    }

    let number_end = text
        .find(|c: char| !is_number_char(c))
        .unwrap_or(text.len());
    if number_end == 0 {
        return SplitMeasurement {
            magnitude: Some(text.to_string()),
            unit: default_unit.to_string(),
        };
    }

    let number = &text[..number_end];
    let rest = text[number_end..].trim_start();
    let unit_end = rest.find(|c: char| !is_unit_char(c)).unwrap_or(rest.len());
    let unit = rest[..unit_end].trim();

    SplitMeasurement {
        magnitude: Some(number.to_string()),
        unit: if unit.is_empty() {
            default_unit.to_string()
        } else {
            unit.to_string()
        },
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '/'
}

fn is_unit_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '%' | '°' | '/' | ' ')
}
