use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::ExtractionError;

/// Opening fence with optional `json` tag (any case), or a bare closing fence.
static FENCE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").unwrap());

/// Strip code-fence markers wherever they occur and trim surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    FENCE_MARKER.replace_all(raw.trim(), "").trim().to_string()
}

/// Sanitize the model's raw response and parse it as a JSON object.
///
/// Anything that is not a JSON object after fence stripping is a hard failure
/// carrying the raw response.
pub fn parse_model_output(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    let cleaned = strip_code_fences(raw);

    let value: Value =
        serde_json::from_str(&cleaned).map_err(|e| ExtractionError::ExtractionParse {
            reason: e.to_string(),
            raw: raw.to_string(),
        })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ExtractionError::ExtractionParse {
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
            raw: raw.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ───────────────────────────────────────────────
// Lenient field readers
// ───────────────────────────────────────────────

/// Coerce a scalar to text: strings verbatim, numbers and booleans rendered.
/// Null, arrays and objects yield `None`.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Separator used when a single-text field arrives as a list.
const JOINED_TEXT_SEPARATOR: &str = ", ";

/// Read a nullable text field. A list of scalars is joined into one value.
pub fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(coerce_text).collect();
            tracing::debug!(field = key, parts = parts.len(), "Joining list answer for text field");
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(JOINED_TEXT_SEPARATOR))
            }
        }
        other => coerce_text(other),
    }
}

/// Read a list of text. Null elements are dropped; a bare non-empty string
/// becomes a one-element list.
pub fn text_list_field(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_text).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => vec![],
    }
}

/// Read a list whose positions matter (parallel arrays). Null elements are
/// kept as `None`; absent, null or non-array values yield an empty list.
pub fn aligned_list_field(map: &Map<String, Value>, key: &str) -> Vec<Option<String>> {
    match map.get(key) {
        Some(Value::Array(items)) => items.iter().map(coerce_text).collect(),
        _ => vec![],
    }
}

/// Read a non-negative integer age from a number or numeric string.
pub fn age_field(map: &Map<String, Value>, key: &str) -> Option<u32> {
    match map.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a list of JSON objects, skipping elements of any other shape.
pub fn object_list_field<'a>(map: &'a Map<String, Value>, key: &str) -> Vec<&'a Map<String, Value>> {
    let Some(Value::Array(items)) = map.get(key) else {
        return vec![];
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(obj) => Some(obj),
            other => {
                tracing::warn!(
                    field = key,
                    index,
                    kind = json_kind(other),
                    "Skipping non-object list entry in model output"
                );
                None
            }
        })
        .collect()
}
