use serde_json::Value;

use crate::models::Flashcard;

/// Ways the model's text output can fail to be a flashcard
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelOutputError {
    /// Not JSON at all. `raw` keeps the untouched model text for diagnostics.
    #[error("{message}")]
    Malformed { message: String, raw: String },

    #[error("{0}")]
    SchemaViolation(String),
}

/// Parse the model's raw text into a [`Flashcard`].
///
/// Surrounding whitespace is trimmed before parsing. The result must be a JSON object whose
/// `front` and `back` fields are both non-empty strings; any other keys are dropped.
pub fn parse_flashcard(raw: &str) -> Result<Flashcard, ModelOutputError> {
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| ModelOutputError::Malformed {
            message: e.to_string(),
            raw: raw.to_string(),
        })?;

    let object = value.as_object().ok_or_else(|| {
        ModelOutputError::SchemaViolation(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        ))
    })?;

    let front = required_string(object, "front")?;
    let back = required_string(object, "back")?;

    Ok(Flashcard { front, back })
}

fn required_string(
    object: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<String, ModelOutputError> {
    match object.get(field) {
        None => Err(ModelOutputError::SchemaViolation(format!(
            "missing field '{}'",
            field
        ))),
        Some(Value::String(s)) if s.is_empty() => Err(ModelOutputError::SchemaViolation(
            format!("field '{}' is empty", field),
        )),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ModelOutputError::SchemaViolation(format!(
            "field '{}' must be a string, got {}",
            field,
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
