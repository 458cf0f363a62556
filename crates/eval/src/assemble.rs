//! Fact assembly from an observation document.
//!
//! The symptom-collection side hands over a JSON object keyed by field name.
//! For each field:
//! - present as a string: parse and validate against the field's domain
//! - absent or `null`: the step never ran, so the field is `unset`
//! - an empty string: the step advanced without an answer, which is rejected
//! - any other JSON type: type mismatch
//!
//! The classifier label may be given as a canonical label or as a raw
//! classifier class id; a missing label is `Unknown`. Keys that name no
//! field are ignored.

use tracing::debug;
use tuberdx_core::{ClassifierLabel, Fact, FactBuilder, FactError, Field};

/// Key under which the original session stored the classifier output.
const LEGACY_LABEL_KEY: &str = "cnn";

/// Assemble a Fact from an observation document.
pub fn assemble_fact(observations: &serde_json::Value) -> Result<Fact, FactError> {
    let obj = observations.as_object().ok_or(FactError::NotAnObject)?;

    let label_value = obj
        .get(Field::ClassifierLabel.name())
        .or_else(|| obj.get(LEGACY_LABEL_KEY));
    let label = match as_token(Field::ClassifierLabel, label_value)? {
        Some(raw) => parse_label(raw)?,
        None => ClassifierLabel::Unknown,
    };

    let mut builder = FactBuilder::new(label);
    for field in &Field::ALL[1..] {
        let raw = as_token(*field, obj.get(field.name()))?;
        builder = builder.observe(*field, raw)?;
    }

    for key in obj.keys() {
        if Field::from_name(key).is_none() && key != LEGACY_LABEL_KEY {
            debug!(key = %key, "ignoring unrecognised observation key");
        }
    }

    Ok(builder.build())
}

/// Extract a string token, treating a missing or null value as absent.
fn as_token(field: Field, value: Option<&serde_json::Value>) -> Result<Option<&str>, FactError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(FactError::TypeMismatch {
            field,
            got: json_type_name(other),
        }),
    }
}

/// Canonical label first, then the raw classifier class ids.
fn parse_label(raw: &str) -> Result<ClassifierLabel, FactError> {
    if raw.is_empty() {
        return Err(FactError::EmptyValue {
            field: Field::ClassifierLabel,
        });
    }
    match raw.parse::<ClassifierLabel>() {
        Ok(label) => Ok(label),
        Err(err) => {
            if ClassifierLabel::class_ids().any(|id| id == raw) {
                Ok(ClassifierLabel::from_class_id(raw))
            } else {
                Err(err)
            }
        }
    }
}

/// Return a descriptive type name for a JSON value (for error messages).
fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
