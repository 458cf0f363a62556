use crate::fact::Field;

/// Errors raised while constructing a `Fact`.
///
/// A Fact that fails validation never reaches the matching phase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactError {
    /// The value is not part of the field's enumeration.
    #[error("invalid value '{value}' for field '{field}', valid: {allowed:?}")]
    InvalidValue {
        field: Field,
        value: String,
        allowed: Vec<&'static str>,
    },

    /// The collection step submitted an empty answer for a required field.
    #[error("field '{field}' was submitted empty")]
    EmptyValue { field: Field },

    /// The raw input was not a string.
    #[error("type mismatch for field '{field}': expected string, got {got}")]
    TypeMismatch { field: Field, got: &'static str },

    /// The observation document was not a JSON object.
    #[error("facts must be a JSON object")]
    NotAnObject,
}
