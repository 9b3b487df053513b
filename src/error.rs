use serde_json::Value;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Top-level input has the wrong JSON shape. Aborts the run.
    #[error("invalid input: {input} must be {expected}, got {shape}")]
    InvalidInput {
        input: &'static str,
        expected: &'static str,
        shape: &'static str,
    },
}

impl ReportError {
    pub fn invalid_input(input: &'static str, expected: &'static str, value: &Value) -> Self {
        Self::InvalidInput {
            input,
            expected,
            shape: shape_of(value),
        }
    }
}

/// JSON type name of `value`, used in error messages.
pub fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
