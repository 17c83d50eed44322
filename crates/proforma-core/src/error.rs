use thiserror::Error;

use crate::deal::input::InputViolation;

#[derive(Debug, Error)]
pub enum ProformaError {
    #[error("Invalid deal input: {} constraint violation(s)", .0.len())]
    Validation(Vec<InputViolation>),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProformaError {
    fn from(e: serde_json::Error) -> Self {
        ProformaError::SerializationError(e.to_string())
    }
}
