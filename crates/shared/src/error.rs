use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Unavailable,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field '{}'", .0.form_key())]
    MissingField(FormField),
    #[error("field '{}' exceeds {max} characters", .field.form_key())]
    TooLong { field: FormField, max: usize },
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::MissingField(field) => *field,
            ValidationError::TooLong { field, .. } => *field,
        }
    }

    /// Wording shown next to the form.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingField(field) => {
                format!("Please fill in the {} field.", field.label())
            }
            ValidationError::TooLong { field, max } => {
                format!("{} must be at most {max} characters.", field.label())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::new(ErrorCode::Validation, value.user_message())
    }
}
