//! Validation error types

use std::fmt;

/// Input could not be coerced into the expected shape
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Required field absent from the request
    Missing { field: &'static str },

    /// Field present but not of the expected type
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Request body could not be read (malformed multipart, bad encoding)
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::Malformed { reason } => write!(f, "malformed request: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
