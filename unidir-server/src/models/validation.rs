//! Validation error types

use std::fmt;

/// Validation error for request payloads and domain values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },

    /// Explicit `null` for a column that cannot hold one
    NullNotAllowed { field: &'static str },

    /// A partial update carried no columns and no dependent records
    NothingToUpdate,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::NullNotAllowed { field } => write!(f, "{} cannot be null", field),
            Self::NothingToUpdate => f.write_str("no fields to update"),
        }
    }
}

impl std::error::Error for ValidationError {}
