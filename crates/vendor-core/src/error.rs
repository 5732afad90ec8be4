//! Error types for the vendor core library.

use crate::validate::ValidationError;

/// Errors that can occur while decoding or validating vendor data.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Submission was rejected by the intake rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A form or JSON field held a value outside its domain.
    #[error("Invalid value for {field}: '{value}'")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// The rejected raw value
        value: String,
    },

    /// A stored row could not be decoded into a typed record.
    #[error("Row {row} could not be decoded: {message}")]
    Decode {
        /// Zero-based data row index (header excluded)
        row: usize,
        /// What went wrong
        message: String,
    },
}

/// Convenience `Result` type alias for vendor core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error should be shown to the user as a form warning.
    ///
    /// Decode errors come from the store, not from user input.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::InvalidField { .. })
    }

    /// Creates a new invalid-field error.
    pub fn invalid_field<S: Into<String>>(field: &'static str, value: S) -> Self {
        Error::InvalidField {
            field,
            value: value.into(),
        }
    }

    /// Creates a new decode error for a stored row.
    pub fn decode<S: Into<String>>(row: usize, message: S) -> Self {
        Error::Decode {
            row,
            message: message.into(),
        }
    }
}
