//! Domain errors shared by value objects.

use std::fmt;

/// Domain-level errors raised when constructing value objects.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// A ticker could not be parsed into a contract.
    InvalidTicker {
        /// The offending ticker.
        ticker: String,
        /// Why parsing failed.
        reason: String,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::InvalidTicker { ticker, reason } => {
                write!(f, "Invalid option ticker '{ticker}': {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
