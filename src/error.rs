//! Error types for Podar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Podar operations.
///
/// Provides detailed context about failures including misaligned inputs,
/// invalid hyperparameters, and use of unfitted models.
///
/// # Examples
///
/// ```
/// use podar::error::PodarError;
///
/// let err = PodarError::DimensionMismatch {
///     expected: "4 labels".to_string(),
///     actual: "3 labels".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum PodarError {
    /// Input sequences that must be index-aligned have different lengths.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Operation requires a fitted model.
    NotFitted {
        /// Model name
        model: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for PodarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PodarError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Input dimension mismatch: expected {expected}, got {actual}"
                )
            }
            PodarError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            PodarError::NotFitted { model } => {
                write!(f, "{model} is not fitted: call fit() first")
            }
            PodarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PodarError {}

impl From<&str> for PodarError {
    fn from(msg: &str) -> Self {
        PodarError::Other(msg.to_string())
    }
}

impl From<String> for PodarError {
    fn from(msg: String) -> Self {
        PodarError::Other(msg)
    }
}

impl PodarError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, PodarError>;
