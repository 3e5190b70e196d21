//! Error types for model construction.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ValidationError>;

/// Malformed input to a model constructor.
///
/// Numeric degeneracies (zero damping, zero time constant, ...) are not
/// errors; they are repaired and surfaced as warnings on the model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter vector has the wrong number of entries.
    #[error("{subject} requires {expected} values, got {got}")]
    Arity {
        subject: String,
        expected: usize,
        got: usize,
    },

    /// Parameter is NaN or infinite.
    #[error("Non-finite value for {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// Plant method index outside 1..=5.
    #[error("Unknown plant method {index} (expected 1..=5)")]
    UnknownMethod { index: usize },
}
