//! Error types for analysis operations.

use cs_core::CoreError;
use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while assembling analysis inputs.
///
/// The analyzers themselves never fail on numeric grounds; these cover
/// malformed grids and inconsistent sample series.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid sample grid definition.
    #[error("Invalid grid: {0}")]
    Grid(#[from] CoreError),

    /// Parallel series of different lengths.
    #[error("Length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}
