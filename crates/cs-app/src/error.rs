//! Error types for the cs-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI one error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cs-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<cs_project::ProjectError> for AppError {
    fn from(err: cs_project::ProjectError) -> Self {
        AppError::Request(err.to_string())
    }
}

impl From<cs_project::ValidationError> for AppError {
    fn from(err: cs_project::ValidationError) -> Self {
        AppError::Request(err.to_string())
    }
}

impl From<cs_model::ValidationError> for AppError {
    fn from(err: cs_model::ValidationError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<cs_analysis::AnalysisError> for AppError {
    fn from(err: cs_analysis::AnalysisError) -> Self {
        AppError::Analysis(err.to_string())
    }
}

impl From<cs_core::CoreError> for AppError {
    fn from(err: cs_core::CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
