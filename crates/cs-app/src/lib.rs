//! Shared application service layer for the control response analyzer.
//!
//! Front ends go through this crate for request handling, the analysis
//! pipeline, editing sessions and exports.

pub mod analysis_service;
pub mod error;
pub mod export;
pub mod report;
pub mod request_compile;
pub mod session;

// Re-export key types for convenience
pub use analysis_service::{
    analyze, analyze_batch, analyze_file, request_fingerprint, AnalysisOutcome,
};
pub use error::{AppError, AppResult};
pub use export::{outcome_json, series_csv, write_output, SeriesKind};
pub use report::{render_report, render_report_at};
pub use request_compile::{compile_request, CompiledRequest};
pub use session::{Command, Session};
