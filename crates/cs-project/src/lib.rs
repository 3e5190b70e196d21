//! cs-project: analysis request file format and validation.

pub mod migrate;
pub mod params;
pub mod schema;
pub mod validate;

pub use migrate::{migrate_to_latest, LATEST_VERSION};
pub use params::ParameterSpec;
pub use schema::*;
pub use validate::{validate_request, ValidationError};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ProjectResult<AnalysisRequest> {
    let request: AnalysisRequest = serde_yaml::from_str(content)?;
    let request = migrate_to_latest(request)?;
    validate_request(&request)?;
    Ok(request)
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<AnalysisRequest> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &std::path::Path, request: &AnalysisRequest) -> ProjectResult<()> {
    validate_request(request)?;
    let content = serde_yaml::to_string(request)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<AnalysisRequest> {
    let content = std::fs::read_to_string(path)?;
    let mut request: AnalysisRequest = serde_json::from_str(&content)?;
    request = migrate_to_latest(request)?;
    validate_request(&request)?;
    Ok(request)
}

pub fn save_json(path: &std::path::Path, request: &AnalysisRequest) -> ProjectResult<()> {
    validate_request(request)?;
    let content = serde_json::to_string_pretty(request)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<AnalysisRequest> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
