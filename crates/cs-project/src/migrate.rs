//! Schema migration framework.

use crate::schema::AnalysisRequest;
use crate::ProjectError;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut request: AnalysisRequest) -> Result<AnalysisRequest, ProjectError> {
    while request.version < LATEST_VERSION {
        request = migrate_one_version(request)?;
    }
    Ok(request)
}

/// Version 1 is the first request schema, so nothing older can be upgraded.
fn migrate_one_version(request: AnalysisRequest) -> Result<AnalysisRequest, ProjectError> {
    Err(ProjectError::Migration {
        what: format!("No migration path from version {}", request.version),
    })
}
