// ---------------------------------------------------------------------------
// Scan request DTO
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

/// JSON body for triggering a new scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub project_name: String,
    pub project_version: String,
}

impl ScanRequest {
    /// Validate the request, returning trimmed project coordinates.
    pub fn validate(&self) -> Result<(&str, &str), String> {
        let name = self.project_name.trim();
        if name.is_empty() {
            return Err("project_name is required".into());
        }
        let version = self.project_version.trim();
        if version.is_empty() {
            return Err("project_version is required".into());
        }
        Ok((name, version))
    }
}
