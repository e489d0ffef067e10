// ---------------------------------------------------------------------------
// Vulnerability routes
// ---------------------------------------------------------------------------

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use depscan_db::VulnerabilityRecord;
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VulnListResponse {
    pub vulnerabilities: Vec<VulnerabilityRecord>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// GET /api/scans/{id}/vulnerabilities: findings for a scan
// ---------------------------------------------------------------------------

/// Returns an empty list when the scan has no findings or does not exist.
pub async fn list_vulnerabilities(
    State(state): State<Arc<AppState>>,
    Path(scan_id): Path<String>,
) -> Result<Json<VulnListResponse>, ApiError> {
    let store = state.store.lock().await;
    let vulnerabilities = store.vulns_for_scan(&scan_id).map_err(|e| {
        warn!(error = %e, scan_id = %scan_id, "failed to load vulnerabilities");
        ApiError::Internal("failed to load vulnerabilities".into())
    })?;

    let total = vulnerabilities.len();
    Ok(Json(VulnListResponse {
        vulnerabilities,
        total,
    }))
}
