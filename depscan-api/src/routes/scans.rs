// ---------------------------------------------------------------------------
// Scan CRUD routes
// ---------------------------------------------------------------------------

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use depscan_db::ScanRecord;
use depscan_scanner::ScanError;
use depscan_types::{RiskLevel, ScanStatus};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::request::ScanRequest;
use crate::state::AppState;

/// Fixed page size for the recent-scans listing.
const RECENT_SCAN_LIMIT: usize = 10;

/// A scan with its risk level derived from the severity counts.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub scan_id: String,
    pub project_name: String,
    pub project_version: String,
    pub status: ScanStatus,
    pub started_at: u64,
    pub total_dependencies: u32,
    pub vulnerable_dependencies: u32,
    pub critical_count: u32,
    pub high_count: u32,
    pub medium_count: u32,
    pub low_count: u32,
    pub scan_duration_ms: Option<u64>,
    pub risk_level: RiskLevel,
}

impl From<ScanRecord> for ScanResponse {
    fn from(record: ScanRecord) -> Self {
        let risk_level = RiskLevel::from_counts(
            record.critical_count,
            record.high_count,
            record.medium_count,
            record.low_count,
        );
        Self {
            scan_id: record.id,
            project_name: record.project_name,
            project_version: record.project_version,
            status: record.status,
            started_at: record.started_at,
            total_dependencies: record.total_dependencies,
            vulnerable_dependencies: record.vulnerable_dependencies,
            critical_count: record.critical_count,
            high_count: record.high_count,
            medium_count: record.medium_count,
            low_count: record.low_count,
            scan_duration_ms: record.scan_duration_ms,
            risk_level,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListScansResponse {
    pub scans: Vec<ScanResponse>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// POST /api/scans: trigger a new scan
// ---------------------------------------------------------------------------

pub async fn trigger_scan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScanRequest>,
) -> Result<(StatusCode, Json<ScanResponse>), ApiError> {
    let (project_name, project_version) =
        request.validate().map_err(ApiError::InvalidRequest)?;

    let store = state.store.lock().await;

    let record =
        depscan_scanner::start_scan(&store, project_name, project_version).map_err(|e| {
            warn!(error = %e, project_name, "failed to create scan");
            ApiError::Internal("failed to create scan".into())
        })?;

    let record = depscan_scanner::execute_scan(&store, &record.id).map_err(|e| match e {
        ScanError::NotFound(id) => ApiError::NotFound(format!("scan not found: {id}")),
        ScanError::Db(e) => {
            warn!(error = %e, "scan execution failed");
            ApiError::Internal("scan execution failed".into())
        }
    })?;

    info!(scan_id = %record.id, project_name, "scan triggered");

    Ok((StatusCode::CREATED, Json(record.into())))
}

// ---------------------------------------------------------------------------
// GET /api/scans: list recent scans
// ---------------------------------------------------------------------------

pub async fn list_scans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListScansResponse>, ApiError> {
    let store = state.store.lock().await;
    let scans = store.recent_scans(RECENT_SCAN_LIMIT).map_err(|e| {
        warn!(error = %e, "failed to list scans");
        ApiError::Internal("failed to list scans".into())
    })?;

    let scans: Vec<ScanResponse> = scans.into_iter().map(Into::into).collect();
    let total = scans.len();
    Ok(Json(ListScansResponse { scans, total }))
}

// ---------------------------------------------------------------------------
// GET /api/scans/{id}: get a scan by id
// ---------------------------------------------------------------------------

pub async fn get_scan(
    State(state): State<Arc<AppState>>,
    Path(scan_id): Path<String>,
) -> Result<Json<ScanResponse>, ApiError> {
    let store = state.store.lock().await;
    match store.get_scan(&scan_id) {
        Ok(Some(record)) => Ok(Json(record.into())),
        Ok(None) => Err(ApiError::NotFound(format!("scan not found: {scan_id}"))),
        Err(e) => {
            warn!(error = %e, scan_id = %scan_id, "database error loading scan");
            Err(ApiError::Internal("failed to load scan".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// GET /api/projects/{name}/scans: scan history for a project
// ---------------------------------------------------------------------------

pub async fn project_scans(
    State(state): State<Arc<AppState>>,
    Path(project_name): Path<String>,
) -> Result<Json<ListScansResponse>, ApiError> {
    let store = state.store.lock().await;
    let scans = store.scans_for_project(&project_name).map_err(|e| {
        warn!(error = %e, project_name = %project_name, "failed to load project history");
        ApiError::Internal("failed to load project history".into())
    })?;

    let scans: Vec<ScanResponse> = scans.into_iter().map(Into::into).collect();
    let total = scans.len();
    Ok(Json(ListScansResponse { scans, total }))
}

// ---------------------------------------------------------------------------
// DELETE /api/scans/{id}: delete a scan
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

pub async fn delete_scan(
    State(state): State<Arc<AppState>>,
    Path(scan_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let store = state.store.lock().await;
    match store.delete_scan(&scan_id) {
        Ok(true) => {
            info!(scan_id = %scan_id, "scan deleted");
            Ok(Json(DeleteResponse { deleted: true }))
        }
        Ok(false) => Err(ApiError::NotFound(format!("scan not found: {scan_id}"))),
        Err(e) => {
            warn!(error = %e, scan_id = %scan_id, "database error deleting scan");
            Err(ApiError::Internal("failed to delete scan".into()))
        }
    }
}
