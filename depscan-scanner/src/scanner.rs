// ---------------------------------------------------------------------------
// Scan lifecycle
// ---------------------------------------------------------------------------

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use depscan_db::{DbError, ScanRecord, ScanStore};
use depscan_types::{ScanStatus, SeverityCounts};
use tracing::{info, warn};

use crate::bundled::{SIMULATED_TOTAL_DEPENDENCIES, bundled_findings};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("scan not found: {0}")]
    NotFound(String),
}

/// Create a new PENDING scan for a project/version pair.
pub fn start_scan(
    store: &ScanStore,
    project_name: &str,
    project_version: &str,
) -> Result<ScanRecord, ScanError> {
    let scan_id = format!("scan-{}", uuid::Uuid::new_v4());
    let record = store.create_scan(&scan_id, project_name, project_version, now_ms())?;
    Ok(record)
}

/// Run the simulated scan: PENDING -> SCANNING -> COMPLETED.
///
/// Inserts the bundled finding set, tallies severity counts, and records the
/// elapsed wall-clock time. A storage error mid-execution marks the scan
/// FAILED (best effort) before propagating; there is no retry.
pub fn execute_scan(store: &ScanStore, scan_id: &str) -> Result<ScanRecord, ScanError> {
    if store.get_scan(scan_id)?.is_none() {
        return Err(ScanError::NotFound(scan_id.to_string()));
    }

    store.set_status(scan_id, ScanStatus::Scanning)?;
    let started = Instant::now();

    let findings = bundled_findings();
    let counts = SeverityCounts::count(&findings);

    if let Err(e) = store.complete_scan(scan_id, &findings, counts, SIMULATED_TOTAL_DEPENDENCIES) {
        if let Err(mark_err) = store.set_status(scan_id, ScanStatus::Failed) {
            warn!(scan_id, error = %mark_err, "failed to mark scan as failed");
        }
        return Err(e.into());
    }

    // Duration covers finding generation and persistence.
    let duration_ms = started.elapsed().as_millis() as u64;
    if let Err(e) = store.set_duration(scan_id, duration_ms) {
        warn!(scan_id, error = %e, "failed to record scan duration");
    }

    let record = store
        .get_scan(scan_id)?
        .ok_or_else(|| ScanError::NotFound(scan_id.to_string()))?;

    info!(
        scan_id,
        vulnerabilities = record.vulnerable_dependencies,
        duration_ms = record.scan_duration_ms,
        "scan completed"
    );
    Ok(record)
}

/// Current timestamp in milliseconds since the UNIX epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
