use std::path::{Path, PathBuf};

use depscan_types::{Finding, ScanStatus, Severity, SeverityCounts};
use rusqlite::{Connection, Row, params};
use tracing::debug;

use crate::error::DbError;
use crate::schema;

/// Persistent scan database backed by SQLite.
pub struct ScanStore {
    conn: Connection,
}

/// One persisted scan with its aggregate severity counts.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanRecord {
    pub id: String,
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
}

/// One persisted CVE finding attached to a scan.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VulnerabilityRecord {
    pub id: i64,
    pub scan_id: String,
    pub cve_id: String,
    pub package_name: String,
    pub package_version: String,
    pub severity: Severity,
    pub cvss_score: f64,
    pub safe_version: Option<String>,
    pub description: String,
    pub remediation: String,
}

fn default_db_path() -> PathBuf {
    if cfg!(windows) {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join("depscan").join("depscan.db")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".depscan").join("depscan.db")
    }
}

/// Intermediate row shape; status/severity strings are parsed after the
/// rusqlite closure so parse failures surface as `DbError::Other`.
struct RawScanRow {
    record: ScanRecord,
    status: String,
}

fn scan_row(row: &Row<'_>) -> rusqlite::Result<RawScanRow> {
    Ok(RawScanRow {
        record: ScanRecord {
            id: row.get(0)?,
            project_name: row.get(1)?,
            project_version: row.get(2)?,
            status: ScanStatus::Pending, // replaced once the string parses
            started_at: row.get::<_, i64>(4)? as u64,
            total_dependencies: row.get::<_, i64>(5)? as u32,
            vulnerable_dependencies: row.get::<_, i64>(6)? as u32,
            critical_count: row.get::<_, i64>(7)? as u32,
            high_count: row.get::<_, i64>(8)? as u32,
            medium_count: row.get::<_, i64>(9)? as u32,
            low_count: row.get::<_, i64>(10)? as u32,
            scan_duration_ms: row.get::<_, Option<i64>>(11)?.map(|v| v as u64),
        },
        status: row.get(3)?,
    })
}

fn finish_scan_row(raw: RawScanRow) -> Result<ScanRecord, DbError> {
    let status = raw.status.parse::<ScanStatus>().map_err(DbError::Other)?;
    Ok(ScanRecord {
        status,
        ..raw.record
    })
}

const SCAN_COLUMNS: &str = "id, project_name, project_version, status, started_at, \
     total_dependencies, vulnerable_dependencies, critical_count, high_count, \
     medium_count, low_count, scan_duration_ms";

impl ScanStore {
    /// Open (or create) the database at the default location.
    pub fn open_default() -> Result<Self, DbError> {
        let path = default_db_path();
        Self::open(&path)
    }

    /// Open a database at a specific path.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::Other(format!(
                    "failed to create db directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        debug!(path = %path.display(), "scan database opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Insert a new PENDING scan with zeroed counts.
    pub fn create_scan(
        &self,
        scan_id: &str,
        project_name: &str,
        project_version: &str,
        started_at: u64,
    ) -> Result<ScanRecord, DbError> {
        self.conn.execute(
            "INSERT INTO scans (id, project_name, project_version, status, started_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                scan_id,
                project_name,
                project_version,
                ScanStatus::Pending.to_string(),
                started_at as i64,
            ],
        )?;
        debug!(scan_id, project_name, "scan record created");
        self.get_scan(scan_id)?
            .ok_or_else(|| DbError::Other(format!("scan vanished after insert: {scan_id}")))
    }

    /// Update a scan's lifecycle status. Returns false if the scan does not exist.
    pub fn set_status(&self, scan_id: &str, status: ScanStatus) -> Result<bool, DbError> {
        let updated = self.conn.execute(
            "UPDATE scans SET status = ?1 WHERE id = ?2",
            params![status.to_string(), scan_id],
        )?;
        Ok(updated > 0)
    }

    /// Record scan results: insert all findings and write the aggregate
    /// counts and COMPLETED status in a single transaction.
    pub fn complete_scan(
        &self,
        scan_id: &str,
        findings: &[Finding],
        counts: SeverityCounts,
        total_dependencies: u32,
    ) -> Result<(), DbError> {
        let tx = self.conn.unchecked_transaction()?;

        for finding in findings {
            tx.execute(
                "INSERT INTO vulnerabilities (scan_id, cve_id, package_name, package_version, \
                 severity, cvss_score, safe_version, description, remediation) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    scan_id,
                    finding.cve_id,
                    finding.package_name,
                    finding.package_version,
                    finding.severity.to_string(),
                    finding.cvss_score,
                    finding.safe_version,
                    finding.description,
                    finding.remediation,
                ],
            )?;
        }

        tx.execute(
            "UPDATE scans SET status = ?1, total_dependencies = ?2, \
             vulnerable_dependencies = ?3, critical_count = ?4, high_count = ?5, \
             medium_count = ?6, low_count = ?7 \
             WHERE id = ?8",
            params![
                ScanStatus::Completed.to_string(),
                total_dependencies as i64,
                counts.total() as i64,
                counts.critical as i64,
                counts.high as i64,
                counts.medium as i64,
                counts.low as i64,
                scan_id,
            ],
        )?;

        tx.commit()?;
        debug!(scan_id, findings = findings.len(), "scan results saved");
        Ok(())
    }

    /// Record a scan's wall-clock duration. Returns false if the scan does
    /// not exist.
    pub fn set_duration(&self, scan_id: &str, duration_ms: u64) -> Result<bool, DbError> {
        let updated = self.conn.execute(
            "UPDATE scans SET scan_duration_ms = ?1 WHERE id = ?2",
            params![duration_ms as i64, scan_id],
        )?;
        Ok(updated > 0)
    }

    /// Load a scan by id.
    pub fn get_scan(&self, scan_id: &str) -> Result<Option<ScanRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SCAN_COLUMNS} FROM scans WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![scan_id], scan_row)?;
        match rows.next() {
            Some(raw) => Ok(Some(finish_scan_row(raw?)?)),
            None => Ok(None),
        }
    }

    /// List the most recent scans, newest first.
    pub fn recent_scans(&self, limit: usize) -> Result<Vec<ScanRecord>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SCAN_COLUMNS} FROM scans \
             ORDER BY started_at DESC, rowid DESC LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit as i64], scan_row)?;
        let mut scans = Vec::new();
        for raw in rows {
            scans.push(finish_scan_row(raw?)?);
        }
        Ok(scans)
    }

    /// Full scan history for a project, newest first.
    pub fn scans_for_project(&self, project_name: &str) -> Result<Vec<ScanRecord>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SCAN_COLUMNS} FROM scans WHERE project_name = ?1 \
             ORDER BY started_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map(params![project_name], scan_row)?;
        let mut scans = Vec::new();
        for raw in rows {
            scans.push(finish_scan_row(raw?)?);
        }
        Ok(scans)
    }

    /// Findings for a scan. Returns an empty vec when the scan has no
    /// findings or does not exist.
    pub fn vulns_for_scan(&self, scan_id: &str) -> Result<Vec<VulnerabilityRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, scan_id, cve_id, package_name, package_version, severity, \
             cvss_score, safe_version, description, remediation \
             FROM vulnerabilities WHERE scan_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![scan_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, String>(9)?,
            ))
        })?;

        let mut vulns = Vec::new();
        for row in rows {
            let (id, scan_id, cve_id, package_name, package_version, severity, cvss_score, safe_version, description, remediation) =
                row?;
            let severity = severity.parse::<Severity>().map_err(DbError::Other)?;
            vulns.push(VulnerabilityRecord {
                id,
                scan_id,
                cve_id,
                package_name,
                package_version,
                severity,
                cvss_score,
                safe_version,
                description,
                remediation,
            });
        }
        Ok(vulns)
    }

    /// Delete a scan and its findings (cascaded). Returns false if absent.
    pub fn delete_scan(&self, scan_id: &str) -> Result<bool, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM scans WHERE id = ?1", params![scan_id])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_findings() -> Vec<Finding> {
        vec![
            Finding {
                cve_id: "CVE-2021-44228".into(),
                package_name: "org.apache.logging.log4j:log4j-core".into(),
                package_version: "2.14.1".into(),
                severity: Severity::Critical,
                cvss_score: 10.0,
                safe_version: Some("2.17.1".into()),
                description: "JNDI lookup RCE".into(),
                remediation: "Update to 2.17.1 or later".into(),
            },
            Finding {
                cve_id: "CVE-2022-42889".into(),
                package_name: "org.apache.commons:commons-text".into(),
                package_version: "1.9".into(),
                severity: Severity::Low,
                cvss_score: 4.3,
                safe_version: Some("1.10.0".into()),
                description: "Variable interpolation".into(),
                remediation: "Upgrade to 1.10.0 or later".into(),
            },
        ]
    }

    #[test]
    fn create_and_get_scan() {
        let store = ScanStore::open_in_memory().unwrap();
        let record = store
            .create_scan("scan-1", "billing-service", "1.4.0", 1000)
            .unwrap();

        assert_eq!(record.id, "scan-1");
        assert_eq!(record.project_name, "billing-service");
        assert_eq!(record.status, ScanStatus::Pending);
        assert_eq!(record.critical_count, 0);
        assert!(record.scan_duration_ms.is_none());
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let store = ScanStore::open_in_memory().unwrap();
        assert!(store.get_scan("no-such-scan").unwrap().is_none());
    }

    #[test]
    fn set_status_transitions() {
        let store = ScanStore::open_in_memory().unwrap();
        store.create_scan("scan-1", "api", "2.0", 1000).unwrap();

        assert!(store.set_status("scan-1", ScanStatus::Scanning).unwrap());
        let record = store.get_scan("scan-1").unwrap().unwrap();
        assert_eq!(record.status, ScanStatus::Scanning);

        assert!(!store.set_status("missing", ScanStatus::Failed).unwrap());
    }

    #[test]
    fn complete_scan_writes_counts_and_findings() {
        let store = ScanStore::open_in_memory().unwrap();
        store.create_scan("scan-1", "api", "2.0", 1000).unwrap();

        let findings = test_findings();
        let counts = SeverityCounts::count(&findings);
        store.complete_scan("scan-1", &findings, counts, 25).unwrap();

        let record = store.get_scan("scan-1").unwrap().unwrap();
        assert_eq!(record.status, ScanStatus::Completed);
        assert_eq!(record.total_dependencies, 25);
        assert_eq!(record.vulnerable_dependencies, 2);
        assert_eq!(record.critical_count, 1);
        assert_eq!(record.low_count, 1);
        assert!(record.scan_duration_ms.is_none());

        let vulns = store.vulns_for_scan("scan-1").unwrap();
        assert_eq!(vulns.len(), 2);
        assert_eq!(vulns[0].cve_id, "CVE-2021-44228");
        assert_eq!(vulns[0].severity, Severity::Critical);
        assert_eq!(vulns[1].safe_version.as_deref(), Some("1.10.0"));
    }

    #[test]
    fn set_duration_records_elapsed_time() {
        let store = ScanStore::open_in_memory().unwrap();
        store.create_scan("scan-1", "api", "2.0", 1000).unwrap();

        assert!(store.set_duration("scan-1", 12).unwrap());
        let record = store.get_scan("scan-1").unwrap().unwrap();
        assert_eq!(record.scan_duration_ms, Some(12));

        assert!(!store.set_duration("missing", 12).unwrap());
    }

    #[test]
    fn recent_scans_ordered_and_limited() {
        let store = ScanStore::open_in_memory().unwrap();
        for i in 0..12u64 {
            store
                .create_scan(&format!("scan-{i}"), "api", "1.0", 1000 + i)
                .unwrap();
        }

        let scans = store.recent_scans(10).unwrap();
        assert_eq!(scans.len(), 10);
        assert_eq!(scans[0].id, "scan-11");
        assert_eq!(scans[9].id, "scan-2");
    }

    #[test]
    fn scans_for_project_filters_by_name() {
        let store = ScanStore::open_in_memory().unwrap();
        store.create_scan("scan-a", "api", "1.0", 1000).unwrap();
        store.create_scan("scan-b", "web", "1.0", 2000).unwrap();
        store.create_scan("scan-c", "api", "1.1", 3000).unwrap();

        let scans = store.scans_for_project("api").unwrap();
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0].id, "scan-c");
        assert_eq!(scans[1].id, "scan-a");

        assert!(store.scans_for_project("unknown").unwrap().is_empty());
    }

    #[test]
    fn vulns_for_unknown_scan_is_empty() {
        let store = ScanStore::open_in_memory().unwrap();
        assert!(store.vulns_for_scan("no-such-scan").unwrap().is_empty());
    }

    #[test]
    fn delete_scan_cascades_to_findings() {
        let store = ScanStore::open_in_memory().unwrap();
        store.create_scan("scan-1", "api", "2.0", 1000).unwrap();
        let findings = test_findings();
        let counts = SeverityCounts::count(&findings);
        store.complete_scan("scan-1", &findings, counts, 25).unwrap();

        assert!(store.delete_scan("scan-1").unwrap());
        assert!(store.get_scan("scan-1").unwrap().is_none());
        assert!(store.vulns_for_scan("scan-1").unwrap().is_empty());

        assert!(!store.delete_scan("scan-1").unwrap());
    }
}
