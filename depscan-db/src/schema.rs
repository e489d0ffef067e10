use crate::error::DbError;

const SCHEMA_SQL: &str = r#"
-- Scan records (one row per triggered scan)
CREATE TABLE IF NOT EXISTS scans (
    id                      TEXT PRIMARY KEY,
    project_name            TEXT NOT NULL,
    project_version         TEXT NOT NULL,
    status                  TEXT NOT NULL,
    started_at              INTEGER NOT NULL,
    total_dependencies      INTEGER NOT NULL DEFAULT 0,
    vulnerable_dependencies INTEGER NOT NULL DEFAULT 0,
    critical_count          INTEGER NOT NULL DEFAULT 0,
    high_count              INTEGER NOT NULL DEFAULT 0,
    medium_count            INTEGER NOT NULL DEFAULT 0,
    low_count               INTEGER NOT NULL DEFAULT 0,
    scan_duration_ms        INTEGER
);
CREATE INDEX IF NOT EXISTS idx_scans_project ON scans(project_name, started_at);

-- CVE findings attached to a scan
CREATE TABLE IF NOT EXISTS vulnerabilities (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    scan_id         TEXT NOT NULL REFERENCES scans(id) ON DELETE CASCADE,
    cve_id          TEXT NOT NULL,
    package_name    TEXT NOT NULL,
    package_version TEXT NOT NULL,
    severity        TEXT NOT NULL,
    cvss_score      REAL NOT NULL,
    safe_version    TEXT,
    description     TEXT NOT NULL,
    remediation     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_vulns_scan ON vulnerabilities(scan_id);
"#;

pub fn initialize(conn: &rusqlite::Connection) -> Result<(), DbError> {
    // Set WAL mode and foreign keys BEFORE schema creation so cascade
    // deletes are enforced from the first write.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
