use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// One simulated CVE finding against a dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub cve_id: String,
    /// Dependency coordinate, e.g. `org.apache.commons:commons-text`.
    pub package_name: String,
    /// Affected version detected in the (simulated) dependency tree.
    pub package_version: String,
    pub severity: Severity,
    /// CVSS base score, 0.0-10.0.
    pub cvss_score: f64,
    /// First version that fixes the issue, when known.
    pub safe_version: Option<String>,
    pub description: String,
    pub remediation: String,
}
