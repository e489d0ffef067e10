// ---------------------------------------------------------------------------
// Bundled finding dataset
// ---------------------------------------------------------------------------
//
// The scan is simulated: every execution reports the same four well-known
// CVEs regardless of the project being "scanned". One finding per severity
// bucket so aggregate counts and risk levels exercise the full range.

use depscan_types::{Finding, Severity};

/// Simulated size of the scanned dependency tree.
pub const SIMULATED_TOTAL_DEPENDENCIES: u32 = 25;

/// Return the fixed finding set reported by every scan.
pub fn bundled_findings() -> Vec<Finding> {
    vec![
        // Log4Shell
        Finding {
            cve_id: "CVE-2021-44228".into(),
            package_name: "org.apache.logging.log4j:log4j-core".into(),
            package_version: "2.14.1".into(),
            severity: Severity::Critical,
            cvss_score: 10.0,
            safe_version: Some("2.17.1".into()),
            description: "Apache Log4j2 JNDI features do not protect against \
                 attacker-controlled LDAP and other JNDI related endpoints. \
                 This allows remote code execution."
                .into(),
            remediation: "Update to version 2.17.1 or later immediately".into(),
        },
        // Spring4Shell
        Finding {
            cve_id: "CVE-2022-22965".into(),
            package_name: "org.springframework:spring-core".into(),
            package_version: "5.3.17".into(),
            severity: Severity::High,
            cvss_score: 9.8,
            safe_version: Some("5.3.18".into()),
            description: "Spring Framework RCE via Data Binding on JDK 9+".into(),
            remediation: "Upgrade to Spring Framework 5.3.18 or later".into(),
        },
        Finding {
            cve_id: "CVE-2020-36518".into(),
            package_name: "com.fasterxml.jackson.core:jackson-databind".into(),
            package_version: "2.12.3".into(),
            severity: Severity::Medium,
            cvss_score: 7.5,
            safe_version: Some("2.12.6.1".into()),
            description: "Java StackOverflow exception and denial of service \
                 via a large depth of nested objects"
                .into(),
            remediation: "Update to version 2.12.6.1 or later".into(),
        },
        Finding {
            cve_id: "CVE-2022-42889".into(),
            package_name: "org.apache.commons:commons-text".into(),
            package_version: "1.9".into(),
            severity: Severity::Low,
            cvss_score: 4.3,
            safe_version: Some("1.10.0".into()),
            description: "Apache Commons Text performs variable interpolation, \
                 allowing properties to be dynamically evaluated and expanded"
                .into(),
            remediation: "Upgrade to version 1.10.0 or later".into(),
        },
    ]
}
