pub mod finding;
pub mod severity;
pub mod status;

pub use finding::Finding;
pub use severity::{RiskLevel, Severity, SeverityCounts};
pub use status::ScanStatus;
