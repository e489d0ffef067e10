pub mod bundled;
pub mod scanner;

pub use bundled::{SIMULATED_TOTAL_DEPENDENCIES, bundled_findings};
pub use scanner::{ScanError, execute_scan, start_scan};
