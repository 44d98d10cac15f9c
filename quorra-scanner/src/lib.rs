pub mod config;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod finding;
pub mod orchestrator;
pub mod probe;
pub mod progress;
pub mod scan;

pub use config::ScanConfig;
pub use crawler::Crawler;
pub use error::ScanError;
pub use finding::{Finding, VulnType};
pub use orchestrator::Orchestrator;
pub use probe::Probe;
pub use progress::{ProgressCallback, ScanEvent};
pub use scan::{ScanReport, Scanner};
