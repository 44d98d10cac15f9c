use crate::finding::Finding;
use std::sync::Arc;

/// Status updates emitted while a scan runs. The engine keeps no progress
/// state of its own; whoever installs the callback owns it.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    CrawlStarted { seed: String },
    PageVisited { url: String, visited: usize },
    CrawlFinished { urls: usize },
    ProbingStarted { urls: usize },
    UrlProbed { url: String, findings: Vec<Finding> },
    ProbingFinished { findings: usize },
}

pub type ProgressCallback = Arc<dyn Fn(ScanEvent) + Send + Sync>;

pub(crate) fn emit(callback: &Option<ProgressCallback>, event: ScanEvent) {
    if let Some(callback) = callback {
        callback(event);
    }
}
