use crate::data::Database;
use indicatif::{ProgressBar, ProgressStyle};
use quorra_scanner::{ProgressCallback, ScanConfig, ScanEvent, ScanReport, Scanner};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Options for configuring a scan
pub struct ScanOptions {
    pub target: String,
    pub link_limit: usize,
    pub max_concurrency: usize,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
}

impl ScanOptions {
    pub fn new(target: impl Into<String>) -> Self {
        let defaults = ScanConfig::default();
        Self {
            target: target.into(),
            link_limit: defaults.link_limit,
            max_concurrency: defaults.max_concurrency,
            timeout_secs: defaults.timeout.as_secs(),
            show_progress_bars: false,
        }
    }

    fn to_config(&self) -> ScanConfig {
        ScanConfig::new()
            .with_link_limit(self.link_limit)
            .with_max_concurrency(self.max_concurrency)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// A finished scan that has been written to the database
#[derive(Debug, Clone)]
pub struct RecordedScan {
    pub scan_id: i64,
    pub report: ScanReport,
}

/// Trim the user's input and default to https when no scheme is given
pub fn normalize_target(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Target URL is empty".to_string());
    }

    let lowered = trimmed.to_lowercase();
    let target = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    match Url::parse(&target) {
        Ok(url) if url.host_str().is_some() => Ok(target),
        _ => Err(format!("Invalid target URL '{}'", trimmed)),
    }
}

/// One-line description of a progress event, for spinners and logs
pub fn describe_event(event: &ScanEvent) -> String {
    match event {
        ScanEvent::CrawlStarted { seed } => format!("Crawling {}", seed),
        ScanEvent::PageVisited { url, visited } => {
            format!("Crawling... {} pages visited ({})", visited, url)
        }
        ScanEvent::CrawlFinished { urls } => format!("Crawler found {} links", urls),
        ScanEvent::ProbingStarted { urls } => format!("Probing {} URLs", urls),
        ScanEvent::UrlProbed { url, findings } => {
            format!("Probed {} ({} finding(s))", url, findings.len())
        }
        ScanEvent::ProbingFinished { findings } => {
            format!("Probing complete, {} finding(s)", findings)
        }
    }
}

/// Crawl and probe a target. Progress is shown on a spinner when enabled and
/// forwarded to `progress_callback` when one is given.
pub async fn execute_scan(
    options: ScanOptions,
    progress_callback: Option<ProgressCallback>,
) -> Result<ScanReport, String> {
    let target = normalize_target(&options.target)?;
    let config = options.to_config();

    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .map_err(|e| format!("Invalid progress template: {}", e))?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting scan...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let probed_count = Arc::new(AtomicUsize::new(0));
    let total_urls = Arc::new(AtomicUsize::new(0));

    let pb_clone = progress_bar.clone();
    let probed_clone = probed_count.clone();
    let total_clone = total_urls.clone();
    let forward = progress_callback.clone();
    let internal_callback: ProgressCallback = Arc::new(move |event: ScanEvent| {
        if let Some(ref pb) = pb_clone {
            let message = match &event {
                ScanEvent::ProbingStarted { urls } => {
                    total_clone.store(*urls, Ordering::Relaxed);
                    describe_event(&event)
                }
                ScanEvent::UrlProbed { .. } => {
                    let done = probed_clone.fetch_add(1, Ordering::Relaxed) + 1;
                    format!(
                        "Probing... {}/{} URLs",
                        done,
                        total_clone.load(Ordering::Relaxed)
                    )
                }
                _ => describe_event(&event),
            };
            pb.set_message(message);
        }
        if let Some(ref callback) = forward {
            callback(event);
        }
    });

    let scanner = Scanner::new(config)
        .map_err(|e| e.to_string())?
        .with_progress_callback(internal_callback);

    info!("Starting scan of {}", target);
    let result = scanner
        .run(&target)
        .await
        .map_err(|e| format!("Scan of {} failed: {}", target, e));

    if let Some(ref pb) = progress_bar {
        match &result {
            Ok(report) => pb.finish_with_message(format!(
                "Scan complete! {} URLs crawled, {} finding(s)",
                report.urls.len(),
                report.findings.len()
            )),
            Err(_) => pb.abandon_with_message("Scan failed"),
        }
    }

    result
}

/// Run a scan and keep a record of it: the scan row is created up front as
/// `scanning`, then marked completed with its findings, or failed.
pub async fn run_recorded_scan(
    db: &mut Database,
    options: ScanOptions,
    progress_callback: Option<ProgressCallback>,
) -> Result<RecordedScan, String> {
    let target = normalize_target(&options.target)?;
    let scan_id = db
        .create_scan(&target)
        .map_err(|e| format!("Failed to create scan record: {}", e))?;

    let report = match execute_scan(options, progress_callback).await {
        Ok(report) => report,
        Err(e) => {
            mark_failed(db, scan_id);
            return Err(e);
        }
    };

    let stored = db
        .insert_findings(scan_id, &report.findings)
        .map_err(|e| format!("Failed to save findings: {}", e))
        .and_then(|_| {
            db.complete_scan(scan_id, report.urls.len())
                .map_err(|e| format!("Failed to update scan record: {}", e))
        });
    if let Err(e) = stored {
        mark_failed(db, scan_id);
        return Err(e);
    }

    if report.findings.is_empty() {
        info!("Scan {} finished with no vulnerabilities", scan_id);
    } else {
        info!(
            "Saved {} vulnerabilities for scan {}",
            report.findings.len(),
            scan_id
        );
    }

    Ok(RecordedScan { scan_id, report })
}

fn mark_failed(db: &Database, scan_id: i64) {
    if let Err(db_err) = db.fail_scan(scan_id) {
        warn!("Could not mark scan {} as failed: {}", scan_id, db_err);
    }
}
