use crate::config::DEFAULT_MAX_CONCURRENCY;
use crate::finding::Finding;
use crate::probe::Probe;
use crate::progress::{ProgressCallback, ScanEvent, emit};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Runs every probe against every URL and merges what they find.
///
/// Each URL gets its own task and a semaphore caps how many are in flight.
/// Tasks hand their findings back to the caller's task, which is the only one
/// that touches the merged list.
pub struct Orchestrator {
    client: Client,
    max_concurrency: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Orchestrator {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            progress_callback: None,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// All three probes against one URL, concurrently.
    pub async fn scan_url(&self, url: &str) -> Vec<Finding> {
        probe_url(&self.client, url).await
    }

    /// Probe every URL. Order of the returned findings is unspecified.
    pub async fn scan_all<I, S>(&self, urls: I) -> Vec<Finding>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();

        info!(
            "Probing {} URLs with up to {} in flight",
            urls.len(),
            self.max_concurrency
        );
        emit(
            &self.progress_callback,
            ScanEvent::ProbingStarted { urls: urls.len() },
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for url in urls {
            let client = self.client.clone();
            let semaphore = semaphore.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (url, Vec::new());
                };
                let findings = probe_url(&client, &url).await;
                (url, findings)
            });
        }

        let mut all_findings = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((url, findings)) => {
                    debug!("{} finding(s) for {}", findings.len(), url);
                    emit(
                        &self.progress_callback,
                        ScanEvent::UrlProbed {
                            url,
                            findings: findings.clone(),
                        },
                    );
                    all_findings.extend(findings);
                }
                Err(e) => {
                    warn!("Probe task failed: {}", e);
                }
            }
        }

        info!("Probing complete. {} finding(s)", all_findings.len());
        emit(
            &self.progress_callback,
            ScanEvent::ProbingFinished {
                findings: all_findings.len(),
            },
        );

        all_findings
    }
}

async fn probe_url(client: &Client, url: &str) -> Vec<Finding> {
    let (xss, sqli, lfi) = tokio::join!(
        Probe::Xss.run(client, url),
        Probe::Sqli.run(client, url),
        Probe::Lfi.run(client, url)
    );

    [xss, sqli, lfi].into_iter().flatten().collect()
}
