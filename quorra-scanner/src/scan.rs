use crate::config::ScanConfig;
use crate::crawler::{Crawler, normalize_seed};
use crate::error::Result;
use crate::fetch::build_client;
use crate::finding::Finding;
use crate::orchestrator::Orchestrator;
use crate::progress::ProgressCallback;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of a crawl followed by probing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub seed: String,
    pub urls: Vec<String>,
    pub findings: Vec<Finding>,
}

/// Crawl then probe, sharing one HTTP client between the two phases.
pub struct Scanner {
    config: ScanConfig,
    client: Client,
    progress_callback: Option<ProgressCallback>,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let client = build_client(&config)?;

        Ok(Self {
            config,
            client,
            progress_callback: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    fn crawler(&self) -> Crawler {
        let crawler = Crawler::new(self.client.clone());
        match &self.progress_callback {
            Some(callback) => crawler.with_progress_callback(callback.clone()),
            None => crawler,
        }
    }

    fn orchestrator(&self) -> Orchestrator {
        let orchestrator =
            Orchestrator::new(self.client.clone()).with_max_concurrency(self.config.max_concurrency);
        match &self.progress_callback {
            Some(callback) => orchestrator.with_progress_callback(callback.clone()),
            None => orchestrator,
        }
    }

    pub async fn crawl(&self, seed_url: &str) -> Result<HashSet<String>> {
        self.crawler().crawl(seed_url, self.config.link_limit).await
    }

    pub async fn scan_all(&self, urls: &HashSet<String>) -> Vec<Finding> {
        self.orchestrator().scan_all(urls).await
    }

    /// The report's `seed` is the parsed, fragment-free form the crawl used.
    pub async fn run(&self, seed_url: &str) -> Result<ScanReport> {
        let seed = normalize_seed(seed_url)?.to_string();
        let visited = self.crawl(&seed).await?;
        let findings = self.scan_all(&visited).await;

        let mut urls: Vec<String> = visited.into_iter().collect();
        urls.sort();

        Ok(ScanReport {
            seed,
            urls,
            findings,
        })
    }
}
