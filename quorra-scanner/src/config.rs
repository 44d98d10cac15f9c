use crate::error::{Result, ScanError};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const DEFAULT_LINK_LIMIT: usize = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_CONCURRENCY: usize = 20;

/// Tunables for a single scan. One `ScanConfig` produces one HTTP client.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub link_limit: usize,
    pub timeout: Duration,
    pub max_concurrency: usize,
    pub user_agent: String,
}

impl ScanConfig {
    pub fn new() -> Self {
        Self {
            link_limit: DEFAULT_LINK_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            user_agent: format!(
                "Quorra/{} (https://github.com/trapdoorsec/quorra)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }

    pub fn with_link_limit(mut self, link_limit: usize) -> Self {
        self.link_limit = link_limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.link_limit == 0 {
            return Err(ScanError::InvalidConfig(
                "link limit must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(ScanError::InvalidConfig(
                "max concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(ScanError::InvalidConfig(format!(
                "max concurrency must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "request timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}
