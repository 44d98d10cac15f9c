// Active injection probes run against URLs that carry query parameters

pub mod lfi;
pub mod query;
pub mod sqli;
pub mod xss;

use crate::fetch::fetch;
use crate::finding::{Finding, VulnType};
use reqwest::Client;
use tracing::debug;

pub use query::{Param, QueryTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Probe {
    Xss,
    Sqli,
    Lfi,
}

impl Probe {
    pub const ALL: [Probe; 3] = [Probe::Xss, Probe::Sqli, Probe::Lfi];

    pub fn vuln_type(&self) -> VulnType {
        match self {
            Probe::Xss => VulnType::ReflectedXss,
            Probe::Sqli => VulnType::SqlInjection,
            Probe::Lfi => VulnType::LocalFileInclusion,
        }
    }

    /// First confirmed finding for `url`, or `None`. URLs without a query
    /// string are never requested.
    pub async fn run(&self, client: &Client, url: &str) -> Option<Finding> {
        match self {
            Probe::Xss => xss::probe(client, url).await,
            Probe::Sqli => sqli::probe(client, url).await,
            Probe::Lfi => lfi::probe(client, url).await,
        }
    }
}

/// Body of a mutated request. Failures count as a non-match.
async fn fetch_body(client: &Client, test_url: &str) -> Option<String> {
    match fetch(client, test_url).await {
        Ok(page) => Some(page.body),
        Err(e) => {
            debug!("Probe request to {} failed: {}", test_url, e);
            None
        }
    }
}
