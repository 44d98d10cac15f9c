use super::{QueryTarget, fetch_body};
use crate::finding::{Finding, VulnType};
use reqwest::Client;
use tracing::info;

pub const PAYLOADS: [&str; 2] = [
    "<script>alert('xss')</script>",
    "<img src=x onerror=alert('xss')>",
];

/// Substitute each parameter with each payload and look for it, verbatim
/// and case-insensitively, in the response body.
///
/// Plain substring matching: a payload already present in the page is a
/// false positive, and an encoding filter hides a real reflection.
pub async fn probe(client: &Client, url: &str) -> Option<Finding> {
    let target = QueryTarget::parse(url)?;

    for param in target.params() {
        for payload in PAYLOADS {
            let test_url = target.with_value(&param, payload);

            let Some(body) = fetch_body(client, &test_url).await else {
                continue;
            };

            if is_reflected(&body, payload) {
                info!("[+] XSS found: {}", test_url);
                return Some(Finding::new(test_url, VulnType::ReflectedXss, payload));
            }
        }
    }

    None
}

pub fn is_reflected(body: &str, payload: &str) -> bool {
    body.to_lowercase().contains(&payload.to_lowercase())
}
