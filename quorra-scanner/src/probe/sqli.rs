use super::{QueryTarget, fetch_body};
use crate::finding::{Finding, VulnType};
use reqwest::Client;
use tracing::info;

pub const PAYLOAD: &str = "'";

/// Lowercase database error fragments that leak into responses.
pub const ERROR_SIGNATURES: [&str; 3] = [
    "you have an error in your sql syntax",
    "warning: mysql",
    "unclosed quotation mark",
];

/// Error-based detection: append a quote to each parameter value in turn
/// and look for a database error message in the response.
pub async fn probe(client: &Client, url: &str) -> Option<Finding> {
    let target = QueryTarget::parse(url)?;

    for param in target.params() {
        let test_url = target.with_value(&param, &format!("{}{}", param.value, PAYLOAD));

        let Some(body) = fetch_body(client, &test_url).await else {
            continue;
        };

        if let Some(signature) = matching_signature(&body) {
            info!("[+] SQLi found: {} ({})", test_url, signature);
            return Some(Finding::new(test_url, VulnType::SqlInjection, PAYLOAD));
        }
    }

    None
}

pub fn matching_signature(body: &str) -> Option<&'static str> {
    let body = body.to_lowercase();
    ERROR_SIGNATURES
        .into_iter()
        .find(|signature| body.contains(signature))
}
