use crate::config::ScanConfig;
use crate::error::Result;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// A fetched response, reduced to what the crawler and probes look at.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn is_html(&self) -> bool {
        self.content_type
            .as_ref()
            .map(|ct| ct.to_lowercase().contains("text/html"))
            .unwrap_or(false)
    }
}

/// Build the client shared by every request of one scan.
pub fn build_client(config: &ScanConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .connect_timeout(config.timeout / 2)
        .pool_max_idle_per_host(config.max_concurrency)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;

    Ok(client)
}

fn content_type_of(response: &Response) -> Option<String> {
    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// GET `url` and read the body as text. `Page::url` is where the response
/// came from after redirects.
pub async fn fetch(client: &Client, url: &str) -> Result<Page> {
    debug!("Fetching {}", url);

    let response = client.get(url).send().await?;

    let final_url = response.url().to_string();
    let status = response.status().as_u16();
    let content_type = content_type_of(&response);

    let body = response.text().await?;

    Ok(Page {
        url: final_url,
        status,
        content_type,
        body,
    })
}

/// GET `url`, reading the body only for a 200 HTML response. Anything else
/// is `Ok(None)` and its body is never downloaded.
pub async fn fetch_html(client: &Client, url: &str) -> Result<Option<Page>> {
    debug!("Fetching {}", url);

    let response = client.get(url).send().await?;

    let mut page = Page {
        url: response.url().to_string(),
        status: response.status().as_u16(),
        content_type: content_type_of(&response),
        body: String::new(),
    };

    if !page.is_success() {
        debug!("Skipping {} (status {})", url, page.status);
        return Ok(None);
    }
    if !page.is_html() {
        debug!(
            "Skipping non-HTML content at {} ({})",
            url,
            page.content_type.as_deref().unwrap_or("no content type")
        );
        return Ok(None);
    }

    page.body = response.text().await?;
    Ok(Some(page))
}
