use crate::error::{Result, ScanError};
use crate::fetch::fetch_html;
use crate::progress::{ProgressCallback, ScanEvent, emit};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Bounded breadth-first crawler confined to the seed's host[:port].
///
/// Fetches one page at a time: the links found on a page decide what the
/// frontier looks like next, so there is nothing to parallelize.
pub struct Crawler {
    client: Client,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl from `seed_url`, visiting at most `link_limit` URLs.
    ///
    /// Network failures, non-200 responses and non-HTML bodies only end that
    /// branch of the traversal. Errors are returned for bad arguments alone.
    /// The seed counts against the limit even when it cannot be fetched.
    pub async fn crawl(&self, seed_url: &str, link_limit: usize) -> Result<HashSet<String>> {
        if link_limit == 0 {
            return Err(ScanError::InvalidConfig(
                "link limit must be at least 1".to_string(),
            ));
        }

        let seed = normalize_seed(seed_url)?;
        let target_domain = network_location(&seed)
            .ok_or_else(|| ScanError::InvalidUrl(format!("{} has no host", seed_url)))?;

        info!(
            "Starting crawl of {} (domain {}, limit {})",
            seed, target_domain, link_limit
        );
        emit(
            &self.progress_callback,
            ScanEvent::CrawlStarted {
                seed: seed.to_string(),
            },
        );

        let mut frontier: VecDeque<String> = VecDeque::from([seed.to_string()]);
        let mut enqueued: HashSet<String> = HashSet::from([seed.to_string()]);
        let mut visited: HashSet<String> = HashSet::new();

        while visited.len() < link_limit {
            let Some(current_url) = frontier.pop_front() else {
                break;
            };

            if !visited.insert(current_url.clone()) {
                continue;
            }

            emit(
                &self.progress_callback,
                ScanEvent::PageVisited {
                    url: current_url.clone(),
                    visited: visited.len(),
                },
            );

            let page = match fetch_html(&self.client, &current_url).await {
                Ok(Some(page)) => page,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Could not fetch {}: {}", current_url, e);
                    continue;
                }
            };

            for link in extract_links(&page.body, &page.url) {
                if visited.len() + frontier.len() >= link_limit {
                    break;
                }

                let same_domain = Url::parse(&link)
                    .ok()
                    .and_then(|u| network_location(&u))
                    .is_some_and(|domain| domain == target_domain);

                if !same_domain {
                    debug!("  -> {} is off-domain, skipping", link);
                    continue;
                }

                if visited.contains(&link) || !enqueued.insert(link.clone()) {
                    continue;
                }

                debug!("  -> queuing {}", link);
                frontier.push_back(link);
            }
        }

        info!("Crawl complete. Visited {} pages", visited.len());
        emit(
            &self.progress_callback,
            ScanEvent::CrawlFinished {
                urls: visited.len(),
            },
        );

        Ok(visited)
    }
}

/// Parse a seed URL and drop its fragment. The seed must have a host.
pub fn normalize_seed(seed_url: &str) -> Result<Url> {
    let mut seed = Url::parse(seed_url)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed_url, e)))?;
    if seed.host_str().is_none() {
        return Err(ScanError::InvalidUrl(format!("{} has no host", seed_url)));
    }
    seed.set_fragment(None);
    Ok(seed)
}

/// `host[:port]` of a URL. Default ports are already elided by the parser.
pub fn network_location(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Resolve `href` against the page it was found on and drop the fragment.
pub fn normalize_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    resolved.set_fragment(None);

    Some(resolved.to_string())
}

/// All anchor targets on a page, resolved and fragment-stripped, in document order.
pub fn extract_links(html: &str, page_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| normalize_link(&base, href))
        .collect()
}
