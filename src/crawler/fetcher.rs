//! HTTP fetcher implementation
//!
//! This module handles every request the crawler makes:
//! - Building the HTTP client with a proper user agent string
//! - Fetching one page and extracting its anchor links
//! - Fetching a whole frontier concurrently (`FetchEngine`)
//!
//! A failed fetch never surfaces as an error. It is logged and the page is
//! reported as having no links, so one bad page cannot stall or abort a level.

use crate::config::{Config, UserAgentConfig};
use crate::crawler::parser::extract_links;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use url::Url;

/// Maximum number of redirects followed for a single page
const MAX_REDIRECTS: usize = 10;

/// Result of fetching a single page
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched and scanned the page
    Success {
        /// Final URL after redirects, which relative links were resolved against
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Anchor targets found in the body
        links: Vec<Url>,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Converts the result into the page's link set, logging any failure
    pub fn into_links(self, url: &Url) -> Vec<Url> {
        match self {
            FetchResult::Success {
                final_url, links, ..
            } => {
                if &final_url != url {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                tracing::debug!("Found {} links on {}", links.len(), url);
                links
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!("Skipping {}: expected HTML, got {}", url, content_type);
                Vec::new()
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("HTTP {} for {}. Treating it as having no links", status_code, url);
                Vec::new()
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Loading failed for {}: {}. Treating it as having no links", url, error);
                Vec::new()
            }
        }
    }
}

/// Links discovered on one page of the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    /// The page that was fetched (as requested, before redirects)
    pub source: Url,
    /// Raw anchor targets, not yet cleaned or filtered
    pub links: Vec<Url>,
}

impl PageLinks {
    pub fn empty(source: Url) -> Self {
        Self {
            source,
            links: Vec::new(),
        }
    }
}

/// Fetches a frontier and reports the links found on each page
///
/// Implementations must return exactly one `PageLinks` per input URL, in input
/// order, and only return once every page has been handled. Failures are
/// reported as empty link sets.
pub trait LinkFetcher {
    fn fetch_links(&self, urls: Vec<Url>) -> impl Future<Output = Vec<PageLinks>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// The per-request timeout is not set here; `FetchEngine` applies its own to
/// each request.
///
/// # Example
///
/// ```no_run
/// use sitemap_weaver::config::UserAgentConfig;
/// use sitemap_weaver::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page and extracts its anchor links
///
/// The timeout bounds the whole exchange, body included. Non-success statuses
/// and non-HTML content types are reported without reading the body.
pub async fn fetch_page(client: &Client, url: &Url, timeout: Duration) -> FetchResult {
    let response = match client.get(url.clone()).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                format!("Request timeout after {:?}", timeout)
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    // A missing Content-Type is given the benefit of the doubt
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.is_empty() && !is_html(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    let final_url = response.url().clone();
    match response.text().await {
        Ok(body) => {
            let links = extract_links(&body, &final_url);
            FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                links,
            }
        }
        Err(e) => FetchResult::NetworkError {
            error: format!("Failed to read body: {}", e),
        },
    }
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

/// Concurrent frontier fetcher backed by `reqwest`
///
/// Every URL gets its own task. Tasks report over a channel to a single
/// collector, which is the only writer of the batch result. An optional
/// semaphore caps the number of requests in flight.
#[derive(Debug, Clone)]
pub struct FetchEngine {
    client: Client,
    timeout: Duration,
    limiter: Option<Arc<Semaphore>>,
}

impl FetchEngine {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            limiter: None,
        }
    }

    /// Caps the number of concurrent requests
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(max_concurrent.max(1))));
        self
    }

    /// Builds an engine from the crawler and user agent configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent)?;
        let engine = Self::new(client, config.crawler.fetch_timeout());
        Ok(match config.crawler.max_concurrent_fetches {
            Some(max) => engine.with_max_concurrent(max),
            None => engine,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl LinkFetcher for FetchEngine {
    fn fetch_links(&self, urls: Vec<Url>) -> impl Future<Output = Vec<PageLinks>> + Send {
        let client = self.client.clone();
        let timeout = self.timeout;
        let limiter = self.limiter.clone();

        async move {
            let total = urls.len();
            let (tx, mut rx) = mpsc::channel::<(usize, PageLinks)>(total.max(1));

            for (position, url) in urls.iter().cloned().enumerate() {
                let tx = tx.clone();
                let client = client.clone();
                let limiter = limiter.clone();

                tokio::spawn(async move {
                    let _permit = match limiter {
                        Some(limiter) => limiter.acquire_owned().await.ok(),
                        None => None,
                    };

                    let links = fetch_page(&client, &url, timeout).await.into_links(&url);
                    // The collector holds the receiver until every sender is gone
                    let _ = tx.send((position, PageLinks { source: url, links })).await;
                });
            }
            drop(tx);

            let mut collected: Vec<Option<PageLinks>> = vec![None; total];
            while let Some((position, page)) = rx.recv().await {
                collected[position] = Some(page);
            }

            collected
                .into_iter()
                .zip(urls)
                .map(|(page, source)| {
                    page.unwrap_or_else(|| {
                        tracing::warn!("Fetch task for {} ended without a result", source);
                        PageLinks::empty(source)
                    })
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: Some("https://example.com/about".to_string()),
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("Text/HTML"));
        assert!(is_html("application/xhtml+xml"));
        assert!(!is_html("application/pdf"));
        assert!(!is_html("image/png"));
    }

    #[test]
    fn test_failures_become_empty_link_sets() {
        let url = Url::parse("https://example.com/").unwrap();

        let results = [
            FetchResult::HttpError { status_code: 500 },
            FetchResult::NetworkError {
                error: "Connection failed".to_string(),
            },
            FetchResult::ContentMismatch {
                content_type: "application/pdf".to_string(),
            },
        ];
        for result in results {
            assert!(result.into_links(&url).is_empty());
        }
    }

    #[test]
    fn test_success_yields_links() {
        let url = Url::parse("https://example.com/").unwrap();
        let result = FetchResult::Success {
            final_url: url.clone(),
            status_code: 200,
            links: vec![Url::parse("https://example.com/about").unwrap()],
        };
        assert_eq!(result.into_links(&url).len(), 1);
    }

    #[test]
    fn test_engine_from_config() {
        let mut config = Config::for_seed("https://example.com/", 2);
        config.crawler.fetch_timeout_ms = 1500;
        config.crawler.max_concurrent_fetches = Some(4);

        let engine = FetchEngine::from_config(&config).unwrap();
        assert_eq!(engine.timeout(), Duration::from_millis(1500));
        assert_eq!(
            engine.limiter.as_ref().map(|l| l.available_permits()),
            Some(4)
        );
    }

    #[tokio::test]
    async fn test_empty_frontier() {
        let engine = FetchEngine::new(Client::new(), Duration::from_secs(1));
        assert!(engine.fetch_links(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_pages_reported_in_order() {
        let engine = FetchEngine::new(Client::new(), Duration::from_millis(500));
        // Port 9 (discard) on localhost is not expected to be serving HTTP
        let urls = vec![
            Url::parse("http://127.0.0.1:9/a").unwrap(),
            Url::parse("http://127.0.0.1:9/b").unwrap(),
        ];

        let results = engine.fetch_links(urls.clone()).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source, urls[0]);
        assert_eq!(results[1].source, urls[1]);
        assert!(results.iter().all(|page| page.links.is_empty()));
    }
}
