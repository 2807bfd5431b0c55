//! Crawler module for page fetching and sitemap construction
//!
//! This module contains the core crawling logic, including:
//! - HTML parsing and anchor link extraction
//! - Concurrent HTTP fetching of a whole depth level
//! - Level-by-level crawl coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{merge_level, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchEngine, FetchResult, LinkFetcher, PageLinks};
pub use parser::{extract_links, links_in};

use crate::config::Config;
use crate::sitemap::Sitemap;
use crate::WeaverError;
use std::time::Duration;

/// Runs a complete crawl described by a configuration
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and fetch engine
/// 2. Root the sitemap at the configured seed
/// 3. Fetch and merge one depth level at a time
/// 4. Return the finished sitemap
///
/// Fetch failures only shrink the result; the sole error is failing to build
/// the HTTP client.
///
/// # Example
///
/// ```no_run
/// use sitemap_weaver::config::Config;
/// use sitemap_weaver::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::for_seed("https://example.com/", 2);
/// let sitemap = crawl(&config).await?;
/// print!("{}", sitemap);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<Sitemap, WeaverError> {
    let engine = FetchEngine::from_config(config)?;
    let coordinator = Coordinator::new(engine, config.crawler.max_depth);
    Ok(coordinator.run(&config.crawler.seed).await)
}

/// Crawls `seed` to `max_depth` hops with default client settings
///
/// Timeouts shorter than a millisecond are raised to one millisecond.
pub async fn build_sitemap(
    seed: &str,
    max_depth: usize,
    timeout: Duration,
) -> Result<Sitemap, WeaverError> {
    let mut config = Config::for_seed(seed, max_depth);
    config.crawler.fetch_timeout_ms = timeout_millis(timeout);
    crawl(&config).await
}

fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis())
        .unwrap_or(u64::MAX)
        .max(1)
}
