use crate::output::OutputFormat;
use serde::Deserialize;
use std::time::Duration;

/// Default per-request fetch timeout (milliseconds)
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Main configuration structure for Sitemap-Weaver
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration for one seed with every other setting defaulted
    pub fn for_seed(seed: impl Into<String>, max_depth: usize) -> Self {
        Self {
            crawler: CrawlerConfig {
                seed: seed.into(),
                max_depth,
                fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
                max_concurrent_fetches: None,
            },
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute URL the crawl starts from
    pub seed: String,

    /// Maximum number of hops from the seed
    #[serde(rename = "max-depth")]
    pub max_depth: usize,

    /// Per-request timeout covering connect, headers and body (milliseconds)
    #[serde(rename = "fetch-timeout-ms", default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Upper bound on in-flight fetches; unbounded when absent
    #[serde(rename = "max-concurrent-fetches", default)]
    pub max_concurrent_fetches: Option<usize>,
}

impl CrawlerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Rendering of the finished sitemap
    #[serde(default)]
    pub format: OutputFormat,

    /// File to write the rendering to; stdout when absent
    #[serde(default)]
    pub path: Option<String>,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}
