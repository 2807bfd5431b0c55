//! Output module for rendering finished sitemaps
//!
//! This module handles:
//! - Choosing between the indented text listing and nested JSON
//! - Writing the rendering to stdout or a file
//! - Summarizing a crawl as statistics

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};

use crate::config::OutputConfig;
use crate::sitemap::Sitemap;
use crate::WeaverError;
use serde::Deserialize;
use std::io::Write;
use std::path::Path;

/// Rendering of a finished sitemap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One address per line, indented two spaces per depth level
    #[default]
    Text,
    /// Nested JSON: crawl metadata plus the full node tree
    Json,
}

/// Renders a sitemap in the requested format
///
/// # Example
///
/// ```
/// use sitemap_weaver::output::{render, OutputFormat};
/// use sitemap_weaver::Sitemap;
/// use url::Url;
///
/// let mut sitemap = Sitemap::new(1);
/// sitemap.set_root(Url::parse("https://example.com/").unwrap());
/// assert_eq!(render(&sitemap, OutputFormat::Text, false).unwrap(), "https://example.com/\n");
/// ```
pub fn render(
    sitemap: &Sitemap,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(sitemap.to_string()),
        OutputFormat::Json if pretty => serde_json::to_string_pretty(sitemap),
        OutputFormat::Json => serde_json::to_string(sitemap),
    }
}

/// Writes the rendered sitemap to the configured destination
///
/// JSON written to stdout or a file always ends with a newline.
pub fn write_output(sitemap: &Sitemap, config: &OutputConfig) -> Result<(), WeaverError> {
    let mut rendered = render(sitemap, config.format, config.pretty)?;
    if !rendered.ends_with('\n') && !rendered.is_empty() {
        rendered.push('\n');
    }

    match &config.path {
        Some(path) => {
            std::fs::write(Path::new(path), rendered)?;
            tracing::info!("Sitemap written to {}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(())
}
