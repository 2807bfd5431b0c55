//! Statistics summarizing a finished crawl

use crate::sitemap::Sitemap;
use std::collections::BTreeSet;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Total number of pages in the sitemap
    pub total_pages: usize,

    /// Page count per depth level, index 0 being the root
    pub pages_by_depth: Vec<usize>,

    /// Distinct hosts seen (subdomains count separately)
    pub unique_hosts: usize,

    /// Registrable domain the crawl was restricted to
    pub registrable_domain: Option<String>,

    /// Requested depth bound
    pub max_depth: usize,

    /// Depth actually reached
    pub achieved_depth: usize,

    /// Wall-clock duration, once the crawl has finished
    pub duration_seconds: Option<f64>,
}

impl CrawlStatistics {
    /// Computes statistics from a sitemap
    pub fn from_sitemap(sitemap: &Sitemap) -> Self {
        let mut pages_by_depth: Vec<usize> = Vec::new();
        let mut hosts = BTreeSet::new();

        for (depth, node) in sitemap.walk() {
            if pages_by_depth.len() <= depth {
                pages_by_depth.resize(depth + 1, 0);
            }
            pages_by_depth[depth] += 1;

            if let Some(host) = node.address().host_str() {
                hosts.insert(host.to_string());
            }
        }

        let duration_seconds = sitemap
            .finished_at()
            .map(|finished| (finished - sitemap.created_at()).num_milliseconds() as f64 / 1000.0);

        Self {
            total_pages: sitemap.len(),
            pages_by_depth,
            unique_hosts: hosts.len(),
            registrable_domain: sitemap.registrable_domain().map(str::to_owned),
            max_depth: sitemap.max_depth(),
            achieved_depth: sitemap.achieved_depth(),
            duration_seconds,
        }
    }
}

/// Prints statistics to stderr so they never mix with a sitemap on stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Overview:");
    eprintln!(
        "  Site: {}",
        stats.registrable_domain.as_deref().unwrap_or("(unknown)")
    );
    eprintln!("  Total pages discovered: {}", stats.total_pages);
    eprintln!("  Unique hosts: {}", stats.unique_hosts);
    eprintln!(
        "  Depth reached: {} of {}",
        stats.achieved_depth, stats.max_depth
    );
    if let Some(seconds) = stats.duration_seconds {
        eprintln!("  Duration: {:.1}s", seconds);
    }
    eprintln!();

    eprintln!("Pages by Depth:");
    for (depth, count) in stats.pages_by_depth.iter().enumerate() {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        eprintln!("  {}: {} ({:.1}%)", depth, count, percentage);
    }
}
