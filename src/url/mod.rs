//! URL handling module for Sitemap-Weaver
//!
//! This module provides URL cleaning and the site-membership test based on
//! registrable domains.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{filter_to_site, is_part_of_site, registrable_domain};
pub use normalize::{clean, clean_all};

use url::Url;

/// Cleans a batch of discovered links and keeps the ones on the site
///
/// This is the per-source step the orchestrator applies to every fetch result:
/// fragments and queries are stripped first so that `/about#team` and `/about`
/// become the same page, then off-site links are dropped.
///
/// # Arguments
///
/// * `links` - Absolute links discovered on one page
/// * `site_domain` - The crawl's registrable domain, if it could be computed
///
/// # Returns
///
/// The cleaned on-site links, in discovery order. When `site_domain` is
/// `None` every link is rejected.
pub fn clean_and_filter(mut links: Vec<Url>, site_domain: Option<&str>) -> Vec<Url> {
    let Some(site_domain) = site_domain else {
        return Vec::new();
    };

    clean_all(&mut links);
    filter_to_site(links, site_domain)
}
