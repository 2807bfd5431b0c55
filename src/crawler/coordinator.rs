//! Crawler coordinator - depth-bounded crawl orchestration
//!
//! The crawl advances one depth level at a time:
//! 1. Collect the frontier: every node exactly `depth` hops from the root
//! 2. Fetch the whole frontier concurrently
//! 3. Clean and site-filter each page's links
//! 4. Merge the surviving edges into the sitemap
//! 5. Stop at the depth bound, or as soon as a level adds nothing new
//!
//! Fetching and merging never overlap. The sitemap is only touched by the
//! merge step, after every fetch of the level has completed, so it needs no
//! locking.

use crate::crawler::fetcher::{LinkFetcher, PageLinks};
use crate::sitemap::Sitemap;
use crate::url::{clean, clean_and_filter};
use url::Url;

/// Drives a crawl over any `LinkFetcher`
pub struct Coordinator<F> {
    fetcher: F,
    max_depth: usize,
}

impl<F: LinkFetcher> Coordinator<F> {
    /// Creates a coordinator that crawls at most `max_depth` hops from the seed
    pub fn new(fetcher: F, max_depth: usize) -> Self {
        Self { fetcher, max_depth }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawls the site rooted at `seed` and returns the finished sitemap
    ///
    /// A seed that does not parse as an absolute URL yields a rootless sitemap.
    /// The seed's query and fragment are stripped, like every discovered link.
    pub async fn run(&self, seed: &str) -> Sitemap {
        let mut sitemap = Sitemap::new(self.max_depth);

        let mut seed_url = match Url::parse(seed) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("The seed URL ({}) didn't parse: {}", seed, e);
                sitemap.finish(0);
                return sitemap;
            }
        };
        clean(&mut seed_url);

        tracing::info!(
            "Starting crawl of {} (max depth {})",
            seed_url,
            self.max_depth
        );
        sitemap.set_root(seed_url);

        let achieved_depth = self.fill(&mut sitemap).await;
        sitemap.finish(achieved_depth);

        tracing::info!(
            "Crawl finished: {} pages, depth {} of {}",
            sitemap.len(),
            achieved_depth,
            self.max_depth
        );
        sitemap
    }

    /// Runs the level loop and returns the depth reached
    async fn fill(&self, sitemap: &mut Sitemap) -> usize {
        let mut depth = 0;

        while depth < self.max_depth {
            let frontier: Vec<Url> = sitemap
                .nodes_at_depth(depth)
                .into_iter()
                .map(|node| node.address().clone())
                .collect();
            tracing::debug!("Fetching {} pages at depth {}", frontier.len(), depth);

            let results = self.fetcher.fetch_links(frontier).await;
            let fetched = results.len();
            let added = merge_level(sitemap, results);

            tracing::info!(
                "Depth {}: fetched {} pages, discovered {} new pages",
                depth,
                fetched,
                added
            );

            if added == 0 {
                tracing::info!("No new pages below depth {}, stopping early", depth);
                break;
            }
            depth += 1;
        }

        depth
    }
}

/// Merges one level's fetch results into the sitemap
///
/// Links are cleaned and filtered to the sitemap's registrable domain before
/// insertion. Structural insertion errors are logged and the edge skipped.
///
/// # Returns
///
/// The number of new pages added to the sitemap.
pub fn merge_level(sitemap: &mut Sitemap, results: Vec<PageLinks>) -> usize {
    let site_domain = sitemap.registrable_domain().map(str::to_owned);
    let mut added = 0;

    for page in results {
        let links = clean_and_filter(page.links, site_domain.as_deref());

        for link in links {
            match sitemap.add_edge(&page.source, link.as_str()) {
                Ok(outcome) if outcome.is_added() => added += 1,
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(
                        "Error adding {} from {} to the sitemap: {}",
                        link,
                        page.source,
                        e
                    );
                }
            }
        }
    }

    added
}
