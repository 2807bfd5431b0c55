//! Anchor link extraction
//!
//! The document is parsed with `scraper` (html5ever), which recovers from
//! malformed markup on its own, so a page never fails to parse outright. The
//! extractor selects `a[href]` elements in document order and yields their
//! targets resolved against the page's address.
//!
//! **Skipped:**
//! - anchors without `href`, or with an empty one
//! - hrefs that do not resolve to a URL (logged at debug level)
//! - non-HTTP(S) targets such as `mailto:`, `javascript:` or `tel:`

use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

static ANCHOR_SELECTOR: OnceLock<Option<Selector>> = OnceLock::new();

fn anchor_selector() -> Option<&'static Selector> {
    ANCHOR_SELECTOR
        .get_or_init(|| Selector::parse("a[href]").ok())
        .as_ref()
}

/// Lazily yields the resolved targets of every anchor in `document`
///
/// A bad href is dropped without stopping extraction of the anchors after it.
pub fn links_in<'a>(document: &'a Html, page_url: &'a Url) -> impl Iterator<Item = Url> + 'a {
    anchor_selector()
        .into_iter()
        .flat_map(move |selector| document.select(selector))
        .filter_map(|element| element.value().attr("href"))
        .filter_map(move |href| resolve_href(href, page_url))
}

/// Parses an HTML body and collects its anchor targets
///
/// # Example
///
/// ```
/// use sitemap_weaver::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/about">About</a></body></html>"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &page);
/// assert_eq!(links[0].as_str(), "https://example.com/about");
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    links_in(&document, page_url).collect()
}

fn resolve_href(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match page_url.join(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        Ok(url) => {
            tracing::trace!("Skipping non-HTTP link {} on {}", url, page_url);
            None
        }
        Err(e) => {
            tracing::debug!("Wasn't able to parse link '{}' on {}: {}", href, page_url, e);
            None
        }
    }
}
