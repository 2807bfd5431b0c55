use url::Url;

/// Strips the fragment and query from a URL in place
///
/// Scheme, host, port and path are left untouched. Cleaning an already
/// clean URL is a no-op.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_weaver::url::clean;
///
/// let mut url = Url::parse("https://example.com/about?lang=en#team").unwrap();
/// clean(&mut url);
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn clean(url: &mut Url) {
    url.set_fragment(None);
    url.set_query(None);
}

/// Cleans every URL in the slice
pub fn clean_all(urls: &mut [Url]) {
    for url in urls.iter_mut() {
        clean(url);
    }
}
