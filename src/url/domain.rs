use crate::DomainError;
use url::{Host, Url};

/// Computes the registrable domain (effective TLD + 1) of a URL's host
///
/// The lookup uses the public suffix list, so `blog.example.co.uk` yields
/// `example.co.uk`. A TLD missing from the list falls under the default `*`
/// rule, so `blog.mysite.internal` yields `mysite.internal`. IP-literal hosts
/// have no public suffix and are their own registrable domain.
///
/// # Errors
///
/// * `DomainError::MissingHost` - the URL has no host (`mailto:`, `data:`, ...)
/// * `DomainError::Unregistrable` - the host has an empty label or is itself
///   a public suffix
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_weaver::url::registrable_domain;
///
/// let url = Url::parse("https://blog.example.com/post").unwrap();
/// assert_eq!(registrable_domain(&url).unwrap(), "example.com");
/// ```
pub fn registrable_domain(url: &Url) -> Result<String, DomainError> {
    match url.host() {
        Some(Host::Domain(host)) => registrable_host(host),
        Some(Host::Ipv4(ip)) => Ok(ip.to_string()),
        Some(Host::Ipv6(ip)) => Ok(format!("[{}]", ip)),
        None => Err(DomainError::MissingHost),
    }
}

fn registrable_host(host: &str) -> Result<String, DomainError> {
    let unregistrable = || DomainError::Unregistrable(host.to_string());

    // Empty labels (including a trailing root dot) are not accepted
    if host.is_empty() || host.split('.').any(str::is_empty) {
        return Err(unregistrable());
    }

    let host = host.to_lowercase();
    // A bare suffix (`co.uk`, `localhost`) has no domain part
    let domain = psl::domain(host.as_bytes()).ok_or_else(unregistrable)?;

    std::str::from_utf8(domain.as_bytes())
        .map(str::to_owned)
        .map_err(|_| unregistrable())
}

/// Returns true when `url` shares the given registrable domain
///
/// Hosts whose registrable domain cannot be computed are never part of a site.
pub fn is_part_of_site(url: &Url, site_domain: &str) -> bool {
    match registrable_domain(url) {
        Ok(domain) => domain.eq_ignore_ascii_case(site_domain),
        Err(e) => {
            tracing::debug!("Excluding {} from the site: {}", url, e);
            false
        }
    }
}

/// Keeps only the URLs that belong to the site, preserving their order
pub fn filter_to_site(urls: Vec<Url>, site_domain: &str) -> Vec<Url> {
    urls.into_iter()
        .filter(|url| is_part_of_site(url, site_domain))
        .collect()
}
