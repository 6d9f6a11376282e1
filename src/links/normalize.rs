use url::Url;

/// Resolves raw hrefs against a site's base URL
///
/// # Normalization Rules
///
/// | Link | Result |
/// |------|--------|
/// | `http://...`, `https://...` | Kept unchanged |
/// | `/path` | `base_url` + `/path` (no separator is inserted) |
/// | anything else | Discarded (`rel/path`, `javascript:`, `mailto:`, `#frag`, empty) |
///
/// Order is preserved and duplicates are kept. `base_url` must not end with a
/// slash, or root-relative links come out with a doubled slash.
///
/// # Example
///
/// ```
/// use news_cluster_crawler::links::normalize_links;
///
/// let links = vec!["/a".to_string(), "javascript:void(0)".to_string()];
/// assert_eq!(
///     normalize_links("https://example.com", &links),
///     vec!["https://example.com/a"]
/// );
/// ```
pub fn normalize_links(base_url: &str, links: &[String]) -> Vec<String> {
    links
        .iter()
        .filter_map(|link| normalize_link(base_url, link))
        .collect()
}

fn normalize_link(base_url: &str, link: &str) -> Option<String> {
    if link.starts_with("http://") || link.starts_with("https://") {
        Some(link.to_string())
    } else if link.starts_with('/') {
        Some(format!("{}{}", base_url, link))
    } else {
        tracing::debug!("Discarding unusable link: {:?}", link);
        None
    }
}

/// Returns the origin of a URL (`scheme://host[:port]`) without a trailing slash
///
/// # Returns
///
/// * `Some(String)` - The serialized origin
/// * `None` - The URL has an opaque origin (e.g. `data:` or `file:`)
pub fn site_origin(url: &Url) -> Option<String> {
    let origin = url.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}
