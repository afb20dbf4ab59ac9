use crate::LocationError;
use url::Url;

/// Schemes that are never followed when found in a link
const IGNORED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes a location according to docscrape's rules
///
/// # Normalization Steps
///
/// 1. Parse the location; reject if malformed
/// 2. Require an HTTP or HTTPS scheme and a host
/// 3. Lowercase scheme and host (done by the parser)
/// 4. Empty path becomes `/`
/// 5. Remove fragment
///
/// The path keeps its case and trailing slash: both are significant when other paths
/// are joined onto the location.
///
/// # Examples
///
/// ```
/// use docscrape::url::normalize_location;
///
/// let url = normalize_location("HTTP://Docs.EXAMPLE.com#top").unwrap();
/// assert_eq!(url.as_str(), "http://docs.example.com/");
/// ```
pub fn normalize_location(location: &str) -> Result<Url, LocationError> {
    let mut url = Url::parse(location.trim()).map_err(|e| LocationError::Parse {
        location: location.to_string(),
        message: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(LocationError::InvalidScheme(location.to_string()));
    }

    if url.cannot_be_a_base() || url.host_str().map_or(true, str::is_empty) {
        return Err(LocationError::NotAbsolute(location.to_string()));
    }

    if url.path().is_empty() {
        url.set_path("/");
    }

    url.set_fragment(None);

    Ok(url)
}

/// Resolves a link href found in a page to an absolute location
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links (same page anchors)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if IGNORED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let mut absolute = page_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    absolute.set_fragment(None);
    Some(absolute)
}

/// Joins a path onto a location string with exactly one `/` between them
///
/// Mirrors filesystem-style path joining: the location is treated as plain text, so a
/// location without a trailing slash is extended rather than replaced.
pub fn join_path(location: &str, path: &str) -> String {
    let head = location.trim_end_matches('/');
    let tail = path.trim_start_matches('/');
    format!("{}/{}", head, tail)
}
