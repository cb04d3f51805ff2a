use crate::url::QueryMode;
use crate::UrlError;
use url::{Position, Url};

/// Normalizes a raw `href` found on `page_url` into a crawlable URL
///
/// # Normalization Steps
///
/// 1. Drop everything from the first `#` of the raw href
/// 2. Resolve the remainder against the page URL (dot segments are removed)
/// 3. Reject anything that is not an absolute HTTP(S) URL with a host
/// 4. Serialize as `scheme://host/path`, appending `?query` only when the
///    query mode preserves it and the query is non-empty
///
/// Malformed or non-HTTP links yield `None`; callers drop them silently.
///
/// # Examples
///
/// ```
/// use pagemap::url::{normalize_link, QueryMode};
/// use url::Url;
///
/// let page = Url::parse("http://example.com/docs/index.html").unwrap();
/// let link = normalize_link("../about?x=1#team", &page, QueryMode::Drop);
/// assert_eq!(link.as_deref(), Some("http://example.com/about"));
/// ```
pub fn normalize_link(href: &str, page_url: &Url, mode: QueryMode) -> Option<String> {
    let joined = page_url.join(strip_fragment(href)).ok()?;
    serialize(&joined, mode).ok()
}

/// Normalizes an absolute URL string (such as the seed) with the same rules
///
/// # Returns
///
/// * `Ok(String)` - The normalized URL
/// * `Err(UrlError)` - The URL could not be parsed, is not HTTP(S) or has no host
///
/// # Examples
///
/// ```
/// use pagemap::url::{normalize_url, QueryMode};
///
/// let url = normalize_url("HTTP://Example.com#top", QueryMode::Drop).unwrap();
/// assert_eq!(url, "http://example.com/");
/// ```
pub fn normalize_url(url_str: &str, mode: QueryMode) -> Result<String, UrlError> {
    let url = Url::parse(strip_fragment(url_str))
        .map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;
    serialize(&url, mode)
}

fn strip_fragment(href: &str) -> &str {
    href.split('#').next().unwrap_or_default()
}

fn serialize(url: &Url, mode: QueryMode) -> Result<String, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    let keep_query = mode == QueryMode::Preserve && url.query().is_some_and(|q| !q.is_empty());
    let end = if keep_query {
        Position::AfterQuery
    } else {
        Position::AfterPath
    };

    Ok(url[..end].to_string())
}
