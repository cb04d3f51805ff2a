use crate::url::{normalize_url, QueryMode};
use crate::UrlError;

/// Decides whether a normalized URL belongs to the crawl
///
/// Membership is a plain string-prefix test against the normalized seed URL.
/// This is looser than a host plus path-segment comparison: a seed of
/// `https://example.com/docs` also admits `https://example.com/docs-archive/`.
/// Reports built by earlier tooling depend on this behavior, so it is kept
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFilter {
    prefix: String,
}

impl ScopeFilter {
    /// Creates a filter from an already normalized prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Creates a filter whose prefix is the normalized seed URL
    ///
    /// # Examples
    ///
    /// ```
    /// use pagemap::url::{QueryMode, ScopeFilter};
    ///
    /// let scope = ScopeFilter::from_seed("https://example.com/docs", QueryMode::Drop).unwrap();
    /// assert!(scope.in_scope("https://example.com/docs/intro"));
    /// assert!(scope.in_scope("https://example.com/docs-archive/"));
    /// assert!(!scope.in_scope("https://example.com/blog"));
    /// ```
    pub fn from_seed(seed: &str, mode: QueryMode) -> Result<Self, UrlError> {
        Ok(Self::new(normalize_url(seed, mode)?))
    }

    /// Returns the prefix every in-scope URL starts with
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `url` starts with the seed prefix
    pub fn in_scope(&self, url: &str) -> bool {
        url.starts_with(&self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_site_in_scope() {
        let scope = ScopeFilter::new("http://example.com/");
        assert!(scope.in_scope("http://example.com/"));
        assert!(scope.in_scope("http://example.com/a/b"));
    }

    #[test]
    fn test_other_host_out_of_scope() {
        let scope = ScopeFilter::new("http://example.com/");
        assert!(!scope.in_scope("http://other.com/x"));
        assert!(!scope.in_scope("https://example.com/"));
    }

    #[test]
    fn test_prefix_admits_sibling_paths() {
        let scope = ScopeFilter::new("http://example.com/docs");
        assert!(scope.in_scope("http://example.com/docs/page"));
        assert!(scope.in_scope("http://example.com/docsearch"));
        assert!(!scope.in_scope("http://example.com/doc"));
    }

    #[test]
    fn test_prefix_admits_lookalike_hosts() {
        let scope = ScopeFilter::new("http://example.com");
        assert!(scope.in_scope("http://example.com.evil.net/"));
    }

    #[test]
    fn test_from_seed_normalizes() {
        let scope = ScopeFilter::from_seed("HTTP://Example.com#top", QueryMode::Drop).unwrap();
        assert_eq!(scope.prefix(), "http://example.com/");
    }

    #[test]
    fn test_from_seed_rejects_invalid() {
        assert!(ScopeFilter::from_seed("not a url", QueryMode::Drop).is_err());
        assert!(ScopeFilter::from_seed("mailto:a@b.com", QueryMode::Drop).is_err());
    }
}
