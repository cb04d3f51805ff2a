//! HTML parser for extracting the page title and outgoing links
//!
//! The parser stays deliberately dumb: it returns raw `href` values in
//! document order and leaves resolution, filtering and dedup to the crawl
//! loop, which knows the page URL and the crawl scope.

use crate::report::PLACEHOLDER;
use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// The trimmed `<title>` text, or `-` when absent or blank
    pub title: String,

    /// Raw `href` values of every `<a href>` in document order, duplicates kept
    pub links: Vec<String>,
}

/// Parses HTML content and extracts the title and anchor hrefs
///
/// Parsing never fails: malformed markup is repaired by the HTML5 parser and
/// non-HTML bodies (a PDF served with status 200, for instance) simply yield
/// the placeholder title and no links.
///
/// # Arguments
///
/// * `html` - The response body
///
/// # Returns
///
/// The parsed title and raw link targets
///
/// # Example
///
/// ```
/// use pagemap::crawler::parse_html;
///
/// let html = r#"<html><head><title> Home </title></head><body><a href="/a">A</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, "Home");
/// assert_eq!(parsed.links, vec!["/a".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document).unwrap_or_else(|| PLACEHOLDER.to_string()),
        links: extract_links(&document),
    }
}

/// Extracts the first `<title>` text, trimmed
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the raw `href` of every anchor element
fn extract_links(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>Test Page</title></head><body></body></html>"#;
        assert_eq!(parse_html(html).title, "Test Page");
    }

    #[test]
    fn test_extract_title_with_whitespace() {
        let html = "<html><head><title>\n  Test Page  \n</title></head><body></body></html>";
        assert_eq!(parse_html(html).title, "Test Page");
    }

    #[test]
    fn test_no_title_uses_placeholder() {
        let html = r#"<html><head></head><body></body></html>"#;
        assert_eq!(parse_html(html).title, "-");
    }

    #[test]
    fn test_blank_title_uses_placeholder() {
        let html = r#"<html><head><title>   </title></head><body></body></html>"#;
        assert_eq!(parse_html(html).title, "-");
    }

    #[test]
    fn test_first_title_wins() {
        let html = r#"<html><head><title>One</title><title>Two</title></head></html>"#;
        assert_eq!(parse_html(html).title, "One");
    }

    #[test]
    fn test_links_in_document_order_with_duplicates() {
        let html = r##"
            <html>
            <body>
                <a href="/b">B</a>
                <a href="/a">A</a>
                <a href="/b">B again</a>
                <a href="/a#frag">A fragment</a>
            </body>
            </html>
        "##;
        let parsed = parse_html(html);
        assert_eq!(parsed.links, vec!["/b", "/a", "/b", "/a#frag"]);
    }

    #[test]
    fn test_raw_hrefs_are_not_filtered() {
        let html = r#"<a href="mailto:test@example.com">Mail</a><a href="javascript:void(0)">JS</a>"#;
        let parsed = parse_html(html);
        assert_eq!(parsed.links.len(), 2);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<a name="top">Top</a><a href="">Empty</a>"#;
        let parsed = parse_html(html);
        assert_eq!(parsed.links, vec![""]);
    }

    #[test]
    fn test_non_anchor_links_ignored() {
        let html = r#"<html><head><link rel="canonical" href="/canonical"></head>
            <body><img src="/img.png"><script src="/app.js"></script></body></html>"#;
        assert!(parse_html(html).links.is_empty());
    }

    #[test]
    fn test_non_html_body() {
        let parsed = parse_html("%PDF-1.4\n%\u{00e2}\u{00e3}\u{00cf}\u{00d3}\n1 0 obj");
        assert_eq!(parsed.title, "-");
        assert!(parsed.links.is_empty());
    }
}
