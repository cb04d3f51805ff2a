use url::Url;

/// File type reported for URLs whose path carries no suffix
pub const DEFAULT_FALLBACK_FILE_TYPE: &str = "pcf";

/// Classifies a URL by the suffix of its last path segment
///
/// The suffix is the text after the final `.` of the last non-empty path
/// segment, lowercased. Names starting with their only dot (`.htaccess`) or
/// ending in a dot have no suffix. A URL without a suffix gets `fallback`.
///
/// # Examples
///
/// ```
/// use pagemap::url::file_type;
///
/// assert_eq!(file_type("https://example.com/files/report.PDF", "pcf"), "pdf");
/// assert_eq!(file_type("https://example.com/about/", "pcf"), "pcf");
/// assert_eq!(file_type("https://example.com/about", "html"), "html");
/// ```
pub fn file_type(url: &str, fallback: &str) -> String {
    let suffix = match Url::parse(url) {
        Ok(parsed) => path_suffix(parsed.path()),
        Err(_) => path_suffix(url),
    };

    suffix.unwrap_or_else(|| fallback.to_string())
}

fn path_suffix(path: &str) -> Option<String> {
    let name = path.trim_end_matches('/').rsplit('/').next()?;
    let dot = name.rfind('.')?;

    if dot == 0 || dot + 1 == name.len() {
        return None;
    }

    Some(name[dot + 1..].to_lowercase())
}
