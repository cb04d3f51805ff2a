use crate::url::file_type;
use std::fmt;

/// Placeholder written into cells that have no value
pub const PLACEHOLDER: &str = "-";

/// Metadata of one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Normalized URL that was requested
    pub url: String,

    /// URL of the page that linked here (`ROOT` for the seed)
    pub parent: String,

    /// Trimmed `<title>` text or `-`
    pub title: String,

    /// Lowercase path suffix or the fallback type
    pub file_type: String,

    /// Always `-`; kept as a column for manual review
    pub redirects_to: String,

    /// Whether the URL looks like a legacy redirect candidate
    pub redirect_check: RedirectCheck,

    /// Always `-`; kept as a column for manual review
    pub notes: String,
}

impl PageRecord {
    /// Builds the record for a fetched page
    ///
    /// # Arguments
    ///
    /// * `url` - The normalized, requested URL
    /// * `parent` - The referring page URL
    /// * `title` - The parsed title
    /// * `fallback_file_type` - File type used when the path has no suffix
    pub fn new(
        url: impl Into<String>,
        parent: impl Into<String>,
        title: impl Into<String>,
        fallback_file_type: &str,
    ) -> Self {
        let url = url.into();
        let file_type = file_type(&url, fallback_file_type);
        let redirect_check = RedirectCheck::for_url(&url);

        Self {
            url,
            parent: parent.into(),
            title: title.into(),
            file_type,
            redirects_to: PLACEHOLDER.to_string(),
            redirect_check,
            notes: PLACEHOLDER.to_string(),
        }
    }
}

/// Value of the `Redirect?` review column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectCheck {
    /// The URL contains `index.php` and should be checked by hand
    Verify,
    /// Nothing to check
    NotApplicable,
}

impl RedirectCheck {
    /// Classifies a URL; the match is case-insensitive
    pub fn for_url(url: &str) -> Self {
        if url.to_lowercase().contains("index.php") {
            Self::Verify
        } else {
            Self::NotApplicable
        }
    }

    /// Cell text for the report
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verify => "Verify",
            Self::NotApplicable => "n/a",
        }
    }

    /// Parses the cell text back, as stored in the journal
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Verify" => Some(Self::Verify),
            "n/a" => Some(Self::NotApplicable),
            _ => None,
        }
    }
}

impl fmt::Display for RedirectCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
