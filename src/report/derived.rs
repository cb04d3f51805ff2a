//! Computed report columns
//!
//! A derived column turns a finished [`PageRecord`] into one extra cell.
//! Columns are built from the `[[report.derived]]` configuration entries, so
//! site-specific rewrite rules never live in code.

use crate::config::DerivedColumnConfig;
use crate::report::record::{PageRecord, PLACEHOLDER};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except `A-Z a-z 0-9 - . _ ~` is escaped, slashes included
const PATH_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A column computed from a finished record
pub trait DerivedColumn: Send + Sync {
    /// Column header
    fn name(&self) -> &str;

    /// Cell value for `record`
    fn derive(&self, record: &PageRecord) -> String;
}

/// Substring replacement on the record URL
#[derive(Debug, Clone)]
pub struct HostRewrite {
    name: String,
    from: String,
    to: String,
}

impl HostRewrite {
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    fn rewrite(&self, url: &str) -> String {
        url.replace(&self.from, &self.to)
    }
}

impl DerivedColumn for HostRewrite {
    fn name(&self) -> &str {
        &self.name
    }

    fn derive(&self, record: &PageRecord) -> String {
        self.rewrite(&record.url)
    }
}

/// Link into a CMS editor for the rewritten page
///
/// The URL is first rewritten like [`HostRewrite`]. Excluded URLs get the
/// `-` placeholder. Otherwise `host` is removed and the remaining path, with
/// surrounding slashes trimmed, decoded and then fully percent-encoded once,
/// is placed between `edit_base` and `index_suffix`. A URL equal to `host`
/// yields an empty cell.
#[derive(Debug, Clone)]
pub struct EditLink {
    rewrite: HostRewrite,
    host: String,
    edit_base: String,
    index_suffix: String,
    exclude_suffixes: Vec<String>,
    exclude_urls: Vec<String>,
}

impl EditLink {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        host: impl Into<String>,
        edit_base: impl Into<String>,
        index_suffix: impl Into<String>,
        exclude_suffixes: Vec<String>,
        exclude_urls: Vec<String>,
    ) -> Self {
        Self {
            rewrite: HostRewrite::new(name, from, to),
            host: host.into(),
            edit_base: edit_base.into(),
            index_suffix: index_suffix.into(),
            exclude_suffixes,
            exclude_urls,
        }
    }

    fn is_excluded(&self, url: &str) -> bool {
        self.exclude_suffixes.iter().any(|s| url.ends_with(s.as_str()))
            || self.exclude_urls.iter().any(|u| u == url)
    }
}

impl DerivedColumn for EditLink {
    fn name(&self) -> &str {
        self.rewrite.name()
    }

    fn derive(&self, record: &PageRecord) -> String {
        let rewritten = self.rewrite.rewrite(&record.url);
        if self.is_excluded(&rewritten) {
            return PLACEHOLDER.to_string();
        }

        let path = rewritten.replace(&self.host, "");
        if path.is_empty() {
            return String::new();
        }

        // Record URLs are already percent-encoded by normalization.
        let decoded = percent_decode_str(path.trim_matches('/')).decode_utf8_lossy();
        let encoded = utf8_percent_encode(&decoded, PATH_COMPONENT);
        format!("{}{}{}", self.edit_base, encoded, self.index_suffix)
    }
}

/// Builds the column described by a configuration entry
pub fn from_config(config: &DerivedColumnConfig) -> Box<dyn DerivedColumn> {
    match config {
        DerivedColumnConfig::HostRewrite { name, from, to } => {
            Box::new(HostRewrite::new(name, from, to))
        }
        DerivedColumnConfig::EditLink {
            name,
            from,
            to,
            host,
            edit_base,
            index_suffix,
            exclude_suffixes,
            exclude_urls,
        } => Box::new(EditLink::new(
            name,
            from,
            to,
            host,
            edit_base,
            index_suffix,
            exclude_suffixes.clone(),
            exclude_urls.clone(),
        )),
    }
}
