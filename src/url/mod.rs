//! URL handling module for pagemap
//!
//! This module provides link normalization, the crawl scope filter and
//! file-type classification of page URLs.

mod file_type;
mod normalize;
mod scope;

// Re-export main functions
pub use file_type::{file_type, DEFAULT_FALLBACK_FILE_TYPE};
pub use normalize::{normalize_link, normalize_url};
pub use scope::ScopeFilter;

use serde::Deserialize;

/// How the query string of a discovered link is treated during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryMode {
    /// Keep `scheme://host/path` only
    #[default]
    Drop,
    /// Keep a non-empty `?query` after the path
    Preserve,
}

impl QueryMode {
    /// Maps the `preserve-query` configuration flag to a mode
    pub fn from_flag(preserve_query: bool) -> Self {
        if preserve_query {
            Self::Preserve
        } else {
            Self::Drop
        }
    }
}
