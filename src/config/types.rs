use crate::output::OutputFormat;
use serde::Deserialize;

/// Main configuration structure for pagemap
///
/// Every section has defaults, so an empty file (or no file) yields the
/// basic sitemap layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Timeout applied to every request (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Minimum time between two requests across all workers (milliseconds)
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,

    /// Number of concurrent fetch workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Keep the query string of discovered links
    #[serde(default)]
    pub preserve_query: bool,

    /// User-Agent header sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            pacing_delay_ms: default_pacing_delay_ms(),
            workers: default_workers(),
            preserve_query: false,
            user_agent: None,
        }
    }
}

/// Report layout configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReportConfig {
    /// Header of the primary URL column
    #[serde(default = "default_primary_column")]
    pub primary_column: String,

    /// File type used when a URL path has no suffix
    #[serde(default = "default_fallback_file_type")]
    pub fallback_file_type: String,

    /// Optional review columns, rendered in their fixed order
    #[serde(default)]
    pub columns: Vec<OptionalColumnConfig>,

    /// Computed URL columns appended after `Notes`
    #[serde(default)]
    pub derived: Vec<DerivedColumnConfig>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            primary_column: default_primary_column(),
            fallback_file_type: default_fallback_file_type(),
            columns: Vec::new(),
            derived: Vec::new(),
        }
    }
}

/// Optional review column names as written in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionalColumnConfig {
    Qaed,
    LookedAt,
    RedirectCheck,
}

/// A computed column definition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DerivedColumnConfig {
    /// Replaces `from` with `to` anywhere in the page URL
    #[serde(rename_all = "kebab-case")]
    HostRewrite { name: String, from: String, to: String },

    /// Builds a CMS edit link from the rewritten page URL
    #[serde(rename_all = "kebab-case")]
    EditLink {
        name: String,
        from: String,
        to: String,
        /// Origin stripped from the rewritten URL to obtain the page path
        host: String,
        /// Prefix of every edit link
        edit_base: String,
        /// Appended after the encoded path
        #[serde(default)]
        index_suffix: String,
        /// Rewritten URLs ending with any of these get a placeholder
        #[serde(default)]
        exclude_suffixes: Vec<String>,
        /// Rewritten URLs equal to any of these get a placeholder
        #[serde(default)]
        exclude_urls: Vec<String>,
    },
}

impl DerivedColumnConfig {
    /// Returns the column header
    pub fn name(&self) -> &str {
        match self {
            Self::HostRewrite { name, .. } | Self::EditLink { name, .. } => name,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory the report is written to
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Report file name without extension
    #[serde(default = "default_base_name")]
    pub base_name: String,

    /// Report format
    #[serde(default)]
    pub format: OutputFormat,

    /// Path of the SQLite record journal (disabled when absent)
    #[serde(default)]
    pub journal_path: Option<String>,

    /// Path of the markdown crawl summary (disabled when absent)
    #[serde(default)]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            base_name: default_base_name(),
            format: OutputFormat::default(),
            journal_path: None,
            summary_path: None,
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_pacing_delay_ms() -> u64 {
    50
}

fn default_workers() -> u32 {
    1
}

fn default_primary_column() -> String {
    "URL".to_string()
}

fn default_fallback_file_type() -> String {
    crate::url::DEFAULT_FALLBACK_FILE_TYPE.to_string()
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_base_name() -> String {
    "basic_sitemap_output".to_string()
}
