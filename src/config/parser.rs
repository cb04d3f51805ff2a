use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use pagemap::config::load_config;
///
/// let config = load_config(Path::new("pagemap.toml")).unwrap();
/// println!("Workers: {}", config.crawler.workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is logged at startup and stored with each journaled run so a
/// recovered report can be traced back to the settings that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DerivedColumnConfig, OptionalColumnConfig};
    use crate::output::OutputFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
request-timeout-secs = 10
pacing-delay-ms = 100
workers = 4
preserve-query = true
user-agent = "TestCrawler/1.0"

[report]
primary-column = "@example.edu URL"
fallback-file-type = "pcf"
columns = ["qaed", "looked-at", "redirect-check"]

[[report.derived]]
kind = "host-rewrite"
name = "Modern URL"
from = "https://www.example.edu/"
to = "https://modern.example.edu/"

[[report.derived]]
kind = "edit-link"
name = "Edit URL"
from = "https://www.example.edu/"
to = "https://modern.example.edu/"
host = "https://modern.example.edu"
edit-base = "https://cms.example.com/edit/"
index-suffix = "%2Findex.pcf"
exclude-suffixes = [".pdf"]
exclude-urls = ["https://modern.example.edu/financial"]

[output]
directory = "reports"
base-name = "sitemap_output"
format = "html"
journal-path = "crawl.db"
summary-path = "summary.md"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.request_timeout_secs, 10);
        assert_eq!(config.crawler.pacing_delay_ms, 100);
        assert_eq!(config.crawler.workers, 4);
        assert!(config.crawler.preserve_query);
        assert_eq!(config.crawler.user_agent.as_deref(), Some("TestCrawler/1.0"));
        assert_eq!(config.report.primary_column, "@example.edu URL");
        assert_eq!(
            config.report.columns,
            vec![
                OptionalColumnConfig::Qaed,
                OptionalColumnConfig::LookedAt,
                OptionalColumnConfig::RedirectCheck
            ]
        );
        assert_eq!(config.report.derived.len(), 2);
        assert!(matches!(
            &config.report.derived[1],
            DerivedColumnConfig::EditLink { exclude_suffixes, .. } if exclude_suffixes == &vec![".pdf".to_string()]
        ));
        assert_eq!(config.output.format, OutputFormat::Html);
        assert_eq!(config.output.journal_path.as_deref(), Some("crawl.db"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.request_timeout_secs, 5);
        assert_eq!(config.crawler.pacing_delay_ms, 50);
        assert_eq!(config.crawler.workers, 1);
        assert!(!config.crawler.preserve_query);
        assert_eq!(config.report.primary_column, "URL");
        assert_eq!(config.report.fallback_file_type, "pcf");
        assert!(config.report.columns.is_empty());
        assert!(config.report.derived.is_empty());
        assert_eq!(config.output.base_name, "basic_sitemap_output");
        assert_eq!(config.output.format, OutputFormat::Html);
        assert!(config.output.journal_path.is_none());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/pagemap.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_derived_kind_rejected() {
        let result = parse_config(
            r#"
[[report.derived]]
kind = "reverse"
name = "Backwards"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nworkers = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config("[output]\nformat = \"csv\"\n");
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }

    #[test]
    fn test_demo_configs_are_valid() {
        let basic = parse_config(include_str!("../../demos/basic.toml")).unwrap();
        assert_eq!(basic.report.primary_column, "URL");

        let audit = parse_config(include_str!("../../demos/cms-audit.toml")).unwrap();
        assert_eq!(audit.report.columns.len(), 3);
        assert_eq!(audit.report.derived.len(), 2);
        assert_eq!(audit.report.derived[1].name(), "MC Edit Page URL");
        assert_eq!(audit.output.format, OutputFormat::Html);

        let inventory = parse_config(include_str!("../../demos/page-inventory.toml")).unwrap();
        assert!(inventory.crawler.preserve_query);
        assert_eq!(inventory.report.fallback_file_type, "html");
    }
}
