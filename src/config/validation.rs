use crate::config::types::{Config, CrawlerConfig, DerivedColumnConfig, OutputConfig, ReportConfig};
use crate::report::schema::builtin_headers;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_WORKERS: u32 = 64;
const MAX_PACING_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_report_config(&config.report)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 || config.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and {}, got {}",
            MAX_REQUEST_TIMEOUT_SECS, config.request_timeout_secs
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.pacing_delay_ms > MAX_PACING_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "pacing-delay-ms must be <= {}ms, got {}ms",
            MAX_PACING_DELAY_MS, config.pacing_delay_ms
        )));
    }

    if let Some(agent) = &config.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates report layout configuration
fn validate_report_config(config: &ReportConfig) -> Result<(), ConfigError> {
    if config.primary_column.trim().is_empty() {
        return Err(ConfigError::Validation(
            "primary-column cannot be empty".to_string(),
        ));
    }

    let fallback = &config.fallback_file_type;
    if fallback.is_empty()
        || !fallback
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(ConfigError::Validation(format!(
            "fallback-file-type must be lowercase alphanumeric, got '{}'",
            fallback
        )));
    }

    let mut seen_columns = HashSet::new();
    for column in &config.columns {
        if !seen_columns.insert(*column) {
            return Err(ConfigError::Validation(format!(
                "Column {:?} listed more than once",
                column
            )));
        }
    }

    let builtin = builtin_headers(&config.primary_column);
    let mut seen_names = HashSet::new();
    for derived in &config.derived {
        let name = derived.name();
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Derived column name cannot be empty".to_string(),
            ));
        }
        if builtin.contains(&name) {
            return Err(ConfigError::Validation(format!(
                "Derived column '{}' collides with a built-in column",
                name
            )));
        }
        if !seen_names.insert(name) {
            return Err(ConfigError::Validation(format!(
                "Derived column '{}' is defined more than once",
                name
            )));
        }
        validate_derived_column(derived)?;
    }

    Ok(())
}

fn validate_derived_column(column: &DerivedColumnConfig) -> Result<(), ConfigError> {
    match column {
        DerivedColumnConfig::HostRewrite { name, from, .. } => {
            if from.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Derived column '{}': 'from' cannot be empty",
                    name
                )));
            }
        }
        DerivedColumnConfig::EditLink {
            name,
            from,
            host,
            edit_base,
            ..
        } => {
            if from.is_empty() || host.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Derived column '{}': 'from' and 'host' cannot be empty",
                    name
                )));
            }
            Url::parse(edit_base).map_err(|e| {
                ConfigError::InvalidUrl(format!(
                    "Derived column '{}': invalid edit-base '{}': {}",
                    name, edit_base, e
                ))
            })?;
        }
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.base_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "base-name cannot be empty".to_string(),
        ));
    }

    if config.base_name.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "base-name must not contain path separators, got '{}'",
            config.base_name
        )));
    }

    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "directory cannot be empty".to_string(),
        ));
    }

    if matches!(&config.journal_path, Some(p) if p.is_empty()) {
        return Err(ConfigError::Validation(
            "journal-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}
