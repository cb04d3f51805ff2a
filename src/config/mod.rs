//! Configuration module for pagemap
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: [`Config::default`] describes the basic
//! sitemap report.
//!
//! # Example
//!
//! ```no_run
//! use pagemap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pagemap.toml")).unwrap();
//! println!("Primary column: {}", config.report.primary_column);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DerivedColumnConfig, OptionalColumnConfig, OutputConfig, ReportConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
