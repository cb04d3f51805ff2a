//! Output module for writing reports and crawl summaries
//!
//! This module handles:
//! - Rendering the finished record set through a [`ReportSink`] (CSV or HTML)
//! - Choosing a report file name that never overwrites an earlier report
//! - Generating markdown summaries and printing crawl statistics

mod csv_sink;
mod html_sink;
mod markdown;
mod naming;
pub mod stats;
mod traits;

pub use csv_sink::CsvSink;
pub use html_sink::HtmlSink;
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use naming::unique_output_path;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, ReportSink};

use crate::report::RecordSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Csv,
    /// Carries the color hints and hyperlinks
    #[default]
    Html,
}

impl OutputFormat {
    /// File extension of the format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }

    /// Creates the sink that renders this format
    pub fn sink(&self, title: &str) -> Box<dyn ReportSink> {
        match self {
            Self::Csv => Box::new(CsvSink::new()),
            Self::Html => Box::new(HtmlSink::new(title)),
        }
    }
}

/// Writes a report under a fresh file name
///
/// # Arguments
///
/// * `report` - The finished record set
/// * `format` - Output format
/// * `dir` - Output directory (created if missing)
/// * `base_name` - File name without extension
/// * `title` - Document title for formats that have one
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_report(
    report: &RecordSet,
    format: OutputFormat,
    dir: &Path,
    base_name: &str,
    title: &str,
) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = unique_output_path(dir, base_name, format.extension());
    format.sink(title).write(report, &path)?;
    tracing::info!("Wrote {} rows to {}", report.len(), path.display());
    Ok(path)
}
