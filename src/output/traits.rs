//! Report sink trait and output error types

use crate::report::RecordSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Renders a finished report to a file
///
/// Sinks receive the report once, after sorting and derived columns are
/// done. They decide how color hints and hyperlinks are expressed; formats
/// that cannot express them (CSV) drop them.
pub trait ReportSink {
    /// Writes `report` to `path`, replacing any existing file
    fn write(&mut self, report: &RecordSet, path: &Path) -> OutputResult<()>;
}
