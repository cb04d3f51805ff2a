//! Storage traits and error types
//!
//! This module defines the trait interface for journal backends and
//! associated error types.

use crate::report::PageRecord;
use crate::storage::{RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Journal contains no runs")]
    NoRuns,

    #[error("Corrupt journal row: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for record journal backends
///
/// A journal keeps the records of each run as they are produced, so a crawl
/// that dies before the report is written can still be turned into one.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `seed` - The normalized seed URL
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, seed: &str, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recently created run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Sets the final status of a run and stamps its finish time
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    /// Marks a run as completed
    fn complete_run(&mut self, run_id: i64) -> StorageResult<()> {
        self.finish_run(run_id, RunStatus::Completed)
    }

    /// Marks a run as interrupted
    fn mark_interrupted(&mut self, run_id: i64) -> StorageResult<()> {
        self.finish_run(run_id, RunStatus::Interrupted)
    }

    // ===== Records =====

    /// Appends one page record to a run
    ///
    /// A URL already journaled for the run is left unchanged.
    fn append_record(&mut self, run_id: i64, record: &PageRecord) -> StorageResult<()>;

    /// Loads all records of a run in insertion order
    fn load_records(&self, run_id: i64) -> StorageResult<Vec<PageRecord>>;

    /// Counts the records of a run
    fn count_records(&self, run_id: i64) -> StorageResult<u64>;
}
