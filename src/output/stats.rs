//! Crawl statistics
//!
//! Counters are collected by the crawl session while it runs and printed at
//! the end of a run; the markdown summary renders the same numbers.

use crate::report::PageRecord;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Normalized seed URL
    pub seed: String,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl stopped (unset while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// URLs taken from the frontier and fetched
    pub visited: u64,

    /// Pages that produced a record
    pub recorded: u64,

    /// In-scope links accepted into the frontier, seed excluded
    pub links_enqueued: u64,

    /// Links dropped because they fall outside the seed prefix
    pub links_out_of_scope: u64,

    /// Non-200 responses by status code
    pub skipped_by_status: BTreeMap<u16, u64>,

    /// Transport failures by class
    pub fetch_errors: BTreeMap<String, u64>,

    /// Records by file type
    pub file_types: BTreeMap<String, u64>,

    /// True when the crawl was stopped before the frontier drained
    pub interrupted: bool,
}

impl CrawlStatistics {
    /// Creates empty statistics for a crawl starting now
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            started_at: Utc::now(),
            finished_at: None,
            visited: 0,
            recorded: 0,
            links_enqueued: 0,
            links_out_of_scope: 0,
            skipped_by_status: BTreeMap::new(),
            fetch_errors: BTreeMap::new(),
            file_types: BTreeMap::new(),
            interrupted: false,
        }
    }

    /// Rebuilds record-level statistics from a list of records
    ///
    /// Used when a report is recovered from the journal: only counts that
    /// can be derived from records are filled in.
    pub fn from_records(seed: impl Into<String>, records: &[PageRecord]) -> Self {
        let mut stats = Self::new(seed);
        for record in records {
            stats.visited += 1;
            stats.record_page(&record.file_type);
        }
        stats
    }

    pub fn record_page(&mut self, file_type: &str) {
        self.recorded += 1;
        *self.file_types.entry(file_type.to_string()).or_insert(0) += 1;
    }

    pub fn record_skip(&mut self, status_code: u16) {
        *self.skipped_by_status.entry(status_code).or_insert(0) += 1;
    }

    pub fn record_error(&mut self, kind: impl Into<String>) {
        *self.fetch_errors.entry(kind.into()).or_insert(0) += 1;
    }

    /// Stamps the finish time
    pub fn finish(&mut self, interrupted: bool) {
        self.finished_at = Some(Utc::now());
        self.interrupted = interrupted;
    }

    /// Wall-clock duration, up to now if the crawl is still running
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }

    pub fn total_skipped(&self) -> u64 {
        self.skipped_by_status.values().sum()
    }

    pub fn total_errors(&self) -> u64 {
        self.fetch_errors.values().sum()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Seed: {}", stats.seed);
    println!("  Pages visited: {}", stats.visited);
    println!("  Pages recorded: {}", stats.recorded);
    println!("  Links enqueued: {}", stats.links_enqueued);
    println!("  Links out of scope: {}", stats.links_out_of_scope);
    println!(
        "  Duration: {:.1}s",
        stats.duration().num_milliseconds() as f64 / 1000.0
    );
    if stats.interrupted {
        println!("  Status: interrupted (partial results)");
    }
    println!();

    if !stats.file_types.is_empty() {
        println!("Pages by File Type:");
        let mut type_counts: Vec<_> = stats.file_types.iter().collect();
        type_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (file_type, count) in type_counts {
            let percentage = if stats.recorded > 0 {
                (*count as f64 / stats.recorded as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", file_type, count, percentage);
        }
        println!();
    }

    if !stats.skipped_by_status.is_empty() {
        println!("Skipped Responses:");
        for (status, count) in &stats.skipped_by_status {
            println!("  HTTP {}: {}", status, count);
        }
        println!();
    }

    if !stats.fetch_errors.is_empty() {
        println!("Fetch Errors:");
        for (kind, count) in &stats.fetch_errors {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    let success_rate = if stats.visited > 0 {
        (stats.recorded as f64 / stats.visited as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages recorded)",
        success_rate, stats.recorded, stats.visited
    );
}
