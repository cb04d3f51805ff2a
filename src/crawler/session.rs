//! Shared crawl state
//!
//! One [`CrawlSession`] holds everything that changes while a crawl runs:
//! the frontier, the visited set, accumulated records and counters. Workers
//! lock it briefly to take an entry and again to hand results back; network
//! I/O never happens under the lock.

use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::output::CrawlStatistics;
use crate::report::PageRecord;
use crate::url::{normalize_link, QueryMode, ScopeFilter};
use url::Url;

/// What a worker should do next
#[derive(Debug, PartialEq, Eq)]
pub enum Next {
    /// Fetch this entry; it is already marked visited
    Fetch(FrontierEntry),
    /// Nothing queued, but other fetches may still add links
    Idle,
    /// Nothing queued and nothing in flight: the crawl is over
    Done,
}

/// Mutable state of one crawl run
#[derive(Debug)]
pub struct CrawlSession {
    frontier: Frontier,
    scope: ScopeFilter,
    query_mode: QueryMode,
    fallback_file_type: String,
    records: Vec<PageRecord>,
    in_flight: usize,
    stats: CrawlStatistics,
}

impl CrawlSession {
    /// Creates a session whose frontier holds only the seed
    ///
    /// `seed` must already be normalized; the scope prefix is the seed itself.
    pub fn new(seed: &str, query_mode: QueryMode, fallback_file_type: impl Into<String>) -> Self {
        Self {
            frontier: Frontier::with_seed(seed),
            scope: ScopeFilter::new(seed),
            query_mode,
            fallback_file_type: fallback_file_type.into(),
            records: Vec::new(),
            in_flight: 0,
            stats: CrawlStatistics::new(seed),
        }
    }

    /// Takes the next entry to fetch
    ///
    /// Entries that are already visited or out of scope are discarded here.
    /// A returned entry is marked visited and counted as in flight until
    /// [`CrawlSession::finish_entry`] is called.
    pub fn next_entry(&mut self) -> Next {
        while let Some(entry) = self.frontier.dequeue() {
            if self.frontier.is_visited(&entry.url) || !self.scope.in_scope(&entry.url) {
                tracing::trace!("Discarding {}", entry.url);
                continue;
            }

            self.frontier.mark_visited(&entry.url);
            self.in_flight += 1;
            self.stats.visited += 1;
            return Next::Fetch(entry);
        }

        if self.in_flight == 0 {
            Next::Done
        } else {
            Next::Idle
        }
    }

    /// Releases an entry returned by [`CrawlSession::next_entry`]
    pub fn finish_entry(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Stores the record for a fetched page and returns a copy of it
    pub fn record_page(&mut self, entry: &FrontierEntry, title: String) -> PageRecord {
        let record = PageRecord::new(&entry.url, &entry.parent, title, &self.fallback_file_type);
        self.stats.record_page(&record.file_type);
        self.records.push(record.clone());
        record
    }

    /// Normalizes raw hrefs found on `page_url` and enqueues the new ones
    ///
    /// # Returns
    ///
    /// The number of URLs added to the frontier
    pub fn enqueue_links(&mut self, links: &[String], page_url: &Url) -> usize {
        let parent = page_url.as_str();
        let mut added = 0;

        for href in links {
            let Some(url) = normalize_link(href, page_url, self.query_mode) else {
                tracing::trace!("Dropping unusable link {:?} on {}", href, parent);
                continue;
            };

            if !self.scope.in_scope(&url) {
                self.stats.links_out_of_scope += 1;
                continue;
            }

            if self.frontier.enqueue(url, parent) {
                added += 1;
            }
        }

        self.stats.links_enqueued += added as u64;
        added
    }

    pub fn record_skip(&mut self, status_code: u16) {
        self.stats.record_skip(status_code);
    }

    pub fn record_error(&mut self, kind: impl Into<String>) {
        self.stats.record_error(kind);
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn visited_count(&self) -> usize {
        self.frontier.visited_count()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    /// Consumes the session, returning records and final statistics
    pub fn finish(mut self, interrupted: bool) -> (Vec<PageRecord>, CrawlStatistics) {
        self.stats.finish(interrupted);
        (self.records, self.stats)
    }
}
