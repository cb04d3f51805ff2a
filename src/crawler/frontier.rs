//! Crawl frontier: the FIFO queue of discovered URLs plus the visited set

use std::collections::{HashSet, VecDeque};

/// Parent recorded for the seed URL
pub const ROOT_PARENT: &str = "ROOT";

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized URL to fetch
    pub url: String,

    /// URL of the page the link was found on (`ROOT` for the seed)
    pub parent: String,
}

/// FIFO frontier with dedup
///
/// A URL enters the queue at most once per run: `enqueue` refuses URLs that
/// are already visited or were queued before, so the traversal is breadth
/// first relative to discovery order.
#[derive(Debug, Default)]
pub struct Frontier {
    /// Pending entries, oldest first
    queue: VecDeque<FrontierEntry>,

    /// URLs already taken for fetching
    visited: HashSet<String>,

    /// URLs ever accepted into the queue
    enqueued: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed
    pub fn with_seed(seed: impl Into<String>) -> Self {
        let mut frontier = Self::new();
        frontier.enqueue(seed, ROOT_PARENT);
        frontier
    }

    /// Appends a URL to the back of the queue
    ///
    /// # Returns
    ///
    /// `true` if the URL was queued, `false` if it was already visited or queued
    pub fn enqueue(&mut self, url: impl Into<String>, parent: impl Into<String>) -> bool {
        let url = url.into();
        if self.visited.contains(&url) || self.enqueued.contains(&url) {
            return false;
        }

        self.enqueued.insert(url.clone());
        self.queue.push_back(FrontierEntry {
            url,
            parent: parent.into(),
        });
        true
    }

    /// Pops the oldest entry
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Marks a URL as visited
    ///
    /// # Returns
    ///
    /// `true` if the URL was not visited before
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Returns true if the URL was taken for fetching
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true when no entry is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of visited URLs
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
