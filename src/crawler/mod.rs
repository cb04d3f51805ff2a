//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The FIFO frontier and visited set
//! - HTTP fetching with a bounded timeout
//! - HTML parsing (title and anchor extraction)
//! - Global request pacing
//! - Overall crawl coordination across workers

mod coordinator;
mod fetcher;
mod frontier;
mod pacer;
mod parser;
mod session;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{
    build_http_client, fetch_url, FetchResult, NetworkErrorKind, DEFAULT_USER_AGENT, MAX_REDIRECTS,
};
pub use frontier::{Frontier, FrontierEntry, ROOT_PARENT};
pub use pacer::Pacer;
pub use parser::{parse_html, ParsedPage};
pub use session::{CrawlSession, Next};
