//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Spawning the fetch workers and sharing the crawl session between them
//! - Coordinating pacing, fetching, parsing, and link extraction
//! - Journaling records as they are produced
//! - Handling interrupts so partial results are still returned

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::frontier::FrontierEntry;
use crate::crawler::pacer::Pacer;
use crate::crawler::parser::parse_html;
use crate::crawler::session::{CrawlSession, Next};
use crate::output::CrawlStatistics;
use crate::report::PageRecord;
use crate::storage::{SqliteStorage, Storage};
use crate::url::{normalize_url, QueryMode};
use crate::PagemapError;
use indicatif::ProgressBar;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinSet;
use url::Url;

/// Visited pages between two progress log lines
const PROGRESS_LOG_INTERVAL: usize = 10;

/// Result of a crawl run
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Records in the order pages were parsed (not yet sorted)
    pub records: Vec<PageRecord>,

    /// Final counters
    pub stats: CrawlStatistics,

    /// True if the crawl was stopped before the frontier drained
    pub interrupted: bool,
}

/// An open journal and the run it writes to
struct Journal {
    storage: SqliteStorage,
    run_id: i64,
}

/// State shared by all workers of one run
struct CrawlContext {
    session: Mutex<CrawlSession>,
    /// Signalled whenever a fetch completes, so idle workers re-check the frontier
    work_done: Notify,
    pacer: Pacer,
    client: Client,
    journal: std::sync::Mutex<Option<Journal>>,
    progress: Option<ProgressBar>,
    started: Instant,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    seed: String,
    client: Client,
    journal: Option<Journal>,
    shutdown: watch::Receiver<bool>,
    // Keeps the default shutdown channel open when no external one is set.
    _shutdown_guard: Option<watch::Sender<bool>>,
    progress: Option<ProgressBar>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `seed` - The seed URL; it is normalized and becomes the scope prefix
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(PagemapError)` - The seed is not a usable URL or the client failed to build
    pub fn new(config: Config, seed: &str) -> Result<Self, PagemapError> {
        let query_mode = QueryMode::from_flag(config.crawler.preserve_query);
        let seed = normalize_url(seed, query_mode)?;
        let client = build_http_client(&config.crawler)?;
        let (guard, shutdown) = watch::channel(false);

        Ok(Self {
            config: Arc::new(config),
            seed,
            client,
            journal: None,
            shutdown,
            _shutdown_guard: Some(guard),
            progress: None,
        })
    }

    /// Stops the crawl when the watched value becomes `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = shutdown;
        self._shutdown_guard = None;
        self
    }

    /// Journals every record into `storage` under a new run
    ///
    /// # Arguments
    ///
    /// * `storage` - An open journal database
    /// * `config_hash` - Hash of the configuration file, stored with the run
    pub fn with_journal(
        mut self,
        mut storage: SqliteStorage,
        config_hash: &str,
    ) -> Result<Self, PagemapError> {
        let run_id = storage.create_run(&self.seed, config_hash)?;
        tracing::info!("Journaling records as run {}", run_id);
        self.journal = Some(Journal { storage, run_id });
        Ok(self)
    }

    /// Ticks `progress` once per visited page
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The normalized seed URL
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Runs the crawl until the frontier drains or shutdown is requested
    ///
    /// Per-page failures are logged and skipped; they never end the crawl.
    pub async fn run(self) -> Result<CrawlOutcome, PagemapError> {
        let crawler = &self.config.crawler;
        let workers = crawler.workers.max(1) as usize;
        tracing::info!(
            "Starting crawl of {} with {} worker(s), {}ms pacing, {}s timeout",
            self.seed,
            workers,
            crawler.pacing_delay_ms,
            crawler.request_timeout_secs
        );

        let session = CrawlSession::new(
            &self.seed,
            QueryMode::from_flag(crawler.preserve_query),
            self.config.report.fallback_file_type.clone(),
        );

        let context = Arc::new(CrawlContext {
            session: Mutex::new(session),
            work_done: Notify::new(),
            pacer: Pacer::from_millis(crawler.pacing_delay_ms),
            client: self.client,
            journal: std::sync::Mutex::new(self.journal),
            progress: self.progress,
            started: Instant::now(),
        });

        let mut tasks = JoinSet::new();
        for worker_id in 0..workers {
            tasks.spawn(worker_loop(
                worker_id,
                Arc::clone(&context),
                self.shutdown.clone(),
            ));
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!("Crawl worker panicked: {}", e);
            }
        }

        let interrupted = *self.shutdown.borrow();
        let context = Arc::try_unwrap(context)
            .map_err(|_| PagemapError::Worker("crawl context still shared".to_string()))?;

        if let Some(progress) = &context.progress {
            progress.finish_and_clear();
        }

        finish_journal(&context.journal, interrupted);

        let (records, stats) = context.session.into_inner().finish(interrupted);
        if interrupted {
            tracing::warn!(
                "Crawl interrupted after {} pages; returning partial results",
                stats.visited
            );
        } else {
            tracing::info!(
                "Crawl completed: {} pages visited, {} recorded in {:?}",
                stats.visited,
                stats.recorded,
                context.started.elapsed()
            );
        }

        Ok(CrawlOutcome {
            records,
            stats,
            interrupted,
        })
    }
}

/// Runs one worker until the crawl is done or shutdown is requested
async fn worker_loop(
    worker_id: usize,
    context: Arc<CrawlContext>,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::debug!("Worker {} started", worker_id);

    loop {
        if *shutdown.borrow() {
            break;
        }

        let notified = context.work_done.notified();
        tokio::pin!(notified);

        let next = {
            let mut session = context.session.lock().await;
            // Register for wake-ups before the lock is released so a fetch
            // finishing in between cannot be missed.
            notified.as_mut().enable();
            session.next_entry()
        };

        match next {
            Next::Done => {
                context.work_done.notify_waiters();
                break;
            }
            Next::Idle => {
                tokio::select! {
                    _ = &mut notified => {}
                    _ = wait_for_shutdown(&mut shutdown) => {}
                }
            }
            Next::Fetch(entry) => {
                report_progress(&context).await;
                process_entry(&context, entry, &mut shutdown).await;
                context.work_done.notify_waiters();
            }
        }
    }

    tracing::debug!("Worker {} stopped", worker_id);
}

/// Fetches and parses one entry, then hands the results to the session
///
/// Parsing and journal writes happen outside the session lock; the lock is
/// held only while the session itself changes.
async fn process_entry(
    context: &CrawlContext,
    entry: FrontierEntry,
    shutdown: &mut watch::Receiver<bool>,
) {
    tracing::debug!("Processing URL: {}", entry.url);

    let fetched = tokio::select! {
        result = async {
            context.pacer.wait().await;
            fetch_url(&context.client, &entry.url).await
        } => Some(result),
        _ = wait_for_shutdown(shutdown) => None,
    };

    match fetched {
        None => {
            tracing::debug!("Abandoned {} on shutdown", entry.url);
            context.session.lock().await.finish_entry();
        }
        Some(FetchResult::Success {
            final_url,
            content_type,
            body,
        }) => {
            if final_url != entry.url {
                tracing::debug!("{} redirected to {}", entry.url, final_url);
            }
            tracing::debug!("{}: {} ({} bytes)", entry.url, content_type, body.len());

            let parsed = parse_html(&body);
            let page_url = Url::parse(&entry.url);

            let record = {
                let mut session = context.session.lock().await;
                let record = session.record_page(&entry, parsed.title);
                match &page_url {
                    Ok(page_url) => {
                        let added = session.enqueue_links(&parsed.links, page_url);
                        tracing::trace!("{}: {} new link(s)", entry.url, added);
                    }
                    Err(e) => tracing::warn!("Cannot resolve links on {}: {}", entry.url, e),
                }
                session.finish_entry();
                record
            };

            journal_record(&context.journal, &record);
        }
        Some(FetchResult::HttpError { status_code }) => {
            tracing::debug!("Skipping {}: HTTP {}", entry.url, status_code);
            let mut session = context.session.lock().await;
            session.record_skip(status_code);
            session.finish_entry();
        }
        Some(FetchResult::NetworkError { error, kind }) => {
            tracing::warn!("Error fetching {}: {}", entry.url, error);
            let mut session = context.session.lock().await;
            session.record_error(kind.to_string());
            session.finish_entry();
        }
    }
}

async fn report_progress(context: &CrawlContext) {
    let (visited, frontier) = {
        let session = context.session.lock().await;
        (session.visited_count(), session.frontier_len())
    };

    if let Some(progress) = &context.progress {
        progress.set_position(visited as u64);
    }

    if visited % PROGRESS_LOG_INTERVAL == 0 {
        let elapsed = context.started.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            visited as f64 / elapsed
        } else {
            0.0
        };
        tracing::info!(
            "Progress: {} pages visited, {} in frontier, {:.2} pages/sec",
            visited,
            frontier,
            rate
        );
    }
}

/// Resolves once shutdown is requested; never resolves if the sender is gone
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn journal_record(journal: &std::sync::Mutex<Option<Journal>>, record: &PageRecord) {
    let Ok(mut guard) = journal.lock() else {
        return;
    };
    let Some(open) = guard.as_mut() else {
        return;
    };

    if let Err(e) = open.storage.append_record(open.run_id, record) {
        tracing::error!("Journal write failed, disabling journal: {}", e);
        *guard = None;
    }
}

fn finish_journal(journal: &std::sync::Mutex<Option<Journal>>, interrupted: bool) {
    let Ok(mut guard) = journal.lock() else {
        return;
    };
    let Some(open) = guard.as_mut() else {
        return;
    };

    let result = if interrupted {
        open.storage.mark_interrupted(open.run_id)
    } else {
        open.storage.complete_run(open.run_id)
    };

    if let Err(e) = result {
        tracing::error!("Failed to close journal run {}: {}", open.run_id, e);
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use pagemap::config::Config;
/// use pagemap::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(Config::default(), "https://example.com/").await?;
/// println!("{} pages recorded", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, seed: &str) -> Result<CrawlOutcome, PagemapError> {
    Coordinator::new(config, seed)?.run().await
}
