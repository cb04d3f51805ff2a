//! pagemap main entry point
//!
//! This is the command-line interface for the pagemap site crawler.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pagemap::config::{load_config_with_hash, validate, Config};
use pagemap::crawler::Coordinator;
use pagemap::output::{
    generate_markdown_summary, print_statistics, write_report, CrawlStatistics, OutputFormat,
};
use pagemap::report::{RecordSetBuilder, ReportSchema};
use pagemap::storage::{open_storage, Storage, StorageError};
use pagemap::url::{normalize_url, QueryMode};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Exit code used when the crawl was stopped by Ctrl-C
const EXIT_INTERRUPTED: u8 = 130;

/// Hash recorded in the journal when no configuration file is used
const DEFAULT_CONFIG_HASH: &str = "built-in-defaults";

/// pagemap: a single-domain sitemap crawler
///
/// pagemap crawls every page reachable from a seed URL that stays under the
/// seed prefix, and writes a sorted report with the title and file type of
/// each page.
#[derive(Parser, Debug)]
#[command(name = "pagemap")]
#[command(version)]
#[command(about = "A single-domain sitemap crawler", long_about = None)]
struct Cli {
    /// Seed URL, including the scheme (e.g. https://www.example.edu/)
    #[arg(value_name = "SEED", required_unless_present = "recover")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Report format (overrides the configuration)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Directory the report is written to (overrides the configuration)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Number of concurrent fetch workers (overrides the configuration)
    #[arg(short, long)]
    workers: Option<u32>,

    /// Journal every record into this SQLite database
    #[arg(long, value_name = "PATH")]
    journal: Option<PathBuf>,

    /// Write a markdown crawl summary to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "recover")]
    dry_run: bool,

    /// Rebuild the report from the latest run in a journal instead of crawling
    #[arg(long, value_name = "JOURNAL")]
    recover: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let (config, config_hash) = load_configuration(&cli)?;

    if let Some(journal) = &cli.recover {
        handle_recover(&config, journal)?;
        return Ok(ExitCode::SUCCESS);
    }

    let seed = cli
        .seed
        .as_deref()
        .context("A seed URL is required")?;

    if cli.dry_run {
        handle_dry_run(&config, seed)?;
        return Ok(ExitCode::SUCCESS);
    }

    handle_crawl(config, &config_hash, seed, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagemap=info,warn"),
            1 => EnvFilter::new("pagemap=debug,info"),
            2 => EnvFilter::new("pagemap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file (if any), applies CLI overrides and validates the result
fn load_configuration(cli: &Cli) -> anyhow::Result<(Config, String)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, hash)
        }
        None => (Config::default(), DEFAULT_CONFIG_HASH.to_string()),
    };

    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(journal) = &cli.journal {
        config.output.journal_path = Some(journal.display().to_string());
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.display().to_string());
    }

    validate(&config).context("Invalid configuration")?;
    Ok((config, hash))
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, seed: &str) -> anyhow::Result<()> {
    let query_mode = QueryMode::from_flag(config.crawler.preserve_query);
    let normalized = normalize_url(seed, query_mode).context("Invalid seed URL")?;
    let schema = ReportSchema::from_config(&config.report);

    println!("=== pagemap Dry Run ===\n");

    println!("Seed: {}", normalized);
    println!("Scope: every URL starting with {}", normalized);

    println!("\nCrawler Configuration:");
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Pacing delay: {}ms", config.crawler.pacing_delay_ms);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Preserve query: {}", config.crawler.preserve_query);
    if let Some(agent) = &config.crawler.user_agent {
        println!("  User agent: {}", agent);
    }

    println!("\nReport Columns ({}):", schema.headers().len());
    for header in schema.headers() {
        println!("  - {}", header);
    }
    println!("  Fallback file type: {}", schema.fallback_file_type());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!(
        "  File: {}.{}",
        config.output.base_name,
        config.output.format.extension()
    );
    if let Some(journal) = &config.output.journal_path {
        println!("  Journal: {}", journal);
    }
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --recover mode: rebuilds the report from a journal
fn handle_recover(config: &Config, journal: &Path) -> anyhow::Result<()> {
    let storage = open_storage(journal)
        .with_context(|| format!("Failed to open journal {}", journal.display()))?;
    let run = storage.get_latest_run()?.ok_or(StorageError::NoRuns)?;
    let records = storage.load_records(run.id)?;

    tracing::info!(
        "Recovering run {} ({}, status {}) with {} records",
        run.id,
        run.seed,
        run.status.to_db_string(),
        records.len()
    );
    if run.config_hash != DEFAULT_CONFIG_HASH {
        tracing::info!("Run was recorded with configuration hash {}", run.config_hash);
    }

    let stats = CrawlStatistics::from_records(&run.seed, &records);
    let path = write_records(config, &run.seed, records, &stats)?;

    println!("Recovered sitemap for {} saved as {}", run.seed, path.display());
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: &str,
    seed: &str,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl and saving partial results");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut coordinator = Coordinator::new(config.clone(), seed)
        .context("Invalid seed URL")?
        .with_shutdown(shutdown_rx);

    if let Some(journal) = &config.output.journal_path {
        let storage = open_storage(Path::new(journal))
            .with_context(|| format!("Failed to open journal {}", journal))?;
        coordinator = coordinator.with_journal(storage, config_hash)?;
    }

    if !quiet && std::io::stderr().is_terminal() {
        coordinator = coordinator.with_progress(create_spinner());
    }

    println!("Starting crawl on: {}", seed);
    let outcome = coordinator.run().await.context("Crawl failed")?;

    let path = write_records(&config, seed, outcome.records, &outcome.stats)?;

    if !quiet {
        print_statistics(&outcome.stats);
        println!();
    }

    if outcome.interrupted {
        println!(
            "Crawl interrupted. Partial sitemap for {} saved as {}",
            seed,
            path.display()
        );
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }

    println!("Crawl complete. Sitemap for {} saved as {}", seed, path.display());
    Ok(ExitCode::SUCCESS)
}

/// Builds, writes and summarizes the report for a list of records
fn write_records(
    config: &Config,
    seed: &str,
    records: Vec<pagemap::PageRecord>,
    stats: &CrawlStatistics,
) -> anyhow::Result<PathBuf> {
    let report = RecordSetBuilder::new(ReportSchema::from_config(&config.report)).build(records);
    let title = format!("Sitemap for {}", seed);

    let path = write_report(
        &report,
        config.output.format,
        Path::new(&config.output.directory),
        &config.output.base_name,
        &title,
    )
    .context("Failed to write report")?;

    if let Some(summary) = &config.output.summary_path {
        generate_markdown_summary(stats, Some(&path), Path::new(summary))
            .with_context(|| format!("Failed to write summary {}", summary))?;
        tracing::info!("Summary written to {}", summary);
    }

    Ok(path)
}

fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} pages visited")
    {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
