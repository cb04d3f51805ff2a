//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end: fetch, parse, record, report.

use pagemap::config::Config;
use pagemap::crawler::Coordinator;
use pagemap::output::{write_report, OutputFormat};
use pagemap::report::{ColorClass, RecordSetBuilder, ReportSchema};
use pagemap::storage::{open_storage, RunStatus, SqliteStorage, Storage};
use pagemap::PageRecord;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::sync::watch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration without pacing and with a short timeout
fn create_test_config(workers: u32) -> Config {
    let mut config = Config::default();
    config.crawler.pacing_delay_ms = 0;
    config.crawler.request_timeout_secs = 2;
    config.crawler.workers = workers;
    config
}

fn html_page(title: Option<&str>, links: &[&str]) -> ResponseTemplate {
    let head = title
        .map(|t| format!("<head><title>{}</title></head>", t))
        .unwrap_or_default();
    let body: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">link</a>\n", href))
        .collect();

    ResponseTemplate::new(200)
        .set_body_string(format!("<html>{}<body>{}</body></html>", head, body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, page: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(page)
        .mount(server)
        .await;
}

async fn crawl(config: Config, seed: &str) -> Vec<PageRecord> {
    Coordinator::new(config, seed)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed")
        .records
}

fn sorted_urls(records: &[PageRecord]) -> Vec<String> {
    let mut urls: Vec<String> = records.iter().map(|r| r.url.clone()).collect();
    urls.sort();
    urls
}

#[tokio::test]
async fn test_single_page_site() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(Some("  Home Page \n"), &[])).await;

    let seed = format!("{}/", server.uri());
    let records = crawl(create_test_config(1), &seed).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, seed);
    assert_eq!(records[0].parent, "ROOT");
    assert_eq!(records[0].title, "Home Page");
    assert_eq!(records[0].file_type, "pcf");
}

#[tokio::test]
async fn test_missing_title_is_placeholder() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(None, &[])).await;

    let records = crawl(create_test_config(1), &server.uri()).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "-");
}

#[tokio::test]
async fn test_fragment_links_fetched_once() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(Some("Home"), &["/a", "/a#frag", "a#other"])).await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(Some("A"), &["/#top"]))
        .expect(1)
        .mount(&server)
        .await;

    let records = crawl(create_test_config(1), &server.uri()).await;

    assert_eq!(records.len(), 2);
    let a = records
        .iter()
        .find(|r| r.url.ends_with("/a"))
        .expect("Missing /a record");
    assert_eq!(a.parent, format!("{}/", server.uri()));
    assert_eq!(a.title, "A");
}

#[tokio::test]
async fn test_non_200_is_skipped_and_siblings_continue() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html_page(Some("Home"), &["/missing", "/broken", "/ok"]),
    )
    .await;
    mount_page(&server, "/missing", ResponseTemplate::new(404)).await;
    mount_page(&server, "/broken", ResponseTemplate::new(500)).await;
    mount_page(&server, "/ok", html_page(Some("Ok"), &[])).await;

    let outcome = Coordinator::new(create_test_config(1), &server.uri())
        .unwrap()
        .run()
        .await
        .unwrap();

    let urls = sorted_urls(&outcome.records);
    assert_eq!(
        urls,
        vec![format!("{}/", server.uri()), format!("{}/ok", server.uri())]
    );
    assert_eq!(outcome.stats.skipped_by_status.get(&404), Some(&1));
    assert_eq!(outcome.stats.skipped_by_status.get(&500), Some(&1));
    assert!(!outcome.interrupted);
}

#[tokio::test]
async fn test_out_of_scope_links_never_fetched() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_page(Some("Elsewhere"), &[]))
        .expect(0)
        .mount(&other)
        .await;

    let outside = format!("{}/page", other.uri());
    mount_page(
        &server,
        "/docs/",
        html_page(Some("Docs"), &[outside.as_str(), "/blog/", "intro"]),
    )
    .await;
    mount_page(&server, "/docs/intro", html_page(Some("Intro"), &[])).await;

    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(html_page(Some("Blog"), &[]))
        .expect(0)
        .mount(&server)
        .await;

    let seed = format!("{}/docs/", server.uri());
    let outcome = Coordinator::new(create_test_config(1), &seed)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(
        sorted_urls(&outcome.records),
        vec![seed.clone(), format!("{}intro", seed)]
    );
    assert_eq!(outcome.stats.links_out_of_scope, 2);
}

#[tokio::test]
async fn test_pdf_and_php_file_types() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html_page(Some("Home"), &["/files/report.pdf", "/index.php"]),
    )
    .await;
    mount_page(
        &server,
        "/files/report.pdf",
        ResponseTemplate::new(200)
            .set_body_string("%PDF-1.4 binary")
            .insert_header("content-type", "application/pdf"),
    )
    .await;
    mount_page(&server, "/index.php", html_page(Some("Index"), &[])).await;

    let records = crawl(create_test_config(1), &server.uri()).await;
    let report = RecordSetBuilder::new(ReportSchema::default()).build(records);

    assert_eq!(report.len(), 3);
    let file_type = report.column_index(pagemap::report::Column::FileType).unwrap();
    let title = report.column_index(pagemap::report::Column::Title).unwrap();

    let pdf = report
        .rows
        .iter()
        .find(|row| row.cells[file_type] == "pdf")
        .expect("Missing pdf row");
    assert_eq!(pdf.cells[title], "-");
    assert_eq!(pdf.hints.color, ColorClass::RedRow);

    let php = report
        .rows
        .iter()
        .find(|row| row.cells[file_type] == "php")
        .expect("Missing php row");
    assert_eq!(php.hints.color, ColorClass::GreenFileType);
}

#[tokio::test]
async fn test_fallback_file_type_is_blue() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(Some("Home"), &["/about"])).await;
    mount_page(&server, "/about", html_page(Some("About"), &[])).await;

    let mut config = create_test_config(1);
    config.report.fallback_file_type = "html".to_string();
    let schema = ReportSchema::from_config(&config.report);

    let records = crawl(config, &server.uri()).await;
    let report = RecordSetBuilder::new(schema).build(records);

    assert_eq!(report.len(), 2);
    for row in &report.rows {
        assert_eq!(row.cells[3], "html");
        assert_eq!(row.hints.color, ColorClass::BlueFileType);
    }
}

#[tokio::test]
async fn test_cycles_terminate() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(Some("Home"), &["/a"])).await;
    mount_page(&server, "/a", html_page(Some("A"), &["/b", "/"])).await;
    mount_page(&server, "/b", html_page(Some("B"), &["/a", "/", "/b"])).await;

    let records = tokio::time::timeout(
        Duration::from_secs(10),
        crawl(create_test_config(1), &server.uri()),
    )
    .await
    .expect("Crawl did not terminate");

    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn test_report_rows_sorted_by_url() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(Some("Home"), &["/zeta", "/alpha", "/Mid"])).await;
    for route in ["/zeta", "/alpha", "/Mid"] {
        mount_page(&server, route, html_page(Some(route), &[])).await;
    }

    let records = crawl(create_test_config(1), &server.uri()).await;
    let report = RecordSetBuilder::new(ReportSchema::default()).build(records);

    let urls: Vec<&str> = report.rows.iter().map(|r| r.cells[0].as_str()).collect();
    let base = server.uri();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/Mid", base),
            format!("{}/alpha", base),
            format!("{}/zeta", base),
        ]
    );
}

#[tokio::test]
async fn test_worker_pool_matches_single_worker() {
    let server = MockServer::start().await;
    let sections: Vec<String> = (0..8).map(|i| format!("/section{}", i)).collect();
    let section_refs: Vec<&str> = sections.iter().map(String::as_str).collect();
    mount_page(&server, "/", html_page(Some("Home"), &section_refs)).await;

    for (i, section) in sections.iter().enumerate() {
        let child = format!("{}/child", section);
        let shared = "/shared";
        mount_page(
            &server,
            section,
            html_page(Some(&format!("Section {}", i)), &[child.as_str(), shared, "/"]),
        )
        .await;
        mount_page(&server, &child, html_page(Some("Child"), &[section.as_str()])).await;
    }
    mount_page(&server, "/shared", html_page(Some("Shared"), &[])).await;

    let single = crawl(create_test_config(1), &server.uri()).await;
    let pooled = crawl(create_test_config(4), &server.uri()).await;

    assert_eq!(single.len(), 18);
    assert_eq!(sorted_urls(&single), sorted_urls(&pooled));
}

#[tokio::test]
async fn test_worker_pool_fetches_each_url_once() {
    let server = MockServer::start().await;
    let sections: Vec<String> = (0..6).map(|i| format!("/section{}", i)).collect();
    let mut root_links: Vec<&str> = sections.iter().map(String::as_str).collect();
    root_links.push("/shared");
    mount_page(&server, "/", html_page(Some("Home"), &root_links)).await;

    for section in &sections {
        Mock::given(method("GET"))
            .and(path(section.as_str()))
            .respond_with(html_page(Some("Section"), &["/shared", "/", section.as_str()]))
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html_page(Some("Shared"), &root_links))
        .expect(1)
        .mount(&server)
        .await;

    let records = crawl(create_test_config(4), &server.uri()).await;

    assert_eq!(records.len(), 8);
    let urls = sorted_urls(&records);
    let mut deduped = urls.clone();
    deduped.dedup();
    assert_eq!(urls, deduped);
}

#[tokio::test]
async fn test_pacing_budget_is_global_across_workers() {
    let server = MockServer::start().await;
    let pages: Vec<String> = (0..10).map(|i| format!("/page{}", i)).collect();
    let links: Vec<&str> = pages.iter().map(String::as_str).collect();
    mount_page(&server, "/", html_page(Some("Home"), &links)).await;
    for page in &pages {
        mount_page(&server, page, html_page(Some("Page"), &[])).await;
    }

    let mut config = create_test_config(4);
    config.crawler.pacing_delay_ms = 50;

    let started = Instant::now();
    let records = crawl(config, &server.uri()).await;
    let elapsed = started.elapsed();

    // 11 requests at one per 50 ms need at least 10 full periods.
    assert_eq!(records.len(), 11);
    assert!(
        elapsed >= Duration::from_millis(450),
        "4 workers finished 11 paced requests in {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_interrupt_mid_crawl_keeps_partial_records() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(Some("Home"), &["/fast", "/slow"])).await;
    mount_page(&server, "/fast", html_page(Some("Fast"), &[])).await;
    mount_page(
        &server,
        "/slow",
        html_page(Some("Slow"), &[]).set_delay(Duration::from_secs(20)),
    )
    .await;

    let mut config = create_test_config(1);
    config.crawler.request_timeout_secs = 60;

    let dir = TempDir::new().unwrap();
    let journal = dir.path().join("journal.db");
    let storage = SqliteStorage::new(&journal).unwrap();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let _ = shutdown_tx.send(true);
    });

    let started = Instant::now();
    let outcome = Coordinator::new(config, &server.uri())
        .unwrap()
        .with_shutdown(shutdown_rx)
        .with_journal(storage, "test-hash")
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(outcome.interrupted);
    assert!(outcome.stats.interrupted);
    assert_eq!(
        sorted_urls(&outcome.records),
        vec![format!("{}/", server.uri()), format!("{}/fast", server.uri())]
    );

    let storage = open_storage(&journal).unwrap();
    let run = storage.get_latest_run().unwrap().expect("No run recorded");
    assert_eq!(run.status, RunStatus::Interrupted);
    assert_eq!(storage.count_records(run.id).unwrap(), 2);

    let report = RecordSetBuilder::new(ReportSchema::default()).build(outcome.records);
    let path = write_report(&report, OutputFormat::Html, dir.path(), "partial", "Partial").unwrap();
    assert!(std::fs::read_to_string(path).unwrap().contains("/fast"));
}

#[tokio::test]
async fn test_timeout_is_a_fetch_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(Some("Home"), &["/slow", "/fast"])).await;
    mount_page(
        &server,
        "/slow",
        html_page(Some("Slow"), &[]).set_delay(Duration::from_secs(3)),
    )
    .await;
    mount_page(&server, "/fast", html_page(Some("Fast"), &[])).await;

    let mut config = create_test_config(1);
    config.crawler.request_timeout_secs = 1;

    let outcome = Coordinator::new(config, &server.uri())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.records.iter().all(|r| !r.url.ends_with("/slow")));
    assert_eq!(outcome.stats.fetch_errors.get("timeout"), Some(&1));
}

#[tokio::test]
async fn test_journal_records_recoverable() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(Some("Home"), &["/a", "/b"])).await;
    mount_page(&server, "/a", html_page(Some("A"), &[])).await;
    mount_page(&server, "/b", html_page(Some("B"), &[])).await;

    let dir = TempDir::new().unwrap();
    let journal = dir.path().join("journal.db");

    let storage = SqliteStorage::new(&journal).unwrap();
    let outcome = Coordinator::new(create_test_config(2), &server.uri())
        .unwrap()
        .with_journal(storage, "test-hash")
        .unwrap()
        .run()
        .await
        .unwrap();

    let storage = open_storage(&journal).unwrap();
    let run = storage.get_latest_run().unwrap().expect("No run recorded");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "test-hash");
    assert_eq!(run.seed, format!("{}/", server.uri()));

    let recovered = storage.load_records(run.id).unwrap();
    assert_eq!(sorted_urls(&recovered), sorted_urls(&outcome.records));

    let live = RecordSetBuilder::new(ReportSchema::default()).build(outcome.records);
    let rebuilt = RecordSetBuilder::new(ReportSchema::default()).build(recovered);
    assert_eq!(live, rebuilt);
}

#[tokio::test]
async fn test_crawl_to_csv_report() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page(Some("Home, sweet"), &["/guide.pdf"])).await;
    mount_page(
        &server,
        "/guide.pdf",
        ResponseTemplate::new(200).set_body_string("%PDF"),
    )
    .await;

    let records = crawl(create_test_config(1), &server.uri()).await;
    let report = RecordSetBuilder::new(ReportSchema::default()).build(records);

    let dir = TempDir::new().unwrap();
    let path = write_report(
        &report,
        OutputFormat::Csv,
        dir.path(),
        "basic_sitemap_output",
        "Sitemap",
    )
    .unwrap();
    assert_eq!(path, dir.path().join("basic_sitemap_output.csv"));

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("URL,Redirects To,Title,File Type,Notes")
    );
    assert_eq!(
        lines.next(),
        Some(format!("{}/,-,\"Home, sweet\",pcf,-", server.uri()).as_str())
    );
    assert_eq!(
        lines.next(),
        Some(format!("{}/guide.pdf,-,-,pdf,-", server.uri()).as_str())
    );
    assert_eq!(lines.next(), None);
}
