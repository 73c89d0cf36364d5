//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use async_trait::async_trait;
use crawl_audit::{crawl, CrawlProgress, Crawler, CrawlerConfig, FetchedPage, PageAnalyzer};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records the page title
struct TitleAnalyzer;

#[async_trait]
impl PageAnalyzer for TitleAnalyzer {
    type Output = Option<String>;

    async fn analyze(&self, page: &FetchedPage) -> anyhow::Result<Option<String>> {
        Ok(page_title(&page.body))
    }
}

fn page_title(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
}

/// Fails on any page whose path contains "bad"
struct PickyAnalyzer;

#[async_trait]
impl PageAnalyzer for PickyAnalyzer {
    type Output = usize;

    async fn analyze(&self, page: &FetchedPage) -> anyhow::Result<usize> {
        if page.url.contains("bad") {
            anyhow::bail!("unsupported page layout");
        }
        Ok(page.body.len())
    }
}

/// Creates a fast test configuration
fn create_test_config() -> CrawlerConfig {
    CrawlerConfig {
        max_pages: 20,
        max_depth: 3,
        delay: 0,
        timeout: 2000,
        concurrency: 3,
        max_retries: 0,
        retry_delay: 10,
        robots_timeout: 1000,
        user_agent: "TestBot/1.0".to_string(),
        ..Default::default()
    }
}

/// Builds a page with the given title and links
fn html_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, anchors
    )
}

async fn mount_page(server: &MockServer, route: &str, title: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html_page(title, links), "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Counts requests the server received for a path
async fn request_count(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .expect("Request recording disabled")
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

fn url_of(server: &MockServer, route: &str) -> String {
    format!("{}{}", server.uri(), route)
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        &["/page1", "/page2", "https://other.example/elsewhere"],
    )
    .await;
    mount_page(&server, "/page1", "Page 1", &["/", "/page2"]).await;
    mount_page(&server, "/page2", "Page 2", &[]).await;

    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.stats.pages_crawled, 3);
    assert_eq!(report.stats.pages_discovered, 3);
    assert_eq!(report.stats.pages_failed, 0);
    assert_eq!(report.stats.max_depth_reached, 1);
    assert!(!report.cancelled);

    let home = &report.results[0];
    assert_eq!(home.url, url_of(&server, "/"));
    assert_eq!(home.depth, 0);
    assert!(home.success);
    assert_eq!(home.analysis, Some(Some("Home".to_string())));
    assert_eq!(home.internal_link_count, 2);
    assert_eq!(home.external_link_count, 1);
    assert_eq!(home.status_code, Some(200));

    let urls: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            url_of(&server, "/"),
            url_of(&server, "/page1"),
            url_of(&server, "/page2"),
        ]
    );

    // The external link is never fetched
    assert_eq!(request_count(&server, "/elsewhere").await, 0);
}

#[tokio::test]
async fn test_single_page_budget_at_depth_zero() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/a", "/b"]).await;
    mount_page(&server, "/a", "A", &[]).await;
    mount_page(&server, "/b", "B", &[]).await;

    let config = CrawlerConfig {
        max_pages: 1,
        max_depth: 0,
        ..create_test_config()
    };
    let report = crawl(&server.uri(), config, TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].url, url_of(&server, "/"));
    assert_eq!(report.stats.pages_crawled, 1);
    assert!(report.stats.pages_discovered >= 1);
    assert_eq!(request_count(&server, "/a").await, 0);
}

#[tokio::test]
async fn test_page_budget_never_exceeded() {
    let server = MockServer::start().await;

    let routes: Vec<String> = (0..10).map(|i| format!("/p{}", i)).collect();
    let links: Vec<&str> = routes.iter().map(String::as_str).collect();
    mount_page(&server, "/", "Home", &links).await;
    for route in &routes {
        mount_page(&server, route, route, &[]).await;
    }

    let config = CrawlerConfig {
        max_pages: 4,
        concurrency: 3,
        ..create_test_config()
    };
    let report = crawl(&server.uri(), config, TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.stats.pages_crawled, 4);
    assert_eq!(report.results.len(), 4);
    // Breadth-first, in document order
    assert_eq!(report.results[1].url, url_of(&server, "/p0"));
    assert_eq!(report.results[3].url, url_of(&server, "/p2"));
}

#[tokio::test]
async fn test_max_depth_respected() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/d1"]).await;
    mount_page(&server, "/d1", "Depth 1", &["/d2"]).await;
    mount_page(&server, "/d2", "Depth 2", &["/d3"]).await;
    mount_page(&server, "/d3", "Depth 3", &[]).await;

    let config = CrawlerConfig {
        max_depth: 2,
        ..create_test_config()
    };
    let report = crawl(&server.uri(), config, TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.results.len(), 3);
    assert!(report.results.iter().all(|r| r.depth <= 2));
    assert_eq!(report.stats.max_depth_reached, 2);
    assert_eq!(request_count(&server, "/d3").await, 0);
}

#[tokio::test]
async fn test_javascript_only_link_yields_no_frontier() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["javascript:void(0)"]).await;

    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].internal_link_count, 0);
    assert_eq!(report.results[0].external_link_count, 0);
    assert_eq!(report.stats.pages_discovered, 1);
}

#[tokio::test]
async fn test_seed_timeout_after_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page("Slow", &[]), "text/html")
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        timeout: 200,
        max_retries: 2,
        respect_robots: false,
        ..create_test_config()
    };
    let report = crawl(&server.uri(), config, TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.stats.pages_crawled, 0);
    assert_eq!(report.stats.pages_failed, 1);
    assert_eq!(report.results.len(), 1);

    let result = &report.results[0];
    assert!(!result.success);
    assert!(result.analysis.is_none());
    let error = result.error.as_deref().expect("Missing error");
    assert!(error.contains("after 3 attempt(s)"), "unexpected error: {}", error);

    assert_eq!(request_count(&server, "/").await, 3);
}

#[tokio::test]
async fn test_shared_link_enqueued_once() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/a", "/b"]).await;
    mount_page(&server, "/a", "A", &["/c"]).await;
    mount_page(&server, "/b", "B", &["/c/"]).await;
    mount_page(&server, "/c", "C", &[]).await;

    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    let c_results = report
        .results
        .iter()
        .filter(|r| r.url == url_of(&server, "/c"))
        .count();
    assert_eq!(c_results, 1);
    assert_eq!(report.stats.pages_discovered, 4);
    assert_eq!(request_count(&server, "/c").await, 1);

    // Discovered from depth 1, so it sits at depth 2
    let c = report.results.last().expect("No results");
    assert_eq!(c.depth, 2);
}

#[tokio::test]
async fn test_no_url_crawled_twice_in_cyclic_site() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/x", "/y", "/"]).await;
    mount_page(&server, "/x", "X", &["/y", "/", "/x#top"]).await;
    mount_page(&server, "/y", "Y", &["/x/", "/"]).await;

    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    let unique: HashSet<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(unique.len(), report.results.len());
    assert_eq!(report.results.len(), 3);
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private").await;
    mount_page(&server, "/", "Home", &["/public", "/private"]).await;
    mount_page(&server, "/public", "Public", &[]).await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html_page("Private", &[]), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    let urls: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec![url_of(&server, "/"), url_of(&server, "/public")]);
    // A robots denial is not a failure
    assert_eq!(report.stats.pages_failed, 0);
    assert_eq!(request_count(&server, "/robots.txt").await, 1);
}

#[tokio::test]
async fn test_robots_ignored_when_disabled() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /").await;
    mount_page(&server, "/", "Home", &["/page"]).await;
    mount_page(&server, "/page", "Page", &[]).await;

    let config = CrawlerConfig {
        respect_robots: false,
        ..create_test_config()
    };
    let report = crawl(&server.uri(), config, TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.stats.pages_crawled, 2);
    assert_eq!(request_count(&server, "/robots.txt").await, 0);
}

#[tokio::test]
async fn test_robots_fetch_failure_allows_all() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/", "Home", &["/a", "/b"]).await;
    mount_page(&server, "/a", "A", &[]).await;
    mount_page(&server, "/b", "B", &[]).await;

    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.stats.pages_crawled, 3);
    assert_eq!(report.stats.pages_failed, 0);
    // The fallback is cached; robots.txt is not retried per page
    assert_eq!(request_count(&server, "/robots.txt").await, 1);
}

#[tokio::test]
async fn test_failed_page_recorded_and_not_refetched() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/broken", "/ok"]).await;
    mount_page(&server, "/ok", "OK", &["/broken", "/later"]).await;
    mount_page(&server, "/later", "Later", &["/broken"]).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.stats.pages_failed, 1);
    assert_eq!(report.stats.pages_crawled, 3);
    assert_eq!(request_count(&server, "/broken").await, 1);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].url, url_of(&server, "/broken"));
    assert!(failures[0].error.as_deref().unwrap_or("").contains("HTTP 500"));
}

#[tokio::test]
async fn test_analyzer_failure_recorded_per_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/bad", "/good"]).await;
    mount_page(&server, "/bad", "Bad", &[]).await;
    mount_page(&server, "/good", "Good", &[]).await;

    let report = crawl(&server.uri(), create_test_config(), PickyAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.stats.pages_crawled, 3);
    assert_eq!(report.stats.pages_failed, 0);

    let bad = report
        .results
        .iter()
        .find(|r| r.url == url_of(&server, "/bad"))
        .expect("Missing /bad result");
    assert!(!bad.success);
    assert!(bad.analysis.is_none());
    assert!(bad
        .error
        .as_deref()
        .unwrap_or("")
        .contains("unsupported page layout"));
    assert_eq!(report.successes().count(), 2);
}

#[tokio::test]
async fn test_query_ignored_for_dedup() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/list?page=1", "/list?page=2"]).await;
    mount_page(&server, "/list", "List", &[]).await;

    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[1].url, url_of(&server, "/list"));
}

#[tokio::test]
async fn test_query_kept_when_configured() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/list?page=1", "/list?page=2"]).await;
    mount_page(&server, "/list", "List", &[]).await;

    let config = CrawlerConfig {
        ignore_query: false,
        ..create_test_config()
    };
    let report = crawl(&server.uri(), config, TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.results[2].url, url_of(&server, "/list?page=2"));
}

#[tokio::test]
async fn test_results_follow_dispatch_order() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/slow", "/fast"]).await;
    mount_page(&server, "/fast", "Fast", &[]).await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page("Slow", &[]), "text/html")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    let urls: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            url_of(&server, "/"),
            url_of(&server, "/slow"),
            url_of(&server, "/fast"),
        ]
    );
}

#[tokio::test]
async fn test_redirect_followed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/old"]).await;
    mount_page(&server, "/new", "New", &["child"]).await;
    mount_page(&server, "/child", "Child", &[]).await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;

    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    let old = &report.results[1];
    assert_eq!(old.url, url_of(&server, "/old"));
    assert_eq!(old.final_url.as_deref(), Some(url_of(&server, "/new").as_str()));
    assert_eq!(old.analysis, Some(Some("New".to_string())));

    // Relative links resolve against the post-redirect URL
    assert_eq!(report.results[2].url, url_of(&server, "/child"));
}

#[tokio::test]
async fn test_redirect_not_followed_when_disabled() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/old"]).await;
    mount_page(&server, "/new", "New", &[]).await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        follow_redirects: false,
        ..create_test_config()
    };
    let report = crawl(&server.uri(), config, TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.results.len(), 2);
    assert!(report.results[1].success);
    assert_eq!(report.results[1].status_code, Some(301));
    assert_eq!(request_count(&server, "/new").await, 0);
}

#[tokio::test]
async fn test_progress_snapshots_per_batch() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/a", "/b", "/c", "/d"]).await;
    for route in ["/a", "/b", "/c", "/d"] {
        mount_page(&server, route, route, &[]).await;
    }

    let snapshots = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&snapshots);
    let config = CrawlerConfig {
        max_pages: 10,
        concurrency: 2,
        ..create_test_config()
    };

    let mut crawler = Crawler::new(config, TitleAnalyzer)
        .expect("Failed to create crawler")
        .with_progress(move |p: &CrawlProgress| sink.lock().unwrap().push(p.clone()));
    let report = crawler.run(&server.uri()).await;

    assert_eq!(report.stats.pages_crawled, 5);

    let snapshots = snapshots.lock().unwrap();
    let batch_sizes: Vec<usize> = snapshots.iter().map(|p| p.batch_size).collect();
    assert_eq!(batch_sizes, vec![1, 2, 2]);

    assert_eq!(snapshots[1].pages_crawled, 1);
    assert_eq!(snapshots[1].pages_discovered, 5);
    assert_eq!(snapshots[1].frontier_size, 2);
    assert_eq!(snapshots[1].percent_complete, 10);
    assert_eq!(snapshots[2].percent_complete, 30);
}

#[tokio::test]
async fn test_cancellation_drains_current_batch() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/a", "/b"]).await;
    mount_page(&server, "/a", "A", &["/c"]).await;
    mount_page(&server, "/b", "B", &[]).await;
    mount_page(&server, "/c", "C", &[]).await;

    let cancel = Arc::new(AtomicBool::new(false));
    let trigger = Arc::clone(&cancel);

    // Raise the flag while the second batch is being dispatched
    let mut crawler = Crawler::new(create_test_config(), TitleAnalyzer)
        .expect("Failed to create crawler")
        .with_cancel_flag(Arc::clone(&cancel))
        .with_progress(move |p: &CrawlProgress| {
            if p.pages_crawled == 1 {
                trigger.store(true, Ordering::SeqCst);
            }
        });
    let report = crawler.run(&server.uri()).await;

    // The in-flight batch finished, then no further batch started
    assert!(report.cancelled);
    assert_eq!(report.stats.pages_crawled, 3);
    assert_eq!(request_count(&server, "/c").await, 0);

    // A raised flag stops the next run before its first batch
    let report = crawler.run(&server.uri()).await;
    assert!(report.cancelled);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn test_runs_do_not_share_state() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/a"]).await;
    mount_page(&server, "/a", "A", &[]).await;

    let mut crawler =
        Crawler::new(create_test_config(), TitleAnalyzer).expect("Failed to create crawler");

    let first = crawler.run(&server.uri()).await;
    let second = crawler.run(&server.uri()).await;

    assert_eq!(first.results.len(), 2);
    assert_eq!(second.results.len(), 2);
    assert_eq!(request_count(&server, "/robots.txt").await, 2);
}

#[tokio::test]
async fn test_non_html_responses_rejected() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/report.pdf", "/logo.png", "/about"]).await;
    mount_page(&server, "/about", "About", &[]).await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"%PDF-1.4 <a href="/hidden">x</a>"#, "application/pdf"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"))
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        max_pages: 3,
        concurrency: 1,
        max_retries: 2,
        ..create_test_config()
    };
    let report = crawl(&server.uri(), config, TitleAnalyzer, None)
        .await
        .expect("Crawl failed");

    // Non-HTML pages do not use up the page budget
    assert_eq!(report.stats.pages_crawled, 2);
    assert_eq!(report.stats.pages_failed, 2);
    let about = report
        .results
        .iter()
        .find(|r| r.url == url_of(&server, "/about"))
        .expect("Missing /about result");
    assert!(about.success);

    let pdf = report
        .results
        .iter()
        .find(|r| r.url == url_of(&server, "/report.pdf"))
        .expect("Missing /report.pdf result");
    assert!(!pdf.success);
    assert!(pdf.analysis.is_none());
    let error = pdf.error.as_deref().expect("Missing error");
    assert!(error.contains("Expected HTML, got application/pdf"), "unexpected error: {}", error);

    let png = report
        .results
        .iter()
        .find(|r| r.url == url_of(&server, "/logo.png"))
        .expect("Missing /logo.png result");
    assert!(png.error.as_deref().unwrap_or("").contains("image/png"));

    // Rejected without retrying, and links inside are not followed
    assert_eq!(request_count(&server, "/report.pdf").await, 1);
    assert_eq!(request_count(&server, "/hidden").await, 0);
}

#[tokio::test]
async fn test_delay_applies_per_slot() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &["/a", "/b", "/c"]).await;
    for route in ["/a", "/b", "/c"] {
        mount_page(&server, route, route, &[]).await;
    }

    let batch_starts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&batch_starts);
    let config = CrawlerConfig {
        concurrency: 3,
        delay: 300,
        ..create_test_config()
    };

    let mut crawler = Crawler::new(config, TitleAnalyzer)
        .expect("Failed to create crawler")
        .with_progress(move |_: &CrawlProgress| sink.lock().unwrap().push(Instant::now()));
    let report = crawler.run(&server.uri()).await;
    let finished = Instant::now();

    assert_eq!(report.stats.pages_crawled, 4);

    let batch_starts = batch_starts.lock().unwrap();
    assert_eq!(batch_starts.len(), 2);

    // The seed's own delay runs before the second batch starts
    assert!(batch_starts[1] - batch_starts[0] >= Duration::from_millis(300));

    // Three slots wait side by side rather than one after another
    let second_batch = finished - batch_starts[1];
    assert!(second_batch >= Duration::from_millis(300), "took {:?}", second_batch);
    assert!(second_batch < Duration::from_millis(800), "took {:?}", second_batch);
}

#[tokio::test]
async fn test_robots_crawl_delay_honored() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nCrawl-delay: 1").await;
    mount_page(&server, "/", "Home", &[]).await;

    let honored = CrawlerConfig {
        honor_crawl_delay: true,
        ..create_test_config()
    };
    let started = Instant::now();
    let report = crawl(&server.uri(), honored, TitleAnalyzer, None)
        .await
        .expect("Crawl failed");
    let elapsed = started.elapsed();

    assert_eq!(report.stats.pages_crawled, 1);
    assert!(elapsed >= Duration::from_secs(1), "took {:?}", elapsed);

    // Without the opt-in the directive is ignored
    let started = Instant::now();
    let report = crawl(&server.uri(), create_test_config(), TitleAnalyzer, None)
        .await
        .expect("Crawl failed");
    let elapsed = started.elapsed();

    assert_eq!(report.stats.pages_crawled, 1);
    assert!(elapsed < Duration::from_secs(1), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_cancellation_during_final_batch_reported() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "Home", &[]).await;

    let cancel = Arc::new(AtomicBool::new(false));
    let trigger = Arc::clone(&cancel);

    let mut crawler = Crawler::new(create_test_config(), TitleAnalyzer)
        .expect("Failed to create crawler")
        .with_cancel_flag(Arc::clone(&cancel))
        .with_progress(move |_: &CrawlProgress| trigger.store(true, Ordering::SeqCst));
    let report = crawler.run(&server.uri()).await;

    assert!(cancel.load(Ordering::SeqCst));
    assert!(report.cancelled);
    assert_eq!(report.stats.pages_crawled, 1);
    assert_eq!(report.results.len(), 1);
}
