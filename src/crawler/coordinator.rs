//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the other components
//! together:
//! - Seeding and draining the frontier in bounded batches
//! - Gating each entry through robots.txt
//! - Fetching a batch concurrently and joining before the next one
//! - Folding fetch outcomes into state, results and the frontier
//! - Progress snapshots and cancellation

use crate::config::{validate, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOptions};
use crate::crawler::parser::{extract_links_from_html, ExtractedLinks};
use crate::crawler::scheduler::{FrontierEntry, Scheduler};
use crate::crawler::{FetchedPage, PageAnalyzer};
use crate::output::{CrawlProgress, CrawlReport, CrawlStats, PageResult};
use crate::state::CrawlState;
use crate::url::{normalize_or_raw, normalize_url};
use crate::CrawlError;
use chrono::Utc;
use futures::future::join_all;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Upper bound applied to a robots.txt Crawl-delay, in seconds
const MAX_CRAWL_DELAY_SECS: f64 = 60.0;

/// Callback receiving a progress snapshot before each batch
pub type ProgressCallback = Box<dyn FnMut(&CrawlProgress) + Send>;

/// What happened to one frontier entry
struct EntryOutcome<T> {
    entry: FrontierEntry,
    result: PageResult<T>,
    /// Internal links of the page, empty unless the fetch succeeded
    internal_links: Vec<String>,
    fetched: bool,
}

/// Read-only view handed to the concurrently running entries of a batch
struct EntryWorker<'a, A> {
    client: &'a Client,
    options: &'a FetchOptions,
    analyzer: &'a A,
}

impl<'a, A: PageAnalyzer> EntryWorker<'a, A> {
    /// Fetches, extracts and analyzes one entry, then waits out its delay
    async fn process(&self, entry: FrontierEntry, delay: Duration) -> EntryOutcome<A::Output> {
        let outcome = match fetch_page(self.client, &entry.url, self.options).await {
            Ok(page) => self.analyze(entry, page).await,
            Err(e @ CrawlError::ContentMismatch { .. }) => {
                tracing::info!("Skipping {}: {}", entry.url, e);
                EntryOutcome {
                    result: PageResult::failure(&entry.url, entry.depth, &e),
                    internal_links: Vec::new(),
                    fetched: false,
                    entry,
                }
            }
            Err(e) => {
                tracing::warn!("Giving up on {}: {}", entry.url, e);
                EntryOutcome {
                    result: PageResult::failure(&entry.url, entry.depth, &e),
                    internal_links: Vec::new(),
                    fetched: false,
                    entry,
                }
            }
        };

        // Throttles this slot only; other entries of the batch run on
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        outcome
    }

    async fn analyze(&self, entry: FrontierEntry, page: FetchedPage) -> EntryOutcome<A::Output> {
        let links = match Url::parse(&page.final_url) {
            Ok(base) => extract_links_from_html(&page.body, &base),
            Err(_) => ExtractedLinks::default(),
        };

        let (analysis, error) = match self.analyzer.analyze(&page).await {
            Ok(output) => (Some(output), None),
            Err(e) => {
                let error = CrawlError::AnalyzerFailed {
                    url: entry.url.clone(),
                    message: format!("{:#}", e),
                };
                tracing::warn!("{}", error);
                (None, Some(error.to_string()))
            }
        };

        let result = PageResult {
            url: entry.url.clone(),
            depth: entry.depth,
            analysis,
            internal_link_count: links.internal.len(),
            external_link_count: links.external.len(),
            success: error.is_none(),
            error,
            status_code: Some(page.status_code),
            final_url: Some(page.final_url),
        };

        EntryOutcome {
            entry,
            result,
            internal_links: links.internal,
            fetched: true,
        }
    }
}

/// Breadth-first site crawler
///
/// A `Crawler` holds the configuration, HTTP client and analyzer; every call
/// to [`Crawler::run`] starts from fresh state.
pub struct Crawler<A: PageAnalyzer> {
    config: CrawlerConfig,
    client: Client,
    fetch_options: FetchOptions,
    analyzer: A,
    on_progress: Option<ProgressCallback>,
    cancel: Arc<AtomicBool>,
}

impl<A: PageAnalyzer> Crawler<A> {
    /// Creates a new crawler
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(CrawlError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: CrawlerConfig, analyzer: A) -> Result<Self, CrawlError> {
        validate(&config)?;
        let client = build_http_client(&config)?;
        let fetch_options = FetchOptions::from(&config);

        Ok(Self {
            config,
            client,
            fetch_options,
            analyzer,
            on_progress: None,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Registers a callback invoked with a snapshot before each batch
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&CrawlProgress) + Send + 'static,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Uses a caller-owned cancellation flag
    ///
    /// Raising the flag stops new batches from starting; the in-flight batch
    /// drains and a partial report is returned.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the flag that cancels this crawler's runs
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawls breadth-first from `start_url`
    ///
    /// Never fails: per-page problems are recorded in the report.
    pub async fn run(&mut self, start_url: &str) -> CrawlReport<A::Output> {
        let started_at = Utc::now();
        let start_time = Instant::now();

        tracing::info!(
            "Starting crawl of {} (max {} pages, max depth {}, concurrency {})",
            start_url,
            self.config.max_pages,
            self.config.max_depth,
            self.config.concurrency
        );

        let mut state = CrawlState::new(Duration::from_millis(self.config.robots_timeout));
        let mut scheduler = Scheduler::new(self.config.max_depth);
        let mut results = Vec::new();
        let mut cancelled = false;

        match normalize_url(start_url, self.config.ignore_query) {
            Ok(seed) => {
                scheduler.add_to_frontier(FrontierEntry {
                    url: seed,
                    depth: 0,
                });
            }
            Err(e) => {
                let error = CrawlError::InvalidUrl(e);
                tracing::warn!("Skipping start URL {}: {}", start_url, error);
                state.mark_failed(start_url);
                results.push(PageResult::failure(start_url, 0, &error));
            }
        }
        state.record_discovered();

        while !scheduler.is_empty() && state.pages_crawled() < self.config.max_pages {
            if self.cancel.load(Ordering::SeqCst) {
                tracing::info!("Crawl cancelled with {} URLs queued", scheduler.frontier_size());
                cancelled = true;
                break;
            }

            // Never dispatch more than the remaining page budget
            let remaining = (self.config.max_pages - state.pages_crawled()) as usize;
            let batch = scheduler.next_batch(remaining.min(self.config.concurrency as usize));
            self.emit_progress(&state, &scheduler, batch.len());

            let mut dispatch = Vec::with_capacity(batch.len());
            for entry in batch {
                state.mark_visited(&entry.url);

                if self.config.respect_robots
                    && !state
                        .robots
                        .is_allowed(&self.client, &entry.url, &self.config.user_agent)
                        .await
                {
                    tracing::info!("Skipping {}: disallowed by robots.txt", entry.url);
                    continue;
                }

                let delay = entry_delay(&self.config, &self.client, &mut state, &entry.url).await;
                dispatch.push((entry, delay));
            }

            let worker = EntryWorker {
                client: &self.client,
                options: &self.fetch_options,
                analyzer: &self.analyzer,
            };
            let outcomes = join_all(
                dispatch
                    .into_iter()
                    .map(|(entry, delay)| worker.process(entry, delay)),
            )
            .await;

            for outcome in outcomes {
                self.apply_outcome(outcome, &mut state, &mut scheduler, &mut results);
            }
        }

        // A flag raised during the final batch still marks the report
        let cancelled = cancelled || self.cancel.load(Ordering::SeqCst);

        let stats = CrawlStats {
            pages_discovered: state.pages_discovered(),
            pages_crawled: state.pages_crawled(),
            pages_failed: state.pages_failed(),
            max_depth_reached: state.max_depth_reached(),
            crawl_duration_seconds: start_time.elapsed().as_secs_f64(),
        };

        tracing::info!(
            "Crawl completed: {} pages crawled, {} failed, {} discovered in {:.2}s",
            stats.pages_crawled,
            stats.pages_failed,
            stats.pages_discovered,
            stats.crawl_duration_seconds
        );

        CrawlReport {
            start_url: start_url.to_string(),
            started_at,
            cancelled,
            results,
            stats,
        }
    }

    /// Folds one entry's outcome into the crawl state
    ///
    /// Internal links of a fetched page are normalized and queued one level
    /// deeper unless already visited, failed, or queued.
    fn apply_outcome(
        &self,
        outcome: EntryOutcome<A::Output>,
        state: &mut CrawlState,
        scheduler: &mut Scheduler,
        results: &mut Vec<PageResult<A::Output>>,
    ) {
        let EntryOutcome {
            entry,
            result,
            internal_links,
            fetched,
        } = outcome;

        if fetched {
            state.record_crawled(entry.depth);

            let depth = entry.depth + 1;
            if depth <= self.config.max_depth {
                for link in internal_links {
                    let url = normalize_or_raw(&link, self.config.ignore_query);
                    if state.is_visited(&url) || state.is_failed(&url) || scheduler.contains(&url) {
                        continue;
                    }

                    if scheduler.add_to_frontier(FrontierEntry { url, depth }) {
                        state.record_discovered();
                    }
                }
            }
        } else {
            state.mark_failed(&entry.url);
        }

        results.push(result);
    }

    fn emit_progress(&mut self, state: &CrawlState, scheduler: &Scheduler, batch_size: usize) {
        let progress = CrawlProgress {
            pages_discovered: state.pages_discovered(),
            pages_crawled: state.pages_crawled(),
            max_depth_reached: state.max_depth_reached(),
            frontier_size: scheduler.frontier_size(),
            batch_size,
            percent_complete: CrawlProgress::percent(state.pages_crawled(), self.config.max_pages),
        };

        tracing::debug!(
            "Dispatching batch of {} ({} queued, {}% complete)",
            progress.batch_size,
            progress.frontier_size,
            progress.percent_complete
        );

        if let Some(callback) = self.on_progress.as_mut() {
            callback(&progress);
        }
    }
}

/// Delay to apply after an entry, stretched by robots.txt Crawl-delay if enabled
async fn entry_delay(
    config: &CrawlerConfig,
    client: &Client,
    state: &mut CrawlState,
    url: &str,
) -> Duration {
    let delay = Duration::from_millis(config.delay);
    if !(config.respect_robots && config.honor_crawl_delay) {
        return delay;
    }

    match state.robots.crawl_delay(client, url, &config.user_agent).await {
        Some(secs) if secs.is_finite() && secs > 0.0 => {
            delay.max(Duration::from_secs_f64(secs.min(MAX_CRAWL_DELAY_SECS)))
        }
        _ => delay,
    }
}

/// Runs a complete crawl
///
/// This is the main entry point. It validates the configuration, then
/// crawls breadth-first from `start_url`, handing every fetched page to
/// `analyzer` and reporting progress to `on_progress` before each batch.
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Always, once the configuration is accepted
/// * `Err(CrawlError)` - Invalid configuration or HTTP client setup failure
///
/// # Example
///
/// ```no_run
/// use async_trait::async_trait;
/// use crawl_audit::{crawl, CrawlerConfig, FetchedPage, PageAnalyzer};
///
/// struct StatusOnly;
///
/// #[async_trait]
/// impl PageAnalyzer for StatusOnly {
///     type Output = u16;
///
///     async fn analyze(&self, page: &FetchedPage) -> anyhow::Result<u16> {
///         Ok(page.status_code)
///     }
/// }
///
/// # async fn example() -> Result<(), crawl_audit::CrawlError> {
/// let report = crawl("https://example.com", CrawlerConfig::default(), StatusOnly, None).await?;
/// println!("{} pages crawled", report.stats.pages_crawled);
/// # Ok(())
/// # }
/// ```
pub async fn crawl<A: PageAnalyzer>(
    start_url: &str,
    config: CrawlerConfig,
    analyzer: A,
    on_progress: Option<ProgressCallback>,
) -> Result<CrawlReport<A::Output>, CrawlError> {
    let mut crawler = Crawler::new(config, analyzer)?;
    crawler.on_progress = on_progress;
    Ok(crawler.run(start_url).await)
}
