//! Crawl-Audit main entry point
//!
//! This is the command-line interface for the Crawl-Audit site crawler.

use async_trait::async_trait;
use clap::Parser;
use crawl_audit::config::{load_config, validate, CrawlerConfig};
use crawl_audit::output::{print_report, summarize};
use crawl_audit::{CrawlProgress, Crawler, FetchedPage, PageAnalyzer};
use scraper::{Html, Selector};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Crawl-Audit: a polite site crawler
///
/// Crawls a website breadth-first from a start URL, respecting robots.txt,
/// and reports the title, meta description and heading count of every page.
#[derive(Parser, Debug)]
#[command(name = "crawl-audit")]
#[command(version)]
#[command(about = "A polite site crawler for page audits", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    max_pages: Option<u32>,

    /// Maximum link depth from the start URL
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum concurrent fetches per batch
    #[arg(long)]
    concurrency: Option<u32>,

    /// Pause after each fetch, in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Ignore robots.txt
    #[arg(long)]
    no_robots: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// On-page signals collected by the built-in analyzer
#[derive(Debug, Clone)]
struct PageSummary {
    title: Option<String>,
    description: Option<String>,
    h1_count: usize,
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "title: {:?}, description: {:?}, h1: {}",
            self.title.as_deref().unwrap_or("-"),
            self.description.as_deref().unwrap_or("-"),
            self.h1_count
        )
    }
}

struct SummaryAnalyzer;

#[async_trait]
impl PageAnalyzer for SummaryAnalyzer {
    type Output = PageSummary;

    async fn analyze(&self, page: &FetchedPage) -> anyhow::Result<PageSummary> {
        Ok(summarize_page(&page.document()))
    }
}

fn summarize_page(document: &Html) -> PageSummary {
    let first_text = |selector: &str| {
        Selector::parse(selector).ok().and_then(|s| {
            document
                .select(&s)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty())
        })
    };

    let description = Selector::parse(r#"meta[name="description"]"#)
        .ok()
        .and_then(|s| {
            document
                .select(&s)
                .next()
                .and_then(|e| e.value().attr("content"))
                .map(|c| c.trim().to_string())
        })
        .filter(|c| !c.is_empty());

    let h1_count = Selector::parse("h1")
        .map(|s| document.select(&s).count())
        .unwrap_or(0);

    PageSummary {
        title: first_text("title"),
        description,
        h1_count,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    tracing::info!(
        "Crawling {} (max pages: {}, max depth: {}, robots: {})",
        cli.url,
        config.max_pages,
        config.max_depth,
        config.respect_robots
    );

    let mut crawler = Crawler::new(config, SummaryAnalyzer)?.with_progress(|p: &CrawlProgress| {
        tracing::info!(
            "Progress: {}% ({} crawled, {} discovered, {} queued, batch of {})",
            p.percent_complete,
            p.pages_crawled,
            p.pages_discovered,
            p.frontier_size,
            p.batch_size
        );
    });

    let cancel = crawler.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current batch");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let report = crawler.run(&cli.url).await;
    tracing::info!("Crawl finished: {}", summarize(&report));

    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Loads the configuration file (or defaults) and applies flag overrides
fn build_config(cli: &Cli) -> anyhow::Result<CrawlerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?.crawler
        }
        None => CrawlerConfig::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(delay) = cli.delay {
        config.delay = delay;
    }
    if cli.no_robots {
        config.respect_robots = false;
    }

    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_audit=info,warn"),
            1 => EnvFilter::new("crawl_audit=debug,info"),
            2 => EnvFilter::new("crawl_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
