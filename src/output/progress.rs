use serde::Serialize;

/// Snapshot emitted before each batch is dispatched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlProgress {
    pub pages_discovered: u32,
    pub pages_crawled: u32,
    pub max_depth_reached: u32,
    /// Entries still queued after the batch was popped
    pub frontier_size: usize,
    pub batch_size: usize,
    /// `min(100, round(pages_crawled / max_pages * 100))`
    pub percent_complete: u8,
}

impl CrawlProgress {
    /// Computes completion percentage against the page budget
    pub fn percent(pages_crawled: u32, max_pages: u32) -> u8 {
        if max_pages == 0 {
            return 100;
        }
        let percent = (f64::from(pages_crawled) / f64::from(max_pages) * 100.0).round();
        percent.min(100.0) as u8
    }
}
