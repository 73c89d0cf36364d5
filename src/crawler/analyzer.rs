//! Page analysis seam
//!
//! The crawler does not judge page content itself. Each successfully
//! fetched page is handed to a caller-supplied [`PageAnalyzer`].

use async_trait::async_trait;
use scraper::Html;

/// A successfully fetched page, as handed to the analyzer
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Normalized URL that was requested
    pub url: String,

    /// URL after redirects
    pub final_url: String,

    /// HTTP status code of the final response
    pub status_code: u16,

    /// Content-Type header value, empty if absent
    pub content_type: String,

    /// Response body
    pub body: String,
}

impl FetchedPage {
    /// Parses the body into an HTML document
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Analyzes fetched pages
///
/// Implementations must not panic; failures are reported through the
/// returned `Result` and recorded as a failed page, never aborting the
/// crawl. The crawler awaits each call without a timeout of its own, so
/// slow analyzers should bound themselves.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use crawl_audit::{FetchedPage, PageAnalyzer};
///
/// struct BodySize;
///
/// #[async_trait]
/// impl PageAnalyzer for BodySize {
///     type Output = usize;
///
///     async fn analyze(&self, page: &FetchedPage) -> anyhow::Result<usize> {
///         Ok(page.body.len())
///     }
/// }
/// ```
#[async_trait]
pub trait PageAnalyzer: Send + Sync {
    /// Per-page analysis result stored in the crawl report
    type Output: Send;

    async fn analyze(&self, page: &FetchedPage) -> anyhow::Result<Self::Output>;
}
