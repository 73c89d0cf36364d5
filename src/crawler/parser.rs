//! HTML link extraction
//!
//! Partitions the anchors of a page into links on the page's own host
//! ("internal") and links elsewhere ("external").

use crate::url::is_same_host;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Links found on a page, de-duplicated by resolved absolute URL
///
/// Both lists keep document order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

impl ExtractedLinks {
    fn push(&mut self, link: Url, base_url: &Url, seen: &mut HashSet<String>) {
        let link_str = link.to_string();
        if !seen.insert(link_str.clone()) {
            return;
        }

        if is_same_host(&link, base_url) {
            self.internal.push(link_str);
        } else {
            self.external.push(link_str);
        }
    }
}

/// Extracts and classifies the links of a parsed document
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">`, resolved against `base_url` (relative,
/// protocol-relative and absolute forms).
///
/// **Exclude:**
/// - Fragment-only targets (`#section`)
/// - `javascript:`, `mailto:`, `tel:` and `data:` targets
/// - Anything that fails to resolve, or resolves to a non-HTTP(S) URL
///
/// Classification compares hostnames only; scheme and port are ignored.
///
/// # Example
///
/// ```
/// use crawl_audit::crawler::extract_links;
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(r#"<a href="/a">A</a><a href="https://other.com/">B</a>"#);
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(&html, &base);
/// assert_eq!(links.internal, vec!["https://example.com/a"]);
/// assert_eq!(links.external, vec!["https://other.com/"]);
/// ```
pub fn extract_links(document: &Html, base_url: &Url) -> ExtractedLinks {
    let mut links = ExtractedLinks::default();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if let Some(resolved) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            links.push(resolved, base_url, &mut seen);
        }
    }

    links
}

/// Parses markup and extracts its links
pub fn extract_links_from_html(html: &str, base_url: &Url) -> ExtractedLinks {
    let document = Html::parse_document(html);
    extract_links(&document, base_url)
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be skipped.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => Some(absolute_url),
        Ok(_) => None,
        Err(e) => {
            tracing::trace!("Skipping unresolvable link {}: {}", href, e);
            None
        }
    }
}
