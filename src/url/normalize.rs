use crate::UrlError;
use url::Url;

/// Normalizes a URL into a stable, comparable string
///
/// # Normalization Steps
///
/// 1. Parse the URL as absolute; reject if malformed
/// 2. Lowercase scheme and host (the parser already does this)
/// 3. Remove trailing slashes from the path, keeping the root `/`
/// 4. Drop the query string when `ignore_query` is set
/// 5. Always drop the fragment
/// 6. Rebuild as `scheme://host[:port]path[?query]`
///
/// Everything else is kept verbatim: no percent-decoding, no dot-segment
/// or query-parameter rewriting beyond what the parser itself does.
///
/// # Arguments
///
/// * `raw` - The URL string to normalize
/// * `ignore_query` - Whether to drop the query string
///
/// # Returns
///
/// * `Ok(String)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse the URL
///
/// # Examples
///
/// ```
/// use crawl_audit::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM/Page/?a=1#top", true).unwrap();
/// assert_eq!(url, "https://example.com/Page");
/// ```
pub fn normalize_url(raw: &str, ignore_query: bool) -> Result<String, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    let host = url
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(raw.to_string()))?
        .to_lowercase();

    let mut normalized = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        normalized.push(':');
        normalized.push_str(&port.to_string());
    }
    normalized.push_str(normalize_path(url.path()));

    if !ignore_query {
        if let Some(query) = url.query().filter(|q| !q.is_empty()) {
            normalized.push('?');
            normalized.push_str(query);
        }
    }

    Ok(normalized)
}

/// Normalizes a URL, falling back to the raw string when it cannot be parsed
///
/// A single bad link must never halt a crawl, so callers on the hot path use
/// this instead of [`normalize_url`].
pub fn normalize_or_raw(raw: &str, ignore_query: bool) -> String {
    match normalize_url(raw, ignore_query) {
        Ok(normalized) => normalized,
        Err(e) => {
            tracing::debug!("Keeping unnormalized URL: {}", e);
            raw.to_string()
        }
    }
}

/// Removes trailing slashes, never reducing the path below `/`
fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
