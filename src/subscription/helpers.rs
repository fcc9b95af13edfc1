//! Subscription utility functions
//!
//! Path expansion and the HTTP fetch used to download subscription bodies
//! and remote settings files.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::get_version;

/// Fixed timeout for a single subscription fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Path Utilities
// ============================================================================

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &str) -> String {
    if (path.starts_with("~/") || path == "~")
        && let Some(home) = dirs_home()
    {
        return path.replacen('~', &home, 1);
    }
    path.to_string()
}

/// Get home directory path
pub fn dirs_home() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok()
    }
}

/// Returns true when the source should be fetched rather than read from disk
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

// ============================================================================
// HTTP Utilities
// ============================================================================

/// Fetch the full response body from a URL
///
/// One request with a bounded timeout. Transport failures, timeouts and
/// non-success statuses are all returned as a single error; a partial body
/// is never returned and the request is not retried.
pub async fn fetch_body(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    debug!("Fetching URL: {} (timeout {:?})", url, timeout);

    let client = reqwest::Client::builder()
        .user_agent(format!("singlink/{}", get_version()))
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch URL: {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("HTTP request failed with status {}: {}", status, url);
    }

    let body = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read response body from: {}", url))?;

    debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body.to_vec())
}

/// Fetch text content from a URL
pub async fn fetch_text(url: &str, timeout: Duration) -> Result<String> {
    let body = fetch_body(url, timeout).await?;
    String::from_utf8(body).with_context(|| format!("Response from {} is not valid UTF-8", url))
}
