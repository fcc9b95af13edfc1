use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::LogLevel;

use super::helpers::{DEFAULT_FETCH_TIMEOUT, expand_tilde, fetch_text, is_remote};

// ============================================================================
// Settings Types
// ============================================================================

/// A named subscription source
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Subscription {
    /// Name/identifier for this subscription
    pub name: String,

    /// URL to fetch the subscription from
    pub url: String,
}

/// Settings parsed from a TOML file
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Settings {
    /// Output file path for the engine document, default "./out/config.json"
    #[serde(default = "default_output")]
    pub output: String,

    /// Fetch timeout in seconds, default 30
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: u64,

    /// Engine log level
    #[serde(default)]
    pub log_level: Option<LogLevel>,

    /// Engine executable, default "sing-box"
    #[serde(default = "default_engine_binary")]
    pub engine_binary: String,

    /// Subscriptions list (required - at least one)
    pub subscriptions: Vec<Subscription>,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).context("Failed to parse settings TOML")?;

        if settings.subscriptions.is_empty() {
            bail!("At least one subscription is required");
        }
        if settings.fetch_timeout == 0 {
            bail!("fetch_timeout must be greater than zero");
        }

        Ok(settings)
    }

    /// Load settings from a file path
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        Self::from_toml(&content)
    }

    /// Load settings from a URL
    pub async fn from_url(url: &str) -> Result<Self> {
        let content = fetch_text(url, DEFAULT_FETCH_TIMEOUT).await?;
        Self::from_toml(&content)
    }

    /// Load settings from a file path or URL
    pub async fn load(path_or_url: &str) -> Result<Self> {
        if is_remote(path_or_url) {
            Self::from_url(path_or_url).await
        } else {
            let expanded = expand_tilde(path_or_url);
            Self::from_file(Path::new(&expanded)).await
        }
    }

    /// Fetch timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

fn default_output() -> String {
    "./out/config.json".to_string()
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_secs()
}

fn default_engine_binary() -> String {
    "sing-box".to_string()
}
