//! Subscription fetching module
//!
//! Downloads subscription bodies and feeds them through the parser, and
//! assembles the engine document for a set of configured subscriptions.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::outbound::{Outbound, to_json_array};
use crate::config::{EngineConfig, EngineLog};
use crate::parser::parse_subscription;

pub mod helpers;
pub mod settings;

pub use helpers::{DEFAULT_FETCH_TIMEOUT, expand_tilde, fetch_body, fetch_text, is_remote};
pub use settings::{Settings, Subscription};

/// Fetch a subscription and parse it into outbounds
pub async fn fetch_subscription(url: &str, timeout: Duration) -> Result<Vec<Outbound>> {
    let body = fetch_body(url, timeout).await?;
    let outbounds = parse_subscription(&body);
    info!("Parsed {} outbounds from {}", outbounds.len(), url);
    Ok(outbounds)
}

/// Fetch a subscription and serialize the parsed outbounds as a JSON array
pub async fn fetch_subscription_json(url: &str, timeout: Duration) -> Result<String> {
    let outbounds = fetch_subscription(url, timeout).await?;
    to_json_array(&outbounds).context("Failed to serialize outbounds")
}

/// Load a subscription body from a local file or a URL and parse it
pub async fn load_subscription(source: &str, timeout: Duration) -> Result<Vec<Outbound>> {
    if is_remote(source) {
        return fetch_subscription(source, timeout).await;
    }

    let path = expand_tilde(source);
    let body = tokio::fs::read(Path::new(&path))
        .await
        .with_context(|| format!("Failed to read subscription from {:?}", path))?;
    Ok(parse_subscription(&body))
}

/// Fetch every configured subscription and assemble the engine document
///
/// A subscription that fails to download is skipped with a warning so one
/// unreachable provider does not block the others. Outbounds keep the order
/// of the subscriptions and of the links inside each one.
pub async fn build_engine_config(settings: &Settings) -> Result<EngineConfig> {
    let mut outbounds = Vec::new();
    let mut fetched = 0usize;

    for subscription in &settings.subscriptions {
        info!("Fetching subscription '{}'", subscription.name);
        match fetch_subscription(&subscription.url, settings.timeout()).await {
            Ok(list) => {
                fetched += 1;
                outbounds.extend(list);
            }
            Err(e) => warn!("Skipping subscription '{}': {:#}", subscription.name, e),
        }
    }

    if fetched == 0 {
        anyhow::bail!("None of the {} subscriptions could be fetched", settings.subscriptions.len());
    }

    Ok(EngineConfig::builder()
        .log(EngineLog {
            level: settings.log_level,
            ..Default::default()
        })
        .outbounds(outbounds)
        .build())
}

/// Write the engine document to a file, creating parent directories
pub async fn write_engine_config(config: &EngineConfig, output: &str) -> Result<()> {
    let path = expand_tilde(output);
    let path = Path::new(&path);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let json = config
        .to_json_pretty()
        .context("Failed to serialize engine config")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write engine config to {:?}", path))?;

    info!("Wrote {} outbounds to {:?}", config.outbounds.len(), path);
    Ok(())
}
