//! Protocol parsers module
//!
//! This module contains the scheme decoders for proxy links. Each decoder
//! implements the `ProtocolParser` trait and turns one link into a canonical
//! outbound or an error.

pub mod link;
mod shadowsocks;
mod trojan;
mod vless;
mod vmess;

pub use shadowsocks::ShadowsocksParser;
pub use trojan::TrojanParser;
pub use vless::VLessParser;
pub use vmess::VMessParser;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use tracing::{debug, warn};

use crate::config::outbound::Outbound;

// ============================================================================
// Protocol Parser Trait
// ============================================================================

/// Trait for parsing individual protocol URIs
pub trait ProtocolParser: Send + Sync {
    /// Returns the protocol scheme this parser handles (e.g., "ss", "vmess")
    fn scheme(&self) -> &str;

    /// Parses a URI string into an Outbound configuration
    fn parse(&self, uri: &str) -> Result<Outbound>;

    /// Checks if this parser can handle the given URI
    fn can_parse(&self, uri: &str) -> bool {
        uri.starts_with(&format!("{}://", self.scheme()))
    }
}

// ============================================================================
// Protocol Registry
// ============================================================================

/// Registry for protocol parsers with dynamic dispatch
///
/// Immutable once built, so one registry can serve concurrent callers.
#[derive(Default)]
pub struct ProtocolRegistry {
    parsers: HashMap<String, Arc<dyn ProtocolParser>>,
}

impl ProtocolRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Creates a registry with all built-in parsers registered
    pub fn with_builtin_parsers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(VMessParser));
        registry.register(Arc::new(TrojanParser));
        registry.register(Arc::new(VLessParser));
        registry.register(Arc::new(ShadowsocksParser));
        registry
    }

    /// Registers a protocol parser, replacing any parser for the same scheme
    pub fn register(&mut self, parser: Arc<dyn ProtocolParser>) {
        self.parsers.insert(parser.scheme().to_string(), parser);
    }

    /// Gets a parser for the given scheme
    pub fn get(&self, scheme: &str) -> Option<&Arc<dyn ProtocolParser>> {
        self.parsers.get(scheme)
    }

    /// Parses a URI using the appropriate parser
    pub fn parse_uri(&self, uri: &str) -> Result<Outbound> {
        let scheme = extract_scheme(uri)?;

        let parser = self
            .parsers
            .get(scheme)
            .ok_or_else(|| anyhow!("No parser registered for scheme: {}", scheme))?;

        let result = parser.parse(uri);
        match &result {
            Ok(outbound) => {
                debug!(
                    "Successfully parsed {} URI -> outbound '{}'",
                    scheme,
                    outbound.tag()
                );
            }
            Err(e) => {
                debug!("Failed to parse {} URI: {:#}", scheme, e);
            }
        }
        result
    }

    /// Parses link lines, keeping successes in order and dropping failures
    ///
    /// Lines with an unregistered scheme are skipped silently. Lines whose
    /// decoder fails are logged and skipped. A failure never stops the
    /// remaining lines from being parsed.
    pub fn parse_lines<I, S>(&self, lines: I) -> Vec<Outbound>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut outbounds = Vec::new();
        let mut total = 0usize;
        let mut unsupported = 0usize;

        for line in lines {
            let line = line.as_ref();
            total += 1;

            let known = extract_scheme(line)
                .map(|scheme| self.parsers.contains_key(scheme))
                .unwrap_or(false);
            if !known {
                unsupported += 1;
                continue;
            }

            match self.parse_uri(line) {
                Ok(outbound) => outbounds.push(outbound),
                Err(e) => warn!("Dropping unparsable link: {:#}", e),
            }
        }

        let failed = total - unsupported - outbounds.len();
        debug!(
            "Link parsing complete: {} total, {} successful, {} failed, {} unsupported",
            total,
            outbounds.len(),
            failed,
            unsupported
        );

        outbounds
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extracts the scheme from a URI
pub fn extract_scheme(uri: &str) -> Result<&str> {
    match uri.split_once("://") {
        Some((scheme, _)) if !scheme.is_empty() => Ok(scheme),
        Some(_) => bail!("Invalid URI: missing scheme"),
        None => bail!("Invalid URI: missing scheme separator ://"),
    }
}
