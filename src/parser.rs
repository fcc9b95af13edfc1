//! Subscription and Protocol Parsing Module
//!
//! This module provides functionality for:
//! - Normalizing a fetched subscription body (whole-body Base64 or plain text)
//!   into candidate link lines
//! - Parsing protocol links (vmess://, trojan://, vless://, ss://) into
//!   canonical outbounds, dispatching on the scheme prefix
//!
//! Parsing is lenient: a line that cannot be decoded is dropped and the rest
//! of the subscription is still parsed.

pub mod base64;
pub mod protocols;

pub use self::base64::{decode_base64, normalize_body};
pub use protocols::{ProtocolParser, ProtocolRegistry, extract_scheme};

use std::sync::LazyLock;

use tracing::debug;

use crate::config::outbound::Outbound;

static BUILTIN_REGISTRY: LazyLock<ProtocolRegistry> =
    LazyLock::new(ProtocolRegistry::with_builtin_parsers);

/// Parses a raw subscription body into outbounds, preserving link order
pub fn parse_subscription(body: &[u8]) -> Vec<Outbound> {
    parse_subscription_with_registry(body, &BUILTIN_REGISTRY)
}

/// Parses a raw subscription body using a custom registry
pub fn parse_subscription_with_registry(body: &[u8], registry: &ProtocolRegistry) -> Vec<Outbound> {
    let lines = normalize_body(body);
    debug!("Subscription body yielded {} candidate lines", lines.len());
    registry.parse_lines(lines)
}

/// Parses already split link lines into outbounds
///
/// Lines are trimmed, and blank lines and `#` comments are skipped, the same
/// as for a fetched body.
pub fn parse_links<I, S>(lines: I) -> Vec<Outbound>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<String> = lines
        .into_iter()
        .map(|line| line.as_ref().trim().to_string())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    BUILTIN_REGISTRY.parse_lines(lines)
}

/// Parses a single link
pub fn parse_link(uri: &str) -> anyhow::Result<Outbound> {
    BUILTIN_REGISTRY.parse_uri(uri.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::base64::Engine;
    use ::base64::engine::general_purpose::STANDARD;

    const SS_LINK: &str = "ss://bm9uZTpwYXNz@example.com:8388#myserver";
    const TROJAN_LINK: &str = "trojan://pw@example.com:443?sni=example.com#trojan";

    #[test]
    fn test_parse_subscription_plain() {
        let body = format!("{}\n{}\n", SS_LINK, TROJAN_LINK);
        let outbounds = parse_subscription(body.as_bytes());
        assert_eq!(outbounds.len(), 2);
        assert_eq!(outbounds[0].kind(), "shadowsocks");
        assert_eq!(outbounds[1].kind(), "trojan");
    }

    #[test]
    fn test_parse_subscription_base64() {
        let body = STANDARD.encode(format!("{}\n{}", TROJAN_LINK, SS_LINK));
        let outbounds = parse_subscription(body.as_bytes());
        let kinds: Vec<&str> = outbounds.iter().map(|o| o.kind()).collect();
        assert_eq!(kinds, vec!["trojan", "shadowsocks"]);
    }

    #[test]
    fn test_parse_subscription_garbage_base64_yields_nothing() {
        let outbounds = parse_subscription(b"QUJDREVGR0g=");
        assert!(outbounds.is_empty());
    }

    #[test]
    fn test_parse_subscription_bad_line_does_not_abort() {
        let body = format!(
            "ss://invalidbase64!!@host:1234#x\nhttp://example.com\n{}",
            SS_LINK
        );
        let outbounds = parse_subscription(body.as_bytes());
        assert_eq!(outbounds.len(), 1);
        assert_eq!(outbounds[0].tag(), "myserver");
    }

    #[test]
    fn test_parse_links_skips_comments_and_blanks() {
        let outbounds = parse_links(["# header", "", "  ", SS_LINK, "# trailer"]);
        assert_eq!(outbounds.len(), 1);
    }

    #[test]
    fn test_parse_links_trims() {
        let padded = format!("   {}\t", TROJAN_LINK);
        let outbounds = parse_links(vec![padded]);
        assert_eq!(outbounds[0].tag(), "trojan");
    }

    #[test]
    fn test_parse_link_single() {
        assert_eq!(parse_link(SS_LINK).unwrap().kind(), "shadowsocks");
        assert!(parse_link("ssr://abc").is_err());
    }
}
