//! Trojan protocol parser
//!
//! Format: trojan://password@host:port?sni=..&type=ws&host=..&path=..#tag

use anyhow::{Context, Result};
use tracing::trace;

use crate::builder::{TrojanParams, build_trojan};
use crate::config::outbound::Outbound;

use super::ProtocolParser;
use super::link::parse_link;

// ============================================================================
// Trojan Parser
// ============================================================================

/// Parser for Trojan (trojan://) URIs. TLS is always enabled.
pub struct TrojanParser;

impl ProtocolParser for TrojanParser {
    fn scheme(&self) -> &str {
        "trojan"
    }

    fn parse(&self, uri: &str) -> Result<Outbound> {
        trace!("Parsing Trojan URI");
        let link = parse_link(uri).context("Failed to parse Trojan URI")?;

        Ok(build_trojan(TrojanParams {
            sni: link.param("sni"),
            network: link.param("type"),
            path: link.param("path"),
            host: link.param("host"),
            server: link.host,
            port: link.port,
            password: link.username,
            tag: link.fragment,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::outbound::Transport;

    #[test]
    fn test_trojan_basic() {
        let parser = TrojanParser;
        let uri = "trojan://password@example.com:443?sni=example.com#test-node";
        let outbound = parser.parse(uri).unwrap();

        if let Outbound::Trojan(trojan) = outbound {
            assert_eq!(trojan.tag, "test-node");
            assert_eq!(trojan.server, "example.com");
            assert_eq!(trojan.server_port, "443");
            assert_eq!(trojan.password, "password");
            let tls = trojan.tls.unwrap();
            assert!(tls.enabled);
            assert_eq!(tls.server_name, "example.com");
            assert!(trojan.transport.is_none());
        } else {
            panic!("Expected Trojan outbound");
        }
    }

    #[test]
    fn test_trojan_with_websocket() {
        let parser = TrojanParser;
        let uri = "trojan://password@example.com:443?type=ws&path=/ws&host=ws.example.com#ws-node";
        let outbound = parser.parse(uri).unwrap();

        if let Outbound::Trojan(trojan) = outbound {
            assert_eq!(
                trojan.transport,
                Some(Transport {
                    kind: "ws".to_string(),
                    path: "/ws".to_string(),
                    host: "ws.example.com".to_string(),
                })
            );
        } else {
            panic!("Expected Trojan outbound");
        }
    }

    #[test]
    fn test_trojan_grpc_has_no_transport() {
        let parser = TrojanParser;
        let uri = "trojan://password@example.com:443?type=grpc&serviceName=svc#grpc-node";
        let outbound = parser.parse(uri).unwrap();

        if let Outbound::Trojan(trojan) = outbound {
            assert!(trojan.transport.is_none());
        } else {
            panic!("Expected Trojan outbound");
        }
    }

    #[test]
    fn test_trojan_tls_enabled_even_with_security_none() {
        let parser = TrojanParser;
        let uri = "trojan://password@example.com:8080?security=none#no-tls-node";
        let outbound = parser.parse(uri).unwrap();

        if let Outbound::Trojan(trojan) = outbound {
            let tls = trojan.tls.unwrap();
            assert!(tls.enabled);
            assert_eq!(tls.server_name, "");
        } else {
            panic!("Expected Trojan outbound");
        }
    }

    #[test]
    fn test_trojan_no_tag_is_empty() {
        let outbound = TrojanParser.parse("trojan://password@example.com:443").unwrap();
        assert_eq!(outbound.tag(), "");
    }

    #[test]
    fn test_trojan_no_port_is_empty() {
        let outbound = TrojanParser.parse("trojan://password@example.com").unwrap();
        assert_eq!(outbound.endpoint(), ("example.com", ""));
    }

    #[test]
    fn test_trojan_url_encoded_password() {
        let outbound = TrojanParser
            .parse("trojan://pass%40word%21@example.com:443#encoded-node")
            .unwrap();

        if let Outbound::Trojan(trojan) = outbound {
            assert_eq!(trojan.password, "pass@word!");
        } else {
            panic!("Expected Trojan outbound");
        }
    }

    #[test]
    fn test_trojan_url_encoded_tag() {
        let outbound = TrojanParser
            .parse("trojan://password@example.com:443#%F0%9F%87%BA%F0%9F%87%B8%20US%20Server")
            .unwrap();
        assert_eq!(outbound.tag(), "🇺🇸 US Server");
    }

    #[test]
    fn test_trojan_ipv6_host() {
        let outbound = TrojanParser.parse("trojan://password@[::1]:443#ipv6-node").unwrap();
        assert_eq!(outbound.endpoint(), ("::1", "443"));
    }

    #[test]
    fn test_trojan_invalid_uri() {
        assert!(TrojanParser.parse("trojan://pw@example.com:port").is_err());
        assert!(TrojanParser.parse("not-a-uri").is_err());
    }

    #[test]
    fn test_scheme() {
        assert_eq!(TrojanParser.scheme(), "trojan");
    }

    #[test]
    fn test_can_parse() {
        let parser = TrojanParser;
        assert!(parser.can_parse("trojan://password@host:port"));
        assert!(!parser.can_parse("vmess://abc"));
    }
}
