//! VLESS protocol parser
//!
//! Format: vless://uuid@host:port?security=tls&sni=..&type=ws&host=..&path=..#tag

use anyhow::{Context, Result};
use tracing::trace;

use crate::builder::{VLessParams, build_vless};
use crate::config::outbound::Outbound;

use super::ProtocolParser;
use super::link::parse_link;

// ============================================================================
// VLESS Parser
// ============================================================================

/// Parser for VLESS (vless://) URIs
pub struct VLessParser;

impl ProtocolParser for VLessParser {
    fn scheme(&self) -> &str {
        "vless"
    }

    fn parse(&self, uri: &str) -> Result<Outbound> {
        trace!("Parsing VLESS URI");
        let link = parse_link(uri).context("Failed to parse VLESS URI")?;

        Ok(build_vless(VLessParams {
            // The link convention handled here carries no flow
            flow: String::new(),
            security: link.param("security"),
            sni: link.param("sni"),
            network: link.param("type"),
            path: link.param("path"),
            host: link.param("host"),
            server: link.host,
            port: link.port,
            uuid: link.username,
            tag: link.fragment,
        }))
    }
}
