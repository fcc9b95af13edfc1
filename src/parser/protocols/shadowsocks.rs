//! Shadowsocks protocol parser
//!
//! Format: ss://BASE64(method:password)@host:port#tag

use anyhow::{Context, Result, bail};
use tracing::trace;

use crate::builder::{ShadowsocksParams, build_shadowsocks};
use crate::config::outbound::Outbound;
use crate::parser::base64::decode_base64_str;

use super::ProtocolParser;
use super::link::parse_link;

// ============================================================================
// Shadowsocks Parser
// ============================================================================

/// Parser for Shadowsocks (ss://) URIs
///
/// The userinfo must be standard Base64 of `method:password` with exactly one
/// colon. Passwords containing a colon are not representable.
pub struct ShadowsocksParser;

impl ProtocolParser for ShadowsocksParser {
    fn scheme(&self) -> &str {
        "ss"
    }

    fn parse(&self, uri: &str) -> Result<Outbound> {
        trace!("Parsing Shadowsocks URI");
        let link = parse_link(uri).context("Failed to parse Shadowsocks URI")?;

        let userinfo = decode_base64_str(&link.userinfo())
            .context("Shadowsocks userinfo is not valid Base64")?;
        let (method, password) = split_credentials(&userinfo)?;

        Ok(build_shadowsocks(ShadowsocksParams {
            server: link.host,
            port: link.port,
            method: method.to_string(),
            password: password.to_string(),
            tag: link.fragment,
        }))
    }
}

/// Splits `method:password`, rejecting any other number of colons
fn split_credentials(userinfo: &str) -> Result<(&str, &str)> {
    let parts: Vec<&str> = userinfo.split(':').collect();
    match parts.as_slice() {
        [method, password] => Ok((*method, *password)),
        _ => bail!(
            "Invalid Shadowsocks userinfo: expected method:password, got {} parts",
            parts.len()
        ),
    }
}
