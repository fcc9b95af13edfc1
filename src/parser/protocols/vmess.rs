//! VMess protocol parser
//!
//! VMess links carry a Base64 encoded JSON object:
//! vmess://BASE64({ "v": "2", "ps": "name", "add": "host", "port": "443", ... })

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Deserializer};
use tracing::trace;

use crate::builder::{VMessParams, build_vmess};
use crate::config::outbound::Outbound;
use crate::parser::base64::decode_base64_str;

use super::ProtocolParser;

// ============================================================================
// VMess Parser
// ============================================================================

/// Parser for VMess (vmess://) URIs
pub struct VMessParser;

/// VMess link JSON structure. Every field is optional and defaults to empty.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct VMessJson {
    /// Remark/name
    #[serde(deserialize_with = "text")]
    ps: String,
    /// Server address
    #[serde(deserialize_with = "text")]
    add: String,
    /// Server port (string or number)
    #[serde(deserialize_with = "text_or_number")]
    port: String,
    /// UUID
    #[serde(deserialize_with = "text")]
    id: String,
    /// Alter ID (string or number)
    #[serde(deserialize_with = "text_or_number")]
    aid: String,
    /// Security/encryption method
    #[serde(deserialize_with = "text")]
    scy: String,
    /// Network type (tcp, ws, etc.)
    #[serde(deserialize_with = "text")]
    net: String,
    /// Transport path
    #[serde(deserialize_with = "text")]
    path: String,
    /// Transport host
    #[serde(deserialize_with = "text")]
    host: String,
    /// TLS setting, `tls` enables it
    #[serde(deserialize_with = "text")]
    tls: String,
    /// SNI
    #[serde(deserialize_with = "text")]
    sni: String,
}

impl ProtocolParser for VMessParser {
    fn scheme(&self) -> &str {
        "vmess"
    }

    fn parse(&self, uri: &str) -> Result<Outbound> {
        trace!("Parsing VMess URI");

        let encoded = uri
            .strip_prefix("vmess://")
            .ok_or_else(|| anyhow!("Invalid VMess URI: missing vmess:// prefix"))?;

        let decoded = decode_base64_str(encoded).context("Failed to decode VMess URI")?;
        trace!("Decoded VMess JSON: {}", decoded);

        let value: serde_json::Value =
            serde_json::from_str(&decoded).context("Failed to parse VMess JSON")?;
        if !value.is_object() {
            bail!("VMess JSON is not an object");
        }
        let json: VMessJson = serde_json::from_value(value).context("Invalid VMess JSON fields")?;

        trace!(
            "VMess config: server={}:{}, net={:?}, tls={:?}",
            json.add, json.port, json.net, json.tls
        );

        Ok(build_vmess(VMessParams {
            server: json.add,
            port: json.port,
            uuid: json.id,
            security: json.scy,
            alter_id: json.aid,
            network: json.net,
            path: json.path,
            host: json.host,
            tls: json.tls,
            sni: json.sni,
            tag: json.ps,
        }))
    }
}

// ============================================================================
// Deserialization Helpers
// ============================================================================

/// String field that also accepts `null`
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// String field that also accepts a JSON number, rendered as decimal text
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextValue {
        Text(String),
        Number(serde_json::Number),
    }

    match Option::<TextValue>::deserialize(deserializer)? {
        Some(TextValue::Text(s)) => Ok(s),
        Some(TextValue::Number(n)) => Ok(n.to_string()),
        None => Ok(String::new()),
    }
}
