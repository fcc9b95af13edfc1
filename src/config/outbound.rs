use serde::{Deserialize, Serialize};

// ============================================================================
// Outbound Enum
// ============================================================================

/// Canonical outbound configuration
///
/// One variant per supported proxy protocol. The `type` field of the JSON
/// form discriminates the variant and is always present.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    /// VMess outbound
    #[serde(rename = "vmess")]
    VMess(VMessOutbound),
    /// Trojan outbound
    Trojan(TrojanOutbound),
    /// VLESS outbound
    #[serde(rename = "vless")]
    VLess(VLessOutbound),
    /// Shadowsocks outbound
    Shadowsocks(ShadowsocksOutbound),
    /// WireGuard outbound
    #[serde(rename = "wireguard")]
    WireGuard(WireGuardOutbound),
    /// TUIC outbound
    #[serde(rename = "tuic")]
    Tuic(TuicOutbound),
    /// Hysteria outbound
    Hysteria(HysteriaOutbound),
}

impl Outbound {
    /// Returns the `type` text of this outbound
    pub fn kind(&self) -> &'static str {
        match self {
            Outbound::VMess(_) => "vmess",
            Outbound::Trojan(_) => "trojan",
            Outbound::VLess(_) => "vless",
            Outbound::Shadowsocks(_) => "shadowsocks",
            Outbound::WireGuard(_) => "wireguard",
            Outbound::Tuic(_) => "tuic",
            Outbound::Hysteria(_) => "hysteria",
        }
    }

    /// Returns the display tag (may be empty)
    pub fn tag(&self) -> &str {
        match self {
            Outbound::VMess(o) => &o.tag,
            Outbound::Trojan(o) => &o.tag,
            Outbound::VLess(o) => &o.tag,
            Outbound::Shadowsocks(o) => &o.tag,
            Outbound::WireGuard(o) => &o.tag,
            Outbound::Tuic(o) => &o.tag,
            Outbound::Hysteria(o) => &o.tag,
        }
    }

    /// Returns the `(server, server_port)` endpoint
    pub fn endpoint(&self) -> (&str, &str) {
        match self {
            Outbound::VMess(o) => (&o.server, &o.server_port),
            Outbound::Trojan(o) => (&o.server, &o.server_port),
            Outbound::VLess(o) => (&o.server, &o.server_port),
            Outbound::Shadowsocks(o) => (&o.server, &o.server_port),
            Outbound::WireGuard(o) => (&o.server, &o.server_port),
            Outbound::Tuic(o) => (&o.server, &o.server_port),
            Outbound::Hysteria(o) => (&o.server, &o.server_port),
        }
    }

    /// Serialize the outbound to a JSON object string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the outbound to a pretty-printed JSON object string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Serialize a list of outbounds to a JSON array string
pub fn to_json_array(outbounds: &[Outbound]) -> Result<String, serde_json::Error> {
    serde_json::to_string(outbounds)
}

// ============================================================================
// Common Types
// ============================================================================

/// Stream transport layered under a protocol (e.g. websocket)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Transport {
    /// Transport type, e.g. `ws`
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Request path
    #[serde(default)]
    pub path: String,

    /// Host header
    #[serde(default)]
    pub host: String,
}

/// Outbound TLS block
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OutboundTls {
    /// Enable TLS
    #[serde(default)]
    pub enabled: bool,

    /// Server name used for SNI
    #[serde(default)]
    pub server_name: String,

    /// ALPN protocols, only emitted by the QUIC based protocols
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpn: Option<Vec<String>>,
}

// ============================================================================
// Outbound Types
// ============================================================================

/// VMess outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct VMessOutbound {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub server_port: String,
    #[serde(default)]
    pub uuid: String,
    /// Encryption method
    #[serde(default)]
    pub security: String,
    #[serde(default)]
    pub alter_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTls>,
}

/// Trojan outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TrojanOutbound {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub server_port: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTls>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,
}

/// VLESS outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct VLessOutbound {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub server_port: String,
    #[serde(default)]
    pub uuid: String,
    /// Flow control, empty when unset
    #[serde(default)]
    pub flow: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTls>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,
}

/// Shadowsocks outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ShadowsocksOutbound {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub server_port: String,
    /// Cipher method
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub password: String,
}

/// WireGuard outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WireGuardOutbound {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub server_port: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub peer_public_key: String,
    /// Interface addresses in CIDR form
    #[serde(default)]
    pub local_address: Vec<String>,
}

/// TUIC outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TuicOutbound {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub server_port: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTls>,
}

/// Hysteria outbound configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct HysteriaOutbound {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub server_port: String,
    /// Authentication string
    #[serde(default)]
    pub auth_str: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<OutboundTls>,
    /// Obfuscation password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs: Option<String>,
}
