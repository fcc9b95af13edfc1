//! Canonical config builders
//!
//! One constructor per outbound type. Every parameter is plain text, exactly
//! as a form or command line would supply it, and is passed through without
//! semantic validation. The scheme decoders extract their fields into the
//! same parameter structs and call these builders, so a link and the
//! equivalent form input always produce the same outbound.

use clap::{Args, Subcommand};
use serde::Deserialize;

use crate::config::outbound::{
    HysteriaOutbound, Outbound, OutboundTls, ShadowsocksOutbound, Transport, TrojanOutbound,
    TuicOutbound, VLessOutbound, VMessOutbound, WireGuardOutbound,
};

// ============================================================================
// Parameters
// ============================================================================

/// VMess builder parameters
#[derive(Args, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct VMessParams {
    #[arg(long, default_value = "")]
    pub server: String,
    #[arg(long, default_value = "")]
    pub port: String,
    #[arg(long, default_value = "")]
    pub uuid: String,
    /// Encryption method, e.g. `auto`
    #[arg(long, default_value = "")]
    pub security: String,
    #[arg(long, default_value = "")]
    pub alter_id: String,
    /// Transport type, always emitted for VMess
    #[arg(long, default_value = "")]
    pub network: String,
    #[arg(long, default_value = "")]
    pub path: String,
    #[arg(long, default_value = "")]
    pub host: String,
    /// TLS is enabled only when this is exactly `tls`
    #[arg(long, default_value = "")]
    pub tls: String,
    #[arg(long, default_value = "")]
    pub sni: String,
    #[arg(long, default_value = "")]
    pub tag: String,
}

/// Trojan builder parameters
#[derive(Args, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct TrojanParams {
    #[arg(long, default_value = "")]
    pub server: String,
    #[arg(long, default_value = "")]
    pub port: String,
    #[arg(long, default_value = "")]
    pub password: String,
    #[arg(long, default_value = "")]
    pub sni: String,
    /// Transport type, only `ws` emits a transport block
    #[arg(long, default_value = "")]
    pub network: String,
    #[arg(long, default_value = "")]
    pub path: String,
    #[arg(long, default_value = "")]
    pub host: String,
    #[arg(long, default_value = "")]
    pub tag: String,
}

/// VLESS builder parameters
#[derive(Args, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct VLessParams {
    #[arg(long, default_value = "")]
    pub server: String,
    #[arg(long, default_value = "")]
    pub port: String,
    #[arg(long, default_value = "")]
    pub uuid: String,
    #[arg(long, default_value = "")]
    pub flow: String,
    /// TLS is enabled only when this is exactly `tls`
    #[arg(long, default_value = "")]
    pub security: String,
    #[arg(long, default_value = "")]
    pub sni: String,
    /// Transport type, only `ws` emits a transport block
    #[arg(long, default_value = "")]
    pub network: String,
    #[arg(long, default_value = "")]
    pub path: String,
    #[arg(long, default_value = "")]
    pub host: String,
    #[arg(long, default_value = "")]
    pub tag: String,
}

/// Shadowsocks builder parameters
#[derive(Args, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ShadowsocksParams {
    #[arg(long, default_value = "")]
    pub server: String,
    #[arg(long, default_value = "")]
    pub port: String,
    #[arg(long, default_value = "")]
    pub method: String,
    #[arg(long, default_value = "")]
    pub password: String,
    #[arg(long, default_value = "")]
    pub tag: String,
}

/// WireGuard builder parameters
#[derive(Args, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct WireGuardParams {
    #[arg(long, default_value = "")]
    pub server: String,
    #[arg(long, default_value = "")]
    pub port: String,
    #[arg(long, default_value = "")]
    pub private_key: String,
    #[arg(long, default_value = "")]
    pub peer_public_key: String,
    /// Comma separated interface addresses
    #[arg(long, default_value = "")]
    pub local_address: String,
    #[arg(long, default_value = "")]
    pub tag: String,
}

/// TUIC builder parameters
#[derive(Args, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct TuicParams {
    #[arg(long, default_value = "")]
    pub server: String,
    #[arg(long, default_value = "")]
    pub port: String,
    #[arg(long, default_value = "")]
    pub uuid: String,
    #[arg(long, default_value = "")]
    pub password: String,
    /// Comma separated ALPN protocols
    #[arg(long, default_value = "")]
    pub alpn: String,
    #[arg(long, default_value = "")]
    pub sni: String,
    #[arg(long, default_value = "")]
    pub tag: String,
}

/// Hysteria builder parameters
#[derive(Args, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct HysteriaParams {
    #[arg(long, default_value = "")]
    pub server: String,
    #[arg(long, default_value = "")]
    pub port: String,
    #[arg(long, default_value = "")]
    pub auth: String,
    /// Comma separated ALPN protocols
    #[arg(long, default_value = "")]
    pub alpn: String,
    #[arg(long, default_value = "")]
    pub sni: String,
    /// Obfuscation password, omitted when empty
    #[arg(long, default_value = "")]
    pub obfs: String,
    #[arg(long, default_value = "")]
    pub tag: String,
}

// ============================================================================
// Builders
// ============================================================================

/// Builds a VMess outbound. Transport and TLS blocks are always present.
pub fn build_vmess(params: VMessParams) -> Outbound {
    Outbound::VMess(VMessOutbound {
        tag: params.tag,
        server: params.server,
        server_port: params.port,
        uuid: params.uuid,
        security: params.security,
        alter_id: params.alter_id,
        transport: Some(Transport {
            kind: params.network,
            path: params.path,
            host: params.host,
        }),
        tls: Some(OutboundTls {
            enabled: params.tls == "tls",
            server_name: params.sni,
            alpn: None,
        }),
    })
}

/// Builds a Trojan outbound. TLS is always enabled.
pub fn build_trojan(params: TrojanParams) -> Outbound {
    Outbound::Trojan(TrojanOutbound {
        tag: params.tag,
        server: params.server,
        server_port: params.port,
        password: params.password,
        tls: Some(OutboundTls {
            enabled: true,
            server_name: params.sni,
            alpn: None,
        }),
        transport: websocket_transport(&params.network, params.path, params.host),
    })
}

/// Builds a VLESS outbound
pub fn build_vless(params: VLessParams) -> Outbound {
    let tls = (params.security == "tls").then(|| OutboundTls {
        enabled: true,
        server_name: params.sni,
        alpn: None,
    });

    Outbound::VLess(VLessOutbound {
        tag: params.tag,
        server: params.server,
        server_port: params.port,
        uuid: params.uuid,
        flow: params.flow,
        tls,
        transport: websocket_transport(&params.network, params.path, params.host),
    })
}

/// Builds a Shadowsocks outbound
pub fn build_shadowsocks(params: ShadowsocksParams) -> Outbound {
    Outbound::Shadowsocks(ShadowsocksOutbound {
        tag: params.tag,
        server: params.server,
        server_port: params.port,
        method: params.method,
        password: params.password,
    })
}

/// Builds a WireGuard outbound
pub fn build_wireguard(params: WireGuardParams) -> Outbound {
    Outbound::WireGuard(WireGuardOutbound {
        tag: params.tag,
        server: params.server,
        server_port: params.port,
        private_key: params.private_key,
        peer_public_key: params.peer_public_key,
        local_address: split_list(&params.local_address),
    })
}

/// Builds a TUIC outbound. TLS is always enabled.
pub fn build_tuic(params: TuicParams) -> Outbound {
    Outbound::Tuic(TuicOutbound {
        tag: params.tag,
        server: params.server,
        server_port: params.port,
        uuid: params.uuid,
        password: params.password,
        tls: Some(OutboundTls {
            enabled: true,
            server_name: params.sni,
            alpn: Some(split_list(&params.alpn)),
        }),
    })
}

/// Builds a Hysteria outbound. TLS is always enabled.
pub fn build_hysteria(params: HysteriaParams) -> Outbound {
    Outbound::Hysteria(HysteriaOutbound {
        tag: params.tag,
        server: params.server,
        server_port: params.port,
        auth_str: params.auth,
        tls: Some(OutboundTls {
            enabled: true,
            server_name: params.sni,
            alpn: Some(split_list(&params.alpn)),
        }),
        obfs: (!params.obfs.is_empty()).then_some(params.obfs),
    })
}

/// Websocket is the only transport carried through; anything else means the
/// protocol's default stream.
fn websocket_transport(network: &str, path: String, host: String) -> Option<Transport> {
    (network == "ws").then(|| Transport {
        kind: "ws".to_string(),
        path,
        host,
    })
}

/// Splits a comma separated list, dropping empty items
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Build Request
// ============================================================================

/// A builder call selected by outbound type
///
/// Deserializes from a flat JSON object whose `type` field names the
/// protocol, and doubles as the `build` subcommand of the CLI.
#[derive(Subcommand, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BuildRequest {
    /// Build a VMess outbound
    #[command(name = "vmess")]
    #[serde(rename = "vmess")]
    VMess(VMessParams),
    /// Build a Trojan outbound
    #[command(name = "trojan")]
    Trojan(TrojanParams),
    /// Build a VLESS outbound
    #[command(name = "vless")]
    #[serde(rename = "vless")]
    VLess(VLessParams),
    /// Build a Shadowsocks outbound
    #[command(name = "shadowsocks")]
    Shadowsocks(ShadowsocksParams),
    /// Build a WireGuard outbound
    #[command(name = "wireguard")]
    #[serde(rename = "wireguard")]
    WireGuard(WireGuardParams),
    /// Build a TUIC outbound
    #[command(name = "tuic")]
    Tuic(TuicParams),
    /// Build a Hysteria outbound
    #[command(name = "hysteria")]
    Hysteria(HysteriaParams),
}

impl BuildRequest {
    /// Runs the matching builder
    pub fn build(self) -> Outbound {
        match self {
            BuildRequest::VMess(p) => build_vmess(p),
            BuildRequest::Trojan(p) => build_trojan(p),
            BuildRequest::VLess(p) => build_vless(p),
            BuildRequest::Shadowsocks(p) => build_shadowsocks(p),
            BuildRequest::WireGuard(p) => build_wireguard(p),
            BuildRequest::Tuic(p) => build_tuic(p),
            BuildRequest::Hysteria(p) => build_hysteria(p),
        }
    }

    /// Parses a request from JSON and builds it
    pub fn build_from_json(json: &str) -> anyhow::Result<Outbound> {
        let request: BuildRequest = serde_json::from_str(json)
            .map_err(|e| anyhow::anyhow!("Invalid build request: {}", e))?;
        Ok(request.build())
    }
}
