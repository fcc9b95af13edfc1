use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use singlink::builder::{
    BuildRequest, ShadowsocksParams, TrojanParams, VLessParams, VMessParams, build_shadowsocks,
    build_trojan, build_vless, build_vmess,
};
use singlink::config::EngineConfig;
use singlink::config::outbound::{Outbound, to_json_array};
use singlink::parser::{parse_link, parse_links, parse_subscription};

const VMESS_JSON: &str = r#"{"v":"2","ps":"hk-01","add":"hk.example.com","port":"443","id":"b831381d-6324-4d53-ad4f-8cda48b30811","aid":"0","scy":"auto","net":"ws","path":"/ray","host":"cdn.example.com","tls":"tls","sni":"hk.example.com"}"#;
const TROJAN_LINK: &str = "trojan://secret@tj.example.com:443?sni=tj.example.com&type=ws&path=%2Fws&host=cdn.example.com#tj-01";
const VLESS_LINK: &str = "vless://b831381d-6324-4d53-ad4f-8cda48b30811@vl.example.com:8443?security=tls&sni=vl.example.com&type=ws&path=%2Fvl&host=cdn.example.com#vl-01";
const SS_LINK: &str = "ss://bm9uZTpwYXNz@example.com:8388#myserver";

fn vmess_link() -> String {
    format!("vmess://{}", STANDARD.encode(VMESS_JSON))
}

fn all_links() -> Vec<String> {
    vec![
        vmess_link(),
        TROJAN_LINK.to_string(),
        VLESS_LINK.to_string(),
        SS_LINK.to_string(),
    ]
}

#[test]
fn test_decode_is_deterministic() {
    for link in all_links() {
        let first = parse_link(&link).unwrap().to_json().unwrap();
        let second = parse_link(&link).unwrap().to_json().unwrap();
        assert_eq!(first, second, "non-deterministic output for {}", link);
    }
}

#[test]
fn test_output_never_exceeds_input_lines() {
    let body = [
        "# provider header",
        "",
        SS_LINK,
        "ss://invalidbase64!!@host:1234#x",
        "vmess://not-base64",
        "ssr://unsupported",
        TROJAN_LINK,
        "random text",
        VLESS_LINK,
    ]
    .join("\n");

    let outbounds = parse_subscription(body.as_bytes());
    let candidate_lines = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .count();

    assert!(outbounds.len() <= candidate_lines);
    let tags: Vec<&str> = outbounds.iter().map(Outbound::tag).collect();
    assert_eq!(tags, vec!["myserver", "tj-01", "vl-01"]);
}

#[test]
fn test_base64_body_with_crlf_lines() {
    let body = STANDARD.encode(all_links().join("\r\n"));
    let outbounds = parse_subscription(body.as_bytes());
    let kinds: Vec<&str> = outbounds.iter().map(Outbound::kind).collect();
    assert_eq!(kinds, vec!["vmess", "trojan", "vless", "shadowsocks"]);
}

#[test]
fn test_round_trip_vmess() {
    let decoded = parse_link(&vmess_link()).unwrap();
    let built = build_vmess(VMessParams {
        server: "hk.example.com".to_string(),
        port: "443".to_string(),
        uuid: "b831381d-6324-4d53-ad4f-8cda48b30811".to_string(),
        security: "auto".to_string(),
        alter_id: "0".to_string(),
        network: "ws".to_string(),
        path: "/ray".to_string(),
        host: "cdn.example.com".to_string(),
        tls: "tls".to_string(),
        sni: "hk.example.com".to_string(),
        tag: "hk-01".to_string(),
    });
    assert_eq!(decoded, built);
}

#[test]
fn test_round_trip_trojan() {
    let decoded = parse_link(TROJAN_LINK).unwrap();
    let built = build_trojan(TrojanParams {
        server: "tj.example.com".to_string(),
        port: "443".to_string(),
        password: "secret".to_string(),
        sni: "tj.example.com".to_string(),
        network: "ws".to_string(),
        path: "/ws".to_string(),
        host: "cdn.example.com".to_string(),
        tag: "tj-01".to_string(),
    });
    assert_eq!(decoded, built);
}

#[test]
fn test_round_trip_vless() {
    let decoded = parse_link(VLESS_LINK).unwrap();
    let built = build_vless(VLessParams {
        server: "vl.example.com".to_string(),
        port: "8443".to_string(),
        uuid: "b831381d-6324-4d53-ad4f-8cda48b30811".to_string(),
        flow: String::new(),
        security: "tls".to_string(),
        sni: "vl.example.com".to_string(),
        network: "ws".to_string(),
        path: "/vl".to_string(),
        host: "cdn.example.com".to_string(),
        tag: "vl-01".to_string(),
    });
    assert_eq!(decoded, built);
}

#[test]
fn test_round_trip_shadowsocks_via_json_request() {
    let decoded = parse_link(SS_LINK).unwrap();
    let built = build_shadowsocks(ShadowsocksParams {
        server: "example.com".to_string(),
        port: "8388".to_string(),
        method: "none".to_string(),
        password: "pass".to_string(),
        tag: "myserver".to_string(),
    });
    let requested = BuildRequest::build_from_json(
        r#"{"type":"shadowsocks","server":"example.com","port":"8388","method":"none","password":"pass","tag":"myserver"}"#,
    )
    .unwrap();

    assert_eq!(decoded, built);
    assert_eq!(decoded, requested);
}

#[test]
fn test_garbage_base64_body_does_not_error() {
    // Valid base64 whose decoded bytes are not link text
    let body = STANDARD.encode([0xff_u8, 0x00, 0x10, 0x80, 0x0a, 0x41]);
    assert!(parse_subscription(body.as_bytes()).is_empty());
}

#[test]
fn test_trojan_tls_always_enabled() {
    let links = [
        "trojan://pw@example.com:443#a",
        "trojan://pw@example.com:443?security=none#b",
        "trojan://pw@example.com:443?tls=false&sni=#c",
    ];
    for outbound in parse_links(links) {
        let value = serde_json::to_value(&outbound).unwrap();
        assert_eq!(value["tls"]["enabled"], json!(true));
    }
}

#[test]
fn test_shadowsocks_canonical_shape() {
    let outbound = parse_link(SS_LINK).unwrap();
    assert_eq!(
        serde_json::to_value(&outbound).unwrap(),
        json!({
            "type": "shadowsocks",
            "tag": "myserver",
            "server": "example.com",
            "server_port": "8388",
            "method": "none",
            "password": "pass"
        })
    );
}

#[test]
fn test_invalid_shadowsocks_line_is_dropped() {
    let outbounds = parse_subscription(b"ss://invalidbase64!!@host:1234#x\n");
    assert!(outbounds.is_empty());
    assert!(parse_link("ss://invalidbase64!!@host:1234#x").is_err());
}

#[test]
fn test_vmess_empty_object_yields_defaults() {
    let link = format!("vmess://{}", STANDARD.encode("{}"));
    let outbound = parse_link(&link).unwrap();
    assert_eq!(
        serde_json::to_value(&outbound).unwrap(),
        json!({
            "type": "vmess",
            "tag": "",
            "server": "",
            "server_port": "",
            "uuid": "",
            "security": "",
            "alter_id": "",
            "transport": {"type": "", "path": "", "host": ""},
            "tls": {"enabled": false, "server_name": ""}
        })
    );
}

#[test]
fn test_trojan_host_and_port_kept_as_text() {
    let outbound = parse_link("trojan://pw@例子.com:70000#idn").unwrap();
    assert_eq!(outbound.endpoint(), ("例子.com", "70000"));
}

#[test]
fn test_json_array_and_engine_document() {
    let outbounds = parse_links(all_links());
    let array: serde_json::Value =
        serde_json::from_str(&to_json_array(&outbounds).unwrap()).unwrap();
    assert_eq!(array.as_array().unwrap().len(), 4);

    let config = EngineConfig::builder().outbounds(outbounds).build();
    let restored = EngineConfig::from_json(&config.to_json_pretty().unwrap()).unwrap();
    assert_eq!(restored, config);
}
