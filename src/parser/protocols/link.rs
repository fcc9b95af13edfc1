//! Shared URI handling for `scheme://credential@host:port?query#tag` links

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use url::{ParseError, Url};

/// The parts of a credential-bearing proxy link
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkParts {
    /// Percent-decoded userinfo username
    pub username: String,
    /// Percent-decoded userinfo password, if the link had one
    pub password: Option<String>,
    /// Host without IPv6 brackets
    pub host: String,
    /// Port text, empty when absent
    pub port: String,
    /// Percent-decoded fragment, empty when absent
    pub fragment: String,
    /// Decoded query parameters, first occurrence wins
    pub query: HashMap<String, String>,
}

impl LinkParts {
    /// Returns a query parameter, or the empty string
    pub fn param(&self, key: &str) -> String {
        self.query.get(key).cloned().unwrap_or_default()
    }

    /// Rebuilds the raw userinfo text (`user` or `user:pass`)
    pub fn userinfo(&self) -> String {
        match &self.password {
            Some(password) => format!("{}:{}", self.username, password),
            None => self.username.clone(),
        }
    }
}

/// Parses a link with standard URI grammar
///
/// The port is kept as text. Any run of digits is accepted, including values
/// outside the 16-bit range.
pub fn parse_link(uri: &str) -> Result<LinkParts> {
    let (url, port) = match Url::parse(uri) {
        Ok(url) => {
            let port = url.port().map(|p| p.to_string()).unwrap_or_default();
            (url, port)
        }
        Err(ParseError::InvalidPort) => {
            let (stripped, port) =
                split_numeric_port(uri).ok_or_else(|| anyhow!("Malformed URI: invalid port"))?;
            let url = Url::parse(&stripped).map_err(|e| anyhow!("Malformed URI: {}", e))?;
            (url, port.to_string())
        }
        Err(e) => return Err(anyhow!("Malformed URI: {}", e)),
    };

    let host = url
        .host_str()
        .map(|h| percent_decode(h.trim_start_matches('[').trim_end_matches(']')))
        .unwrap_or_default();

    let mut query = HashMap::new();
    for (key, value) in url.query_pairs() {
        query
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }

    Ok(LinkParts {
        username: percent_decode(url.username()),
        password: url.password().map(percent_decode),
        host,
        port,
        fragment: url.fragment().map(percent_decode).unwrap_or_default(),
        query,
    })
}

/// Removes an all-digit port from the authority, returning the rest of the
/// link and the port text
fn split_numeric_port(uri: &str) -> Option<(String, &str)> {
    let authority_start = uri.find("://")? + 3;
    let rest = &uri[authority_start..];
    let authority_len = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..authority_len];

    let host_start = authority.rfind('@').map_or(0, |i| i + 1);
    let colon = authority.rfind(':')?;
    if colon < host_start || authority[colon..].contains(']') {
        return None;
    }

    let port = &authority[colon + 1..];
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let colon = authority_start + colon;
    let end = authority_start + authority_len;
    Some((format!("{}{}", &uri[..colon], &uri[end..]), port))
}

fn percent_decode(text: &str) -> String {
    urlencoding::decode(text)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| text.to_string())
}
