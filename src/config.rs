use serde::{Deserialize, Serialize};

use crate::config::outbound::Outbound;

pub mod outbound;

/// Full document handed to the proxy engine
///
/// Holds the engine-level settings next to the canonical outbounds produced
/// by the parser or the builders. Empty sections are omitted from the JSON.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EngineConfig {
    /// Log settings
    #[serde(default, skip_serializing_if = "EngineLog::is_default")]
    pub log: EngineLog,

    /// Outbound configurations, in subscription order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outbounds: Vec<Outbound>,
}

/// Engine log settings
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EngineLog {
    /// Disable logging
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,

    /// Log level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,

    /// Add time to each line
    #[serde(default, skip_serializing_if = "is_false")]
    pub timestamp: bool,
}

impl EngineLog {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Engine log level
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl EngineConfig {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Serialize the document to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the document to a pretty-printed JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Builder for EngineConfig
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set log settings
    pub fn log(mut self, log: EngineLog) -> Self {
        self.config.log = log;
        self
    }

    /// Set only the log level
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log.level = Some(level);
        self
    }

    /// Add an outbound
    pub fn outbound(mut self, outbound: Outbound) -> Self {
        self.config.outbounds.push(outbound);
        self
    }

    /// Append outbounds, keeping their order
    pub fn outbounds(mut self, outbounds: impl IntoIterator<Item = Outbound>) -> Self {
        self.config.outbounds.extend(outbounds);
        self
    }

    /// Build the document
    pub fn build(self) -> EngineConfig {
        self.config
    }
}
