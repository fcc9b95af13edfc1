//! Proxy engine control
//!
//! The engine itself is an external program. This module only hands it a
//! finished `EngineConfig` and tracks whether it is still running.

use std::fmt;
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;

/// Observed state of a proxy engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineStatus {
    Connected,
    Disconnected,
    Error(String),
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineStatus::Connected => write!(f, "connected"),
            EngineStatus::Disconnected => write!(f, "disconnected"),
            EngineStatus::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

/// Start/stop/status control over a proxy engine
#[async_trait]
pub trait ProxyEngine: Send {
    /// Starts the engine with the given document
    async fn start(&mut self, config: &EngineConfig) -> Result<()>;

    /// Stops the engine, succeeding if it is not running
    async fn stop(&mut self) -> Result<()>;

    /// Reports the current engine state
    fn status(&mut self) -> EngineStatus;
}

/// A sing-box child process fed its configuration over stdin
///
/// The child is killed when the handle is dropped.
pub struct SingBoxProcess {
    binary: String,
    child: Option<Child>,
}

impl SingBoxProcess {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            child: None,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn is_running(&mut self) -> bool {
        self.status() == EngineStatus::Connected
    }
}

impl Default for SingBoxProcess {
    fn default() -> Self {
        Self::new("sing-box")
    }
}

#[async_trait]
impl ProxyEngine for SingBoxProcess {
    async fn start(&mut self, config: &EngineConfig) -> Result<()> {
        if self.is_running() {
            bail!("Engine is already running");
        }

        let json = config.to_json().context("Failed to serialize engine config")?;

        debug!("Spawning {} run -c stdin", self.binary);
        let mut child = Command::new(&self.binary)
            .args(["run", "-c", "stdin"])
            .stdin(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start engine binary '{}'", self.binary))?;

        // stdin is dropped after writing so the engine sees EOF
        if let Some(mut stdin) = child.stdin.take()
            && let Err(e) = stdin.write_all(json.as_bytes()).await
        {
            let _ = child.kill().await;
            return Err(e).context("Failed to write config to engine stdin");
        }

        match child.id() {
            Some(pid) => info!(
                "Engine started (pid {}) with {} outbounds",
                pid,
                config.outbounds.len()
            ),
            None => info!("Engine started with {} outbounds", config.outbounds.len()),
        }
        self.child = Some(child);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Engine had already exited with {}", status);
                return Ok(());
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to query engine state: {}", e),
        }

        child.kill().await.context("Failed to stop engine")?;
        info!("Engine stopped");
        Ok(())
    }

    fn status(&mut self) -> EngineStatus {
        let Some(child) = self.child.as_mut() else {
            return EngineStatus::Disconnected;
        };

        match child.try_wait() {
            Ok(None) => EngineStatus::Connected,
            Ok(Some(status)) if status.success() => EngineStatus::Disconnected,
            Ok(Some(status)) => EngineStatus::Error(format!("engine exited with {}", status)),
            Err(e) => EngineStatus::Error(e.to_string()),
        }
    }
}
