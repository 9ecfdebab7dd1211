//! Configuration file schema.
//!
//! Serde-defaulted sections merged by [`ConfigLoader`](super::loader::ConfigLoader)
//! from defaults, config files, and `MINIVAULT_`-prefixed environment
//! variables.

use minivault_domain::{BackendConfig, BackendKind, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerSection,
    pub backend: BackendSection,
    pub log: LogSection,
}

/// `[server]` — where the gateway listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerSection {
    /// The socket address to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[backend]` — which generation backend to construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    /// "remote" (alias "ollama") or "stub".
    pub kind: String,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    /// Substitute the stub when the configured backend is invalid,
    /// instead of failing startup.
    pub fallback_to_stub: bool,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            kind: BackendKind::Remote.as_str().to_string(),
            endpoint: None,
            model: None,
            fallback_to_stub: true,
        }
    }
}

impl BackendSection {
    /// Resolve this section into a domain [`BackendConfig`].
    ///
    /// Fails only on an unknown kind string; field validation happens in
    /// the backend factory.
    pub fn backend_config(&self) -> Result<BackendConfig, ConfigError> {
        let kind: BackendKind = self.kind.parse()?;
        Ok(BackendConfig {
            kind,
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
        })
    }
}

/// `[log]` — where interaction records go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub path: PathBuf,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("logs/interactions.jsonl"),
        }
    }
}
