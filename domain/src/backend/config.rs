//! Backend configuration and its construction-time validation

use super::kind::BackendKind;
use thiserror::Error;

/// Errors raised when a backend configuration cannot be honored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("remote backend requires an endpoint")]
    MissingEndpoint,

    #[error("remote backend requires a model name")]
    MissingModel,

    #[error("unsupported backend kind: {0}")]
    UnsupportedKind(String),
}

/// What a backend needs at construction time.
///
/// Invariant: `kind = Remote` requires both `endpoint` and `model` to be
/// present and non-empty. [`BackendConfig::validate`] enforces this once,
/// at startup — a validated config never fails for configuration reasons
/// at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

impl BackendConfig {
    /// Configuration for a remote backend.
    pub fn remote(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            kind: BackendKind::Remote,
            endpoint: Some(endpoint.into()),
            model: Some(model.into()),
        }
    }

    /// Configuration for the stub backend.
    pub fn stub() -> Self {
        Self {
            kind: BackendKind::Stub,
            endpoint: None,
            model: None,
        }
    }

    /// Check the kind's required fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.kind {
            BackendKind::Remote => {
                if self.endpoint.as_deref().is_none_or(|e| e.trim().is_empty()) {
                    return Err(ConfigError::MissingEndpoint);
                }
                if self.model.as_deref().is_none_or(|m| m.trim().is_empty()) {
                    return Err(ConfigError::MissingModel);
                }
                Ok(())
            }
            BackendKind::Stub => Ok(()),
        }
    }
}
