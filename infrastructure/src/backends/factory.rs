//! Backend factory and fallback policy.
//!
//! Validates the configured backend and constructs it. A misconfigured
//! remote backend falls back to the stub so the service keeps answering,
//! but the degradation is observable: the selection carries the reason,
//! which the server logs at startup, and every log record written
//! afterwards names `stub` as its backend. Operators who prefer failing
//! loudly can disable the fallback.

use super::ollama::OllamaGenerator;
use super::stub::StubGenerator;
use minivault_application::ports::generator::Generator;
use minivault_domain::{BackendConfig, BackendKind, ConfigError};
use std::sync::Arc;

/// The outcome of backend selection.
pub struct BackendSelection {
    pub generator: Arc<dyn Generator>,
    /// Present iff the stub was substituted for a misconfigured backend.
    pub fallback_reason: Option<ConfigError>,
}

impl std::fmt::Debug for BackendSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSelection")
            .field("fallback_reason", &self.fallback_reason)
            .finish_non_exhaustive()
    }
}

impl BackendSelection {
    fn of(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            fallback_reason: None,
        }
    }

    /// A stub selection standing in for a backend that could not be
    /// configured.
    pub fn fallback(reason: ConfigError) -> Self {
        Self {
            generator: Arc::new(StubGenerator::new()),
            fallback_reason: Some(reason),
        }
    }
}

/// Validate `config` and construct the corresponding backend.
///
/// With `allow_fallback`, a validation failure selects the stub and
/// reports the reason in the returned [`BackendSelection`]; without it,
/// the [`ConfigError`] is returned and startup should fail.
pub fn select_backend(
    config: &BackendConfig,
    allow_fallback: bool,
) -> Result<BackendSelection, ConfigError> {
    match config.validate() {
        Ok(()) => {}
        Err(e) if allow_fallback => return Ok(BackendSelection::fallback(e)),
        Err(e) => return Err(e),
    }

    let generator: Arc<dyn Generator> = match config.kind {
        BackendKind::Remote => {
            // Both fields are present after validation
            let endpoint = config.endpoint.as_deref().unwrap_or_default();
            let model = config.model.as_deref().unwrap_or_default();
            Arc::new(OllamaGenerator::new(endpoint, model))
        }
        BackendKind::Stub => Arc::new(StubGenerator::new()),
    };

    Ok(BackendSelection::of(generator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_remote_config_selects_remote_backend() {
        let config = BackendConfig::remote("http://localhost:11434", "llama2");
        let selection = select_backend(&config, true).unwrap();
        assert_eq!(selection.generator.kind(), BackendKind::Remote);
        assert_eq!(selection.generator.model(), Some("llama2"));
        assert!(selection.fallback_reason.is_none());
    }

    #[test]
    fn stub_config_selects_stub_backend() {
        let selection = select_backend(&BackendConfig::stub(), true).unwrap();
        assert_eq!(selection.generator.kind(), BackendKind::Stub);
        assert!(selection.fallback_reason.is_none());
    }

    #[test]
    fn invalid_remote_config_falls_back_to_stub() {
        let config = BackendConfig {
            kind: BackendKind::Remote,
            endpoint: None,
            model: Some("llama2".to_string()),
        };
        let selection = select_backend(&config, true).unwrap();
        assert_eq!(selection.generator.kind(), BackendKind::Stub);
        assert_eq!(
            selection.fallback_reason,
            Some(ConfigError::MissingEndpoint)
        );
    }

    #[test]
    fn fallback_can_be_disabled() {
        let config = BackendConfig {
            kind: BackendKind::Remote,
            endpoint: Some("http://localhost:11434".to_string()),
            model: None,
        };
        let err = select_backend(&config, false).unwrap_err();
        assert_eq!(err, ConfigError::MissingModel);
    }
}
