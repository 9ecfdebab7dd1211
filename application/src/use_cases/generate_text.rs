//! Generate Text use case.
//!
//! Orchestrates a single generation request: validate the prompt, call
//! the selected backend (full-text or streaming), and record the outcome
//! in the interaction log. The HTTP layer maps [`GenerateError`] variants
//! to status codes; this use case owns everything in between.

use crate::ports::generator::{Generator, GeneratorError, RecordingSink, TokenSink};
use crate::ports::interaction_logger::InteractionLogger;
use minivault_domain::{DomainError, Prompt, truncate_str};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a generation request.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The prompt failed validation; no backend was invoked.
    #[error(transparent)]
    InvalidPrompt(#[from] DomainError),

    /// The backend call failed.
    #[error(transparent)]
    Backend(#[from] GeneratorError),
}

/// Use case for serving one generation request.
///
/// Holds the process-wide backend instance and interaction logger; both
/// are stateless per call and shared across all concurrent requests.
pub struct GenerateTextUseCase {
    generator: Arc<dyn Generator>,
    logger: Arc<dyn InteractionLogger>,
}

impl GenerateTextUseCase {
    pub fn new(generator: Arc<dyn Generator>, logger: Arc<dyn InteractionLogger>) -> Self {
        Self { generator, logger }
    }

    /// The backend this use case dispatches to (for startup diagnostics).
    pub fn backend(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    /// Produce the full completion for `prompt_text`.
    pub async fn execute(
        &self,
        prompt_text: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GenerateError> {
        let started = Instant::now();

        let prompt = match Prompt::new(prompt_text) {
            Ok(p) => p,
            Err(e) => {
                self.record_failure(prompt_text, &e.to_string(), false, started);
                return Err(e.into());
            }
        };

        debug!("Generating response for: {}", truncate_str(prompt.as_str(), 100));

        match self.generator.generate(&prompt, cancel).await {
            Ok(response) => {
                self.record_success(prompt.as_str(), &response, false, started);
                info!(
                    "Generation completed ({} bytes, {:?})",
                    response.len(),
                    started.elapsed()
                );
                Ok(response)
            }
            Err(e) => {
                self.record_failure(prompt.as_str(), &e.to_string(), false, started);
                Err(e.into())
            }
        }
    }

    /// Stream the completion for `prompt_text` into `sink`, fragment by
    /// fragment, returning the accumulated full text at stream end.
    ///
    /// On failure, fragments already written to the sink were delivered
    /// best-effort; the failure is recorded with an empty response field
    /// and the error is still returned.
    pub async fn execute_stream(
        &self,
        prompt_text: &str,
        sink: &mut dyn TokenSink,
        cancel: &CancellationToken,
    ) -> Result<String, GenerateError> {
        let started = Instant::now();

        let prompt = match Prompt::new(prompt_text) {
            Ok(p) => p,
            Err(e) => {
                self.record_failure(prompt_text, &e.to_string(), true, started);
                return Err(e.into());
            }
        };

        debug!("Streaming response for: {}", truncate_str(prompt.as_str(), 100));

        let mut recording = RecordingSink::new(sink);
        match self
            .generator
            .generate_stream(&prompt, &mut recording, cancel)
            .await
        {
            Ok(()) => {
                let response = recording.into_text();
                self.record_success(prompt.as_str(), &response, true, started);
                info!(
                    "Streaming completed ({} bytes, {:?})",
                    response.len(),
                    started.elapsed()
                );
                Ok(response)
            }
            Err(e) => {
                self.record_failure(prompt.as_str(), &e.to_string(), true, started);
                Err(e.into())
            }
        }
    }

    fn record_success(&self, prompt: &str, response: &str, streaming: bool, started: Instant) {
        // Logging failures are operational noise, never a request failure
        if let Err(e) = self
            .logger
            .record_success(prompt, response, streaming, started)
        {
            warn!("Failed to record interaction: {}", e);
        }
    }

    fn record_failure(&self, prompt: &str, error: &str, streaming: bool, started: Instant) {
        if let Err(e) = self.logger.record_failure(prompt, error, streaming, started) {
            warn!("Failed to record interaction failure: {}", e);
        }
    }
}
