//! Deterministic stub backend.
//!
//! Used as the fallback when the remote backend is misconfigured, and in
//! tests. Same input, same output, no external dependencies; the only
//! errors it can produce are sink transport failures and cancellation.

use async_trait::async_trait;
use minivault_application::ports::generator::{Generator, GeneratorError, TokenSink};
use minivault_domain::{BackendKind, Prompt};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const RESPONSE_TEMPLATE: &str = "This is a stubbed response to your prompt:";
const STREAM_TEMPLATE: &str = "This is a stubbed streaming response to your prompt:";

/// Default pause between streamed words, simulating model cadence.
const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// Deterministic placeholder backend.
pub struct StubGenerator {
    pacing: Duration,
}

impl StubGenerator {
    /// Stub with the default streaming cadence.
    pub fn new() -> Self {
        Self {
            pacing: DEFAULT_PACING,
        }
    }

    /// Stub with no pacing delay, for tests and non-interactive use.
    pub fn unpaced() -> Self {
        Self {
            pacing: Duration::ZERO,
        }
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Generator for StubGenerator {
    fn kind(&self) -> BackendKind {
        BackendKind::Stub
    }

    fn model(&self) -> Option<&str> {
        None
    }

    async fn generate(
        &self,
        prompt: &Prompt,
        _cancel: &CancellationToken,
    ) -> Result<String, GeneratorError> {
        Ok(format!("{} {}", RESPONSE_TEMPLATE, prompt.as_str()))
    }

    async fn generate_stream(
        &self,
        prompt: &Prompt,
        sink: &mut dyn TokenSink,
        cancel: &CancellationToken,
    ) -> Result<(), GeneratorError> {
        let words = STREAM_TEMPLATE
            .split_whitespace()
            .chain(std::iter::once(prompt.as_str()));

        let mut first = true;
        for word in words {
            // Cancellation is checked between word emissions
            if cancel.is_cancelled() {
                return Err(GeneratorError::Cancelled);
            }
            if !first && !self.pacing.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(GeneratorError::Cancelled),
                    _ = tokio::time::sleep(self.pacing) => {}
                }
            }
            first = false;
            sink.write(&format!("{}\n", word)).await?;
        }

        Ok(())
    }
}
