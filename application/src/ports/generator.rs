//! Generator port
//!
//! Defines the uniform contract for producing text from a prompt,
//! regardless of which backend implements it. Implementations (the remote
//! Ollama adapter and the stub) live in the infrastructure layer.

use async_trait::async_trait;
use minivault_domain::{BackendKind, Prompt};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur during a backend call.
///
/// Construction-time configuration errors are a separate concern
/// ([`minivault_domain::ConfigError`], absorbed by the backend factory);
/// everything here happens at call time.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The backend could not be reached or the connection broke mid-call.
    #[error("connection error: {0}")]
    Connection(String),

    /// The backend answered with a non-success HTTP status.
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(u16),

    /// The backend's payload could not be decoded.
    #[error("failed to decode backend response: {0}")]
    Decode(String),

    /// A write into the streaming sink failed. Fragments already written
    /// were delivered best-effort and are not retracted.
    #[error("stream transport error: {0}")]
    Transport(String),

    /// The caller's cancellation token fired before completion.
    #[error("generation cancelled")]
    Cancelled,
}

impl GeneratorError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GeneratorError::Cancelled)
    }
}

/// Receiver for streamed response fragments.
///
/// `write` is called once per fragment, in emission order; the
/// concatenation of all fragments equals the full response text. A write
/// failure aborts the stream and surfaces as
/// [`GeneratorError::Transport`].
#[async_trait]
pub trait TokenSink: Send {
    async fn write(&mut self, fragment: &str) -> Result<(), GeneratorError>;
}

/// Uniform contract for text generation.
///
/// Implementations are stateless after construction and shared behind an
/// `Arc` across all concurrent requests. Both operations observe the
/// caller-supplied cancellation token, which is tied to the inbound
/// connection's lifetime.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Which kind of backend this is (recorded in the interaction log).
    fn kind(&self) -> BackendKind;

    /// The model identifier, if this backend has one.
    fn model(&self) -> Option<&str>;

    /// Produce the full completion for a prompt.
    async fn generate(
        &self,
        prompt: &Prompt,
        cancel: &CancellationToken,
    ) -> Result<String, GeneratorError>;

    /// Produce the completion as a stream of fragments written into
    /// `sink`.
    ///
    /// On failure, partial output may already have been written — callers
    /// must treat a mid-stream error as "best-effort partial content
    /// delivered, error still reported".
    async fn generate_stream(
        &self,
        prompt: &Prompt,
        sink: &mut dyn TokenSink,
        cancel: &CancellationToken,
    ) -> Result<(), GeneratorError>;
}

/// Decorator that forwards fragments to an inner sink while accumulating
/// the full response text.
///
/// This makes "stream to the client and keep a transcript for the log"
/// one coherent operation: drive the stream through the decorator, then
/// take the accumulated text with [`RecordingSink::into_text`].
pub struct RecordingSink<'a> {
    inner: &'a mut dyn TokenSink,
    text: String,
}

impl<'a> RecordingSink<'a> {
    pub fn new(inner: &'a mut dyn TokenSink) -> Self {
        Self {
            inner,
            text: String::new(),
        }
    }

    /// The text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Finish recording and return the accumulated text.
    pub fn into_text(self) -> String {
        self.text
    }
}

#[async_trait]
impl TokenSink for RecordingSink<'_> {
    async fn write(&mut self, fragment: &str) -> Result<(), GeneratorError> {
        // Observed first, forwarded second; the transcript includes a
        // fragment even when its forward fails.
        self.text.push_str(fragment);
        self.inner.write(fragment).await
    }
}

/// Sink that collects fragments into a string and never fails.
///
/// Used in tests and anywhere a caller wants streaming semantics but only
/// needs the final text.
#[derive(Debug, Default)]
pub struct CollectingSink {
    text: String,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[async_trait]
impl TokenSink for CollectingSink {
    async fn write(&mut self, fragment: &str) -> Result<(), GeneratorError> {
        self.text.push_str(fragment);
        Ok(())
    }
}
