//! Port for the structured interaction log.
//!
//! Every request attempt — success or failure, streamed or not — produces
//! exactly one record in an append-only store. This is separate from
//! `tracing`-based diagnostics: tracing carries human-readable operational
//! messages, the interaction log is the machine-readable audit trail
//! (one JSON record per line).

use std::time::Instant;
use thiserror::Error;

/// Errors from the interaction log.
///
/// These must never mask the primary request outcome: callers report them
/// to the operational log and let the user-visible response proceed.
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("failed to serialize log record: {0}")]
    Serialize(String),

    #[error("failed to write log record: {0}")]
    Write(String),

    #[error("interaction log is closed")]
    Closed,
}

/// Port for recording request outcomes.
///
/// Implementations append one immutable record per call and must be safe
/// to call concurrently from multiple in-flight requests; concurrent
/// records never interleave within a line. `started` is the instant the
/// request began, used to compute the record's duration.
pub trait InteractionLogger: Send + Sync {
    /// Record a completed request.
    fn record_success(
        &self,
        prompt: &str,
        response: &str,
        streaming: bool,
        started: Instant,
    ) -> Result<(), LoggerError>;

    /// Record a failed request. The response field of the record is empty;
    /// the error text is preserved verbatim.
    fn record_failure(
        &self,
        prompt: &str,
        error: &str,
        streaming: bool,
        started: Instant,
    ) -> Result<(), LoggerError>;
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoInteractionLogger;

impl InteractionLogger for NoInteractionLogger {
    fn record_success(
        &self,
        _prompt: &str,
        _response: &str,
        _streaming: bool,
        _started: Instant,
    ) -> Result<(), LoggerError> {
        Ok(())
    }

    fn record_failure(
        &self,
        _prompt: &str,
        _error: &str,
        _streaming: bool,
        _started: Instant,
    ) -> Result<(), LoggerError> {
        Ok(())
    }
}
