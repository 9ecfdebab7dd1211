//! JSONL interaction log.
//!
//! One [`LogRecord`] per request attempt, serialized as a single JSON
//! line and appended to a file opened once at startup. The store is
//! append-only: records are never mutated or deleted here, and rotation
//! is out of scope.
//!
//! The append handle is the one shared mutable resource of the process;
//! a mutex serializes writers so concurrent records never interleave
//! within a line.

use crate::logging::health::HealthSnapshot;
use chrono::{SecondsFormat, Utc};
use minivault_application::ports::interaction_logger::{InteractionLogger, LoggerError};
use minivault_application::ports::telemetry::RequestGauge;
use minivault_domain::{BackendKind, approx_token_count};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// One immutable audit entry describing a single request attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Unique id: nanosecond timestamp plus process id.
    pub id: String,
    /// RFC 3339 timestamp of when the record was built.
    pub timestamp: String,
    /// Request duration in milliseconds.
    pub duration_ms: u64,

    pub prompt: String,
    /// Backend kind actually used ("remote" or "stub").
    pub backend: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub streaming: bool,

    pub response: String,
    /// Whitespace-run approximation, not a real tokenizer count.
    pub token_count: usize,
    /// Response size in bytes.
    pub response_size: usize,

    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Requests in flight when the record was built.
    pub active_requests: usize,
    /// Resident memory of the process in bytes.
    pub memory_bytes: u64,
}

/// Append-only JSONL store for interaction records.
///
/// Owns the exclusive file handle for the process lifetime. `close` is
/// idempotent; records attempted after close fail with
/// [`LoggerError::Closed`].
pub struct InteractionLog {
    writer: Mutex<Option<BufWriter<File>>>,
    path: PathBuf,
    backend: BackendKind,
    model: Option<String>,
    gauge: Arc<RequestGauge>,
}

impl InteractionLog {
    /// Open the store at `path` in append mode, creating the file and its
    /// parent directories if needed.
    pub fn open(
        path: impl AsRef<Path>,
        backend: BackendKind,
        model: Option<String>,
        gauge: Arc<RequestGauge>,
    ) -> Result<Self, LoggerError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| LoggerError::Write(e.to_string()))?;
        }

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| LoggerError::Write(e.to_string()))?;

        Ok(Self {
            writer: Mutex::new(Some(BufWriter::new(file))),
            path: path.to_path_buf(),
            backend,
            model,
            gauge,
        })
    }

    /// The path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and release the file handle. A second close is a no-op.
    pub fn close(&self) -> Result<(), LoggerError> {
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| LoggerError::Write("log writer lock poisoned".to_string()))?;
        if let Some(mut writer) = guard.take() {
            writer.flush().map_err(|e| LoggerError::Write(e.to_string()))?;
        }
        Ok(())
    }

    fn build_record(
        &self,
        prompt: &str,
        response: &str,
        error: Option<&str>,
        streaming: bool,
        started: Instant,
    ) -> LogRecord {
        let health = HealthSnapshot::capture(&self.gauge);
        LogRecord {
            id: request_id(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            duration_ms: started.elapsed().as_millis() as u64,
            prompt: prompt.to_string(),
            backend: self.backend.as_str().to_string(),
            model: self.model.clone(),
            streaming,
            response: response.to_string(),
            token_count: approx_token_count(response),
            response_size: response.len(),
            success: error.is_none(),
            error: error.map(str::to_string),
            active_requests: health.active_requests,
            memory_bytes: health.memory_bytes,
        }
    }

    fn append(&self, record: &LogRecord) -> Result<(), LoggerError> {
        let line =
            serde_json::to_string(record).map_err(|e| LoggerError::Serialize(e.to_string()))?;

        let mut guard = self
            .writer
            .lock()
            .map_err(|_| LoggerError::Write("log writer lock poisoned".to_string()))?;
        let writer = guard.as_mut().ok_or(LoggerError::Closed)?;

        writeln!(writer, "{}", line).map_err(|e| LoggerError::Write(e.to_string()))?;
        // Flush per record for crash safety; a crash loses at most the
        // line being written.
        writer.flush().map_err(|e| LoggerError::Write(e.to_string()))
    }
}

impl InteractionLogger for InteractionLog {
    fn record_success(
        &self,
        prompt: &str,
        response: &str,
        streaming: bool,
        started: Instant,
    ) -> Result<(), LoggerError> {
        let record = self.build_record(prompt, response, None, streaming, started);
        self.append(&record)
    }

    fn record_failure(
        &self,
        prompt: &str,
        error: &str,
        streaming: bool,
        started: Instant,
    ) -> Result<(), LoggerError> {
        let record = self.build_record(prompt, "", Some(error), streaming, started);
        self.append(&record)
    }
}

impl Drop for InteractionLog {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.writer.lock()
            && let Some(writer) = guard.as_mut()
        {
            let _ = writer.flush();
        }
    }
}

/// Unique request id from nanosecond time plus process identity.
fn request_id() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}", nanos, std::process::id())
}
