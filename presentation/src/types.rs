//! Request and response payloads

use serde::{Deserialize, Serialize};

/// Body of `POST /generate` and `POST /generate/stream`.
///
/// A missing `prompt` field decodes as empty and is rejected by prompt
/// validation, like an explicitly empty one.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Success body of `POST /generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// Error body for 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One line of a streaming response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenChunk {
    pub token: String,
}
