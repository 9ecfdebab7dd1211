//! Remote backend speaking the Ollama generate protocol.
//!
//! Talks to `POST {endpoint}/api/generate`. The non-streaming call
//! expects a single `{response, done}` object; the streaming call reads
//! newline-delimited `{response, done}` objects and forwards each
//! `response` fragment to the sink as soon as its line decodes, stopping
//! at the object marked `done` or at end-of-stream.

use async_trait::async_trait;
use futures::StreamExt;
use minivault_application::ports::generator::{Generator, GeneratorError, TokenSink};
use minivault_domain::{BackendKind, Prompt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

/// Generator backed by a remote Ollama-protocol model server.
///
/// Construction takes an already validated endpoint and model (see the
/// backend factory); one shared `reqwest::Client` serves all requests.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: reqwest::Client::new(),
            base_url: endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    async fn post_generate(
        &self,
        prompt: &Prompt,
        stream: bool,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, GeneratorError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateBody {
            model: &self.model,
            prompt: prompt.as_str(),
            stream,
        };

        debug!("POST {} (model={}, stream={})", url, self.model, stream);

        let request = self.client.post(&url).json(&body).send();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(GeneratorError::Cancelled),
            result = request => {
                result.map_err(|e| GeneratorError::Connection(e.to_string()))?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::UnexpectedStatus(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn model(&self) -> Option<&str> {
        Some(&self.model)
    }

    async fn generate(
        &self,
        prompt: &Prompt,
        cancel: &CancellationToken,
    ) -> Result<String, GeneratorError> {
        let response = self.post_generate(prompt, false, cancel).await?;

        let chunk = tokio::select! {
            _ = cancel.cancelled() => return Err(GeneratorError::Cancelled),
            result = response.json::<GenerateChunk>() => {
                result.map_err(|e| GeneratorError::Decode(e.to_string()))?
            }
        };

        Ok(chunk.response)
    }

    async fn generate_stream(
        &self,
        prompt: &Prompt,
        sink: &mut dyn TokenSink,
        cancel: &CancellationToken,
    ) -> Result<(), GeneratorError> {
        let response = self.post_generate(prompt, true, cancel).await?;

        // Network chunks do not align with protocol lines; bytes are
        // buffered until a full line is available.
        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => return Err(GeneratorError::Cancelled),
                chunk = stream.next() => chunk,
            };

            match next {
                Some(Ok(bytes)) => {
                    buffer.push_str(&String::from_utf8_lossy(&bytes));
                    while let Some(newline) = buffer.find('\n') {
                        let line: String = buffer.drain(..=newline).collect();
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        let chunk: GenerateChunk = serde_json::from_str(line)
                            .map_err(|e| GeneratorError::Decode(e.to_string()))?;
                        sink.write(&chunk.response).await?;
                        if chunk.done {
                            return Ok(());
                        }
                    }
                }
                Some(Err(e)) => return Err(GeneratorError::Connection(e.to_string())),
                None => {
                    // End of stream before a done marker. An empty
                    // remainder is a clean stop; a partial line must still
                    // decode.
                    let rest = buffer.trim();
                    if !rest.is_empty() {
                        let chunk: GenerateChunk = serde_json::from_str(rest)
                            .map_err(|e| GeneratorError::Decode(e.to_string()))?;
                        sink.write(&chunk.response).await?;
                    }
                    return Ok(());
                }
            }
        }
    }
}
