//! Streaming transport adapter.
//!
//! [`NdjsonSink`] frames each response fragment as one `{"token": ...}`
//! JSON line and hands it to the HTTP response body through a bounded
//! channel. Every channel item becomes one immediately transmitted HTTP
//! chunk — there is no server-side buffering between a fragment being
//! written and the client seeing it, which is what makes incremental
//! delivery observable rather than arriving as one buffered payload.

use crate::types::TokenChunk;
use async_trait::async_trait;
use axum::body::Bytes;
use futures::Stream;
use minivault_application::ports::generator::{GeneratorError, TokenSink};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::DropGuard;

/// Token sink writing framed NDJSON chunks into a response-body channel.
pub struct NdjsonSink {
    tx: mpsc::Sender<Bytes>,
}

impl NdjsonSink {
    /// Create a sink and the receiver feeding the response body.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Bytes>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl TokenSink for NdjsonSink {
    async fn write(&mut self, fragment: &str) -> Result<(), GeneratorError> {
        let chunk = TokenChunk {
            token: fragment.to_string(),
        };
        let mut line =
            serde_json::to_vec(&chunk).map_err(|e| GeneratorError::Transport(e.to_string()))?;
        line.push(b'\n');

        // A closed channel means the response body was dropped: the
        // client is gone and the stream must abort, nothing is retried.
        self.tx
            .send(Bytes::from(line))
            .await
            .map_err(|_| GeneratorError::Transport("client disconnected".to_string()))
    }
}

/// Response-body stream that cancels the in-flight generation when it is
/// dropped.
///
/// The guard holds the request's cancellation token; a client disconnect
/// drops the body, which drops the guard, which fires the token.
pub struct GuardedStream<S> {
    inner: S,
    _guard: DropGuard,
}

impl<S> GuardedStream<S> {
    pub fn new(inner: S, guard: DropGuard) -> Self {
        Self {
            inner,
            _guard: guard,
        }
    }
}

impl<S: Stream + Unpin> Stream for GuardedStream<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
