//! HTTP handlers for the generation endpoints.
//!
//! Status mapping: `400` for a malformed body or empty prompt, `500` for
//! a backend failure, `200` otherwise. The streaming handler commits its
//! status only once the first fragment (or a pre-stream failure) is
//! known — a failure after streaming has begun cannot change the
//! already-sent `200`, it can only stop further output.

use crate::state::AppState;
use crate::streaming::{GuardedStream, NdjsonSink};
use crate::types::{ErrorResponse, GenerateRequest, GenerateResponse};
use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use minivault_application::use_cases::generate_text::GenerateError;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// `POST /generate` — full completion as one JSON object.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return malformed_body(&state, &rejection, false, started),
    };

    let _in_flight = state.gauge.track();
    let cancel = CancellationToken::new();

    match state.generate.execute(&request.prompt, &cancel).await {
        Ok(response) => (StatusCode::OK, Json(GenerateResponse { response })).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /generate/stream` — chunked NDJSON body of `{"token": ...}`
/// objects, one per fragment.
pub async fn generate_stream(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return malformed_body(&state, &rejection, true, started),
    };

    let in_flight = state.gauge.track();
    let cancel = CancellationToken::new();
    let (mut sink, mut rx) = NdjsonSink::channel(32);

    let use_case = Arc::clone(&state.generate);
    let task_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        // The gauge guard lives as long as the stream, not the handler
        let _in_flight = in_flight;
        use_case
            .execute_stream(&request.prompt, &mut sink, &task_cancel)
            .await
    });

    match rx.recv().await {
        Some(first) => {
            // First fragment in hand: commit the 200 and let the body
            // drain the channel. Content-Length is deliberately absent so
            // the transport uses chunked framing.
            let body = GuardedStream::new(
                futures::stream::iter([first])
                    .chain(ReceiverStream::new(rx))
                    .map(Ok::<_, Infallible>),
                cancel.drop_guard(),
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Body::from_stream(body),
            )
                .into_response()
        }
        None => match handle.await {
            // The stream ended before emitting anything
            Ok(Ok(_)) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Body::empty(),
            )
                .into_response(),
            Ok(Err(e)) => error_response(&e),
            Err(e) => {
                warn!("Streaming task failed to complete: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to generate response".to_string(),
                    }),
                )
                    .into_response()
            }
        },
    }
}

fn error_response(error: &GenerateError) -> Response {
    match error {
        GenerateError::InvalidPrompt(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        // The underlying error text is preserved in the interaction log;
        // the client gets a generic failure.
        GenerateError::Backend(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to generate response".to_string(),
            }),
        )
            .into_response(),
    }
}

fn malformed_body(
    state: &AppState,
    rejection: &JsonRejection,
    streaming: bool,
    started: Instant,
) -> Response {
    // Malformed bodies never reach the use case, so the failure is
    // recorded here with an empty prompt, like any other attempt.
    if let Err(e) = state
        .logger
        .record_failure("", &rejection.to_string(), streaming, started)
    {
        warn!("Failed to record interaction failure: {}", e);
    }
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Invalid request format".to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::router;
    use crate::types::TokenChunk;
    use async_trait::async_trait;
    use axum::http::Request;
    use minivault_application::ports::generator::{Generator, GeneratorError, TokenSink};
    use minivault_application::ports::interaction_logger::{InteractionLogger, LoggerError};
    use minivault_application::ports::telemetry::RequestGauge;
    use minivault_application::use_cases::generate_text::GenerateTextUseCase;
    use minivault_domain::{BackendKind, Prompt};
    use std::sync::Mutex;
    use tower::util::ServiceExt;

    // ==================== Test Mocks ====================

    enum MockBehavior {
        Respond(&'static str),
        StreamFragments(&'static [&'static str]),
        Fail,
    }

    struct MockGenerator {
        behavior: MockBehavior,
    }

    #[async_trait]
    impl Generator for MockGenerator {
        fn kind(&self) -> BackendKind {
            BackendKind::Stub
        }

        fn model(&self) -> Option<&str> {
            None
        }

        async fn generate(
            &self,
            _prompt: &Prompt,
            _cancel: &CancellationToken,
        ) -> Result<String, GeneratorError> {
            match &self.behavior {
                MockBehavior::Respond(text) => Ok(text.to_string()),
                MockBehavior::StreamFragments(fragments) => Ok(fragments.concat()),
                MockBehavior::Fail => Err(GeneratorError::UnexpectedStatus(500)),
            }
        }

        async fn generate_stream(
            &self,
            _prompt: &Prompt,
            sink: &mut dyn TokenSink,
            _cancel: &CancellationToken,
        ) -> Result<(), GeneratorError> {
            match &self.behavior {
                MockBehavior::Respond(text) => sink.write(text).await,
                MockBehavior::StreamFragments(fragments) => {
                    for fragment in *fragments {
                        sink.write(fragment).await?;
                    }
                    Ok(())
                }
                MockBehavior::Fail => Err(GeneratorError::UnexpectedStatus(500)),
            }
        }
    }

    #[derive(Debug)]
    struct Recorded {
        prompt: String,
        outcome: Result<String, String>,
        streaming: bool,
    }

    #[derive(Default)]
    struct SpyLogger {
        records: Mutex<Vec<Recorded>>,
    }

    impl InteractionLogger for SpyLogger {
        fn record_success(
            &self,
            prompt: &str,
            response: &str,
            streaming: bool,
            _started: Instant,
        ) -> Result<(), LoggerError> {
            self.records.lock().unwrap().push(Recorded {
                prompt: prompt.to_string(),
                outcome: Ok(response.to_string()),
                streaming,
            });
            Ok(())
        }

        fn record_failure(
            &self,
            prompt: &str,
            error: &str,
            streaming: bool,
            _started: Instant,
        ) -> Result<(), LoggerError> {
            self.records.lock().unwrap().push(Recorded {
                prompt: prompt.to_string(),
                outcome: Err(error.to_string()),
                streaming,
            });
            Ok(())
        }
    }

    fn test_app(behavior: MockBehavior) -> (axum::Router, Arc<SpyLogger>) {
        let logger = Arc::new(SpyLogger::default());
        let use_case = Arc::new(GenerateTextUseCase::new(
            Arc::new(MockGenerator { behavior }),
            logger.clone(),
        ));
        let state = AppState::new(use_case, logger.clone(), RequestGauge::new());
        (router(state), logger)
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn generate_returns_the_backend_response() {
        let (app, logger) = test_app(MockBehavior::Respond("hello there"));

        let response = app
            .oneshot(json_request("/generate", r#"{"prompt":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: GenerateResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.response, "hello there");

        let records = logger.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome.as_deref(), Ok("hello there"));
        assert!(!records[0].streaming);
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_with_400() {
        let (app, logger) = test_app(MockBehavior::Respond("never"));

        let response = app
            .oneshot(json_request("/generate", r#"{"prompt":""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.error, "prompt cannot be empty");

        // Rejected before the backend, still recorded as a failure
        let records = logger.records.lock().unwrap();
        assert!(records[0].outcome.is_err());
    }

    #[tokio::test]
    async fn missing_prompt_field_is_rejected_with_400() {
        let (app, _logger) = test_app(MockBehavior::Respond("never"));

        let response = app.oneshot(json_request("/generate", r#"{}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_with_400() {
        let (app, logger) = test_app(MockBehavior::Respond("never"));

        let response = app
            .oneshot(json_request("/generate", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.error, "Invalid request format");

        let records = logger.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prompt, "");
        assert!(records[0].outcome.is_err());
    }

    #[tokio::test]
    async fn backend_failure_is_a_generic_500() {
        let (app, logger) = test_app(MockBehavior::Fail);

        let response = app
            .oneshot(json_request("/generate", r#"{"prompt":"x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.error, "Failed to generate response");

        // The underlying error text is preserved in the record
        let records = logger.records.lock().unwrap();
        assert!(
            records[0]
                .outcome
                .as_ref()
                .unwrap_err()
                .contains("unexpected status code: 500")
        );
    }

    #[tokio::test]
    async fn stream_delivers_one_json_line_per_fragment() {
        let (app, logger) = test_app(MockBehavior::StreamFragments(&["a", "bc", "d"]));

        let response = app
            .oneshot(json_request("/generate/stream", r#"{"prompt":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let body = body_string(response).await;
        let tokens: Vec<String> = body
            .lines()
            .map(|line| {
                let chunk: TokenChunk = serde_json::from_str(line).unwrap();
                chunk.token
            })
            .collect();
        assert_eq!(tokens, vec!["a", "bc", "d"]);

        // The accumulated text was recorded as one streaming success
        let records = logger.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome.as_deref(), Ok("abcd"));
        assert!(records[0].streaming);
    }

    #[tokio::test]
    async fn stream_rejects_empty_prompt_before_any_chunk() {
        let (app, _logger) = test_app(MockBehavior::StreamFragments(&["never"]));

        let response = app
            .oneshot(json_request("/generate/stream", r#"{"prompt":"  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.error, "prompt cannot be empty");
    }

    #[tokio::test]
    async fn stream_maps_pre_stream_backend_failure_to_500() {
        let (app, _logger) = test_app(MockBehavior::Fail);

        let response = app
            .oneshot(json_request("/generate/stream", r#"{"prompt":"x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
