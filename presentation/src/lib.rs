//! Presentation layer for minivault - the HTTP surface
//!
//! Routes `POST /generate` and `POST /generate/stream` into the
//! application layer, mapping [`GenerateError`] variants to status codes
//! and turning token streams into chunked NDJSON response bodies.
//!
//! [`GenerateError`]: minivault_application::use_cases::generate_text::GenerateError

pub mod handlers;
pub mod router;
pub mod state;
pub mod streaming;
pub mod types;

pub use router::router;
pub use state::AppState;
pub use streaming::NdjsonSink;
pub use types::{ErrorResponse, GenerateRequest, GenerateResponse, TokenChunk};
