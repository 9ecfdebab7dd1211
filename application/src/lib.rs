//! Application layer for minivault
//!
//! This crate contains the use cases and port definitions of the
//! generation pipeline. It depends only on the domain layer; adapters for
//! its ports (backends, the interaction log) live in the infrastructure
//! layer, and the HTTP surface that drives the use cases lives in the
//! presentation layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    generator::{CollectingSink, Generator, GeneratorError, RecordingSink, TokenSink},
    interaction_logger::{InteractionLogger, LoggerError, NoInteractionLogger},
    telemetry::{InFlightRequest, RequestGauge},
};
pub use use_cases::generate_text::{GenerateError, GenerateTextUseCase};
