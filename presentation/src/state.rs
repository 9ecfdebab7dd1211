//! Shared handler state

use minivault_application::ports::interaction_logger::InteractionLogger;
use minivault_application::ports::telemetry::RequestGauge;
use minivault_application::use_cases::generate_text::GenerateTextUseCase;
use std::sync::Arc;

/// Dependencies shared by all handlers.
///
/// Everything here is a process-wide singleton: the use case wraps the
/// selected backend and the interaction log, the gauge counts in-flight
/// requests, and the logger handle is used directly only for failures
/// that never reach the use case (malformed request bodies).
#[derive(Clone)]
pub struct AppState {
    pub generate: Arc<GenerateTextUseCase>,
    pub logger: Arc<dyn InteractionLogger>,
    pub gauge: Arc<RequestGauge>,
}

impl AppState {
    pub fn new(
        generate: Arc<GenerateTextUseCase>,
        logger: Arc<dyn InteractionLogger>,
        gauge: Arc<RequestGauge>,
    ) -> Self {
        Self {
            generate,
            logger,
            gauge,
        }
    }
}
