//! Ports (interfaces) for external dependencies
//!
//! These define the contracts between the application core and the
//! adapters in the infrastructure and presentation layers.

pub mod generator;
pub mod interaction_logger;
pub mod telemetry;
