//! Infrastructure layer for minivault
//!
//! Adapters for the application ports: the remote Ollama backend, the
//! deterministic stub, the backend factory with its fallback policy, the
//! JSONL interaction log, and the figment-based configuration loader.

pub mod backends;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use backends::{
    factory::{BackendSelection, select_backend},
    ollama::OllamaGenerator,
    stub::StubGenerator,
};
pub use config::{file_config::FileConfig, loader::ConfigLoader};
pub use logging::interaction_log::{InteractionLog, LogRecord};
