//! Backend adapters implementing the [`Generator`] port
//!
//! [`Generator`]: minivault_application::ports::generator::Generator

pub mod factory;
pub mod ollama;
pub mod stub;

pub use factory::{BackendSelection, select_backend};
pub use ollama::OllamaGenerator;
pub use stub::StubGenerator;
