//! Backend selection types
//!
//! [`BackendKind`] names the available text-generation engines as a closed
//! enum, and [`BackendConfig`] carries what each kind needs at
//! construction time. Validation lives here so that a misconfigured remote
//! backend is rejected before a single request is served, never at call
//! time.

pub mod config;
pub mod kind;

pub use config::{BackendConfig, ConfigError};
pub use kind::BackendKind;
