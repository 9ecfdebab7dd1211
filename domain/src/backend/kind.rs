//! Backend kind value object

use super::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The available backend kinds (Value Object).
///
/// A closed enum rather than a free-form string: every place that
/// dispatches on the backend does so over these two variants, and an
/// unknown kind is a [`ConfigError`] at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// A remote model server speaking the Ollama generate protocol.
    Remote,
    /// The deterministic built-in stub.
    Stub,
}

impl BackendKind {
    /// Get the string identifier for this kind, as written in config
    /// files and log records.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Remote => "remote",
            BackendKind::Stub => "stub",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" | "ollama" => Ok(BackendKind::Remote),
            "stub" => Ok(BackendKind::Stub),
            other => Err(ConfigError::UnsupportedKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!("remote".parse::<BackendKind>().unwrap(), BackendKind::Remote);
        assert_eq!("stub".parse::<BackendKind>().unwrap(), BackendKind::Stub);
    }

    #[test]
    fn accepts_ollama_alias() {
        assert_eq!("ollama".parse::<BackendKind>().unwrap(), BackendKind::Remote);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = "gpt4all".parse::<BackendKind>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedKind(k) if k == "gpt4all"));
    }

    #[test]
    fn round_trips_as_str() {
        for kind in [BackendKind::Remote, BackendKind::Stub] {
            assert_eq!(kind.as_str().parse::<BackendKind>().unwrap(), kind);
        }
    }
}
