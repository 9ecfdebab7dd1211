//! Prompt value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The validated input of a generation request (Value Object).
///
/// A prompt is valid iff it contains at least one non-whitespace
/// character. Validation happens here, at construction — a `Prompt` in
/// hand means no backend will ever see an empty input. The original text
/// is preserved untrimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prompt(String);

impl Prompt {
    /// Create a prompt, rejecting input that is empty after trimming.
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyPrompt);
        }
        Ok(Self(text))
    }

    /// The prompt text as given (untrimmed).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the prompt, returning the inner text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_empty_text() {
        let prompt = Prompt::new("Tell me a joke").unwrap();
        assert_eq!(prompt.as_str(), "Tell me a joke");
    }

    #[test]
    fn rejects_empty_text() {
        assert_eq!(Prompt::new("").unwrap_err(), DomainError::EmptyPrompt);
    }

    #[test]
    fn rejects_whitespace_only_text() {
        assert_eq!(Prompt::new("  \n\t ").unwrap_err(), DomainError::EmptyPrompt);
    }

    #[test]
    fn preserves_surrounding_whitespace() {
        // Validation trims, the value does not
        let prompt = Prompt::new("  hello  ").unwrap();
        assert_eq!(prompt.as_str(), "  hello  ");
    }
}
