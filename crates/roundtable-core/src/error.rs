//! Error types for the Roundtable engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the Roundtable engine.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum MeetingError {
    /// Configuration error, raised at meeting construction and never at
    /// runtime (e.g., no non-moderator personas, zero round budget).
    #[error("Configuration error: {0}")]
    Config(String),

    /// External utterance generation failed for one turn.
    ///
    /// Recovered locally by the runner; a single generation failure is
    /// never fatal to the meeting.
    #[error("Generation failed for '{persona}': {message}")]
    Generation { persona: String, message: String },

    /// Requested persona does not exist in the roster.
    #[error("Persona not found: '{0}'")]
    PersonaNotFound(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MeetingError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Generation error
    pub fn generation(persona: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            persona: persona.into(),
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a generation error
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }
}

/// Conversion from String (for error messages)
impl From<String> for MeetingError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, MeetingError>`.
pub type Result<T> = std::result::Result<T, MeetingError>;
