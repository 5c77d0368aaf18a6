//! Error types for adloop
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::llm::LlmError;

/// All error types that can occur in adloop
#[derive(Debug, Error)]
pub enum AdLoopError {
    /// Malformed product triple from the input collaborator
    #[error("Invalid input: {0}")]
    InputValidation(String),

    /// Generation or evaluation service failed
    #[error("External call failed: {0}")]
    ExternalCall(String),

    /// Transport-level LLM failure
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Service answered, but not with the structure we asked for
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Output artifact could not be written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration is unusable
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid state transition or operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdLoopError {
    /// Whether this error came from the generation or evaluation boundary.
    ///
    /// These are fatal for the current run and are never retried.
    pub fn is_external_call(&self) -> bool {
        matches!(
            self,
            AdLoopError::ExternalCall(_) | AdLoopError::Llm(_) | AdLoopError::InvalidPayload(_)
        )
    }
}

/// Result type alias for adloop operations
pub type Result<T> = std::result::Result<T, AdLoopError>;
