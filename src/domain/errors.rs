//! Domain errors for the benchmark harness.

use thiserror::Error;

/// Domain-level errors that can occur while running a benchmark.
///
/// Per-agent failures never surface here: they are folded into the agent's
/// score record. These errors are reserved for things that stop the whole
/// harness, such as unusable configuration or an unwritable history file.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("History persistence failed for {path}: {reason}")]
    PersistenceFailed { path: String, reason: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
