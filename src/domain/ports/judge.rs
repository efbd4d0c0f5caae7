//! Judge port - interface for the remote scoring model.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while talking to the judge endpoint.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    InvalidBody(String),

    #[error("judge returned an empty completion")]
    EmptyCompletion,
}

/// A chat-completion style model that answers a single user prompt.
#[async_trait]
pub trait JudgeModel: Send + Sync {
    /// Model identifier, for logs.
    fn model_id(&self) -> &str;

    /// Send one prompt and return the raw text of the reply.
    async fn complete(&self, prompt: &str) -> Result<String, JudgeError>;
}
