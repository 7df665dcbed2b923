use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request to '{url}' failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },

    #[error("cannot embed empty text")]
    EmptyInput,

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("embedding timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}
