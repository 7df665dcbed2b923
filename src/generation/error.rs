use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by a text generator.
pub enum GenerationError {
    /// The model call failed.
    #[error("generation with '{model}' failed: {message}")]
    RequestFailed {
        /// Model name.
        model: String,
        /// Error message.
        message: String,
    },

    /// The model returned no text.
    #[error("model '{model}' returned an empty response")]
    EmptyResponse {
        /// Model name.
        model: String,
    },

    /// The call did not finish in time.
    #[error("generation timed out after {timeout:?}")]
    Timeout {
        /// Configured timeout.
        timeout: Duration,
    },
}

/// Convenience result type for generation.
pub type GenerationResult<T> = Result<T, GenerationError>;
