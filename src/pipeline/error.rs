use thiserror::Error;

use crate::cache::CacheError;

#[derive(Debug, Error)]
/// Errors surfaced by [`super::Pipeline::answer`].
pub enum PipelineError {
    /// The question was rejected; the message is safe to show the user.
    #[error("{message}")]
    Validation {
        /// Machine-readable reason (`empty`, `out of domain`, `inappropriate`, ...).
        reason: &'static str,
        /// User-facing message.
        message: String,
    },

    /// Every answer tier failed.
    #[error("{message}")]
    ServiceDegraded {
        /// Fixed degraded-service message.
        message: &'static str,
    },

    /// The response cache was reset after lock poisoning.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl PipelineError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::Validation { .. })
    }
}

/// Convenience result type for the pipeline.
pub type PipelineResult<T> = Result<T, PipelineError>;
