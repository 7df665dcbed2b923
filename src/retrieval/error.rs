use std::time::Duration;

use thiserror::Error;

use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors raised inside a candidate source. Sources log these and return no candidates.
pub enum RetrievalError {
    /// Index call failed.
    #[error("index error: {0}")]
    Index(#[from] VectorDbError),

    /// Index call did not finish in time.
    #[error("{source_kind} search timed out after {timeout:?}")]
    Timeout {
        /// Source that timed out.
        source_kind: &'static str,
        /// Configured timeout.
        timeout: Duration,
    },
}

/// Convenience result type for retrieval operations.
pub type RetrievalResult<T> = Result<T, RetrievalError>;
