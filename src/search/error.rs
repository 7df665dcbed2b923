use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by a web search provider. An empty result set is not an error.
pub enum SearchError {
    #[error("search request to '{url}' failed: {message}")]
    RequestFailed { url: String, message: String },

    #[error("invalid search response: {message}")]
    InvalidResponse { message: String },

    #[error("search provider is not configured")]
    NotConfigured,

    #[error("search timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Convenience result type for search.
pub type SearchResult<T> = Result<T, SearchError>;
