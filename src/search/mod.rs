//! Web search used as context for the second answer tier.

pub mod error;
pub mod serper;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::{SearchError, SearchResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSearch;
pub use serper::SerperSearch;

/// One web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    /// Result URL or provider-specific identifier.
    pub id: String,
    pub title: String,
    pub snippet: String,
    pub content: String,
}

impl WebResult {
    /// `content`, or `snippet` when content is empty.
    pub fn body(&self) -> &str {
        if self.content.is_empty() {
            &self.snippet
        } else {
            &self.content
        }
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns results for `text`; an empty list is not an error.
    async fn search(&self, text: &str) -> SearchResult<Vec<WebResult>>;

    fn name(&self) -> &str;
}

/// Provider used when no search backend is configured. Always returns no results.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSearch;

#[async_trait]
impl SearchProvider for NoopSearch {
    async fn search(&self, _text: &str) -> SearchResult<Vec<WebResult>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "noop"
    }
}
