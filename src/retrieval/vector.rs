use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::candidate::{CandidateDocument, SourceKind};
use super::error::{RetrievalError, RetrievalResult};
use crate::vectordb::{KnowledgeIndex, SearchFilters};

/// Semantic similarity candidates from the knowledge index.
pub struct VectorSource<I> {
    index: Arc<I>,
    collection: String,
    top_k: u64,
    score_threshold: f32,
    timeout: Duration,
}

impl<I: KnowledgeIndex> VectorSource<I> {
    pub fn new(
        index: Arc<I>,
        collection: impl Into<String>,
        top_k: u64,
        score_threshold: f32,
        timeout: Duration,
    ) -> Self {
        Self {
            index,
            collection: collection.into(),
            top_k,
            score_threshold,
            timeout,
        }
    }

    /// Returns candidates in descending score order; empty on any failure.
    #[instrument(skip(self, vector, filters), fields(dim = vector.len(), top_k = self.top_k))]
    pub async fn search(&self, vector: Vec<f32>, filters: &SearchFilters) -> Vec<CandidateDocument> {
        match self.try_search(vector, filters).await {
            Ok(candidates) => {
                debug!(candidates = candidates.len(), "Vector search complete");
                candidates
            }
            Err(e) => {
                warn!(error = %e, collection = %self.collection, "Vector search failed, continuing without vector candidates");
                Vec::new()
            }
        }
    }

    async fn try_search(
        &self,
        vector: Vec<f32>,
        filters: &SearchFilters,
    ) -> RetrievalResult<Vec<CandidateDocument>> {
        let call = self.index.search(
            &self.collection,
            vector,
            self.top_k,
            Some(self.score_threshold),
            filters,
        );

        let hits = match tokio::time::timeout(self.timeout, call).await {
            Ok(res) => res?,
            Err(_) => {
                return Err(RetrievalError::Timeout {
                    source_kind: SourceKind::Vector.as_str(),
                    timeout: self.timeout,
                });
            }
        };

        Ok(hits
            .into_iter()
            .map(|hit| CandidateDocument::from_indexed(hit.document, hit.score, SourceKind::Vector))
            .collect())
    }
}
