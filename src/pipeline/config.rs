use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBED_TIMEOUT_SECS, DEFAULT_GENERATION_TIMEOUT_SECS, DEFAULT_INDEX_TIMEOUT_SECS,
    DEFAULT_KB_MIN_SCORE, DEFAULT_KEYWORD_PAGE_SIZE, DEFAULT_SCORE_THRESHOLD,
    DEFAULT_SEARCH_TIMEOUT_SECS,
};
use crate::retrieval::MergePolicy;
use crate::vectordb::DEFAULT_COLLECTION_NAME;

/// Orchestrator settings. Usually derived with [`crate::Config::pipeline_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub collection: String,
    /// Minimum similarity requested from the vector index.
    pub score_threshold: f32,
    /// Minimum merged score for the knowledge-base tier.
    pub kb_min_score: f32,
    pub keyword_page_size: u32,
    /// Weights and result count; `min_score` and `best_effort` are set per request.
    pub merge: MergePolicy,
    pub embed_timeout: Duration,
    pub index_timeout: Duration,
    pub generation_timeout: Duration,
    pub search_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            kb_min_score: DEFAULT_KB_MIN_SCORE,
            keyword_page_size: DEFAULT_KEYWORD_PAGE_SIZE,
            merge: MergePolicy::default(),
            embed_timeout: Duration::from_secs(DEFAULT_EMBED_TIMEOUT_SECS),
            index_timeout: Duration::from_secs(DEFAULT_INDEX_TIMEOUT_SECS),
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
        }
    }
}
