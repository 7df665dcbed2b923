//! Cross-cutting, shared constants.
//!
//! Ranking weights and thresholds live here so the retrieval sources, the merger and the
//! pipeline agree on one scale. Prefer [`crate::retrieval::MergePolicy`] or
//! [`crate::config::Config`] when a value needs to change at runtime.

/// Weight applied to vector (semantic) scores when merging.
pub const VECTOR_WEIGHT: f32 = 0.7;
/// Weight applied to keyword scores when merging.
pub const KEYWORD_WEIGHT: f32 = 0.3;

/// Number of merged results kept after ranking.
pub const DEFAULT_TOP_K: usize = 5;

/// Minimum similarity requested from the vector index.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.3;

/// Keyword candidates must score strictly above this to be kept.
pub const KEYWORD_MIN_SCORE: f32 = 0.3;

/// Keyword score for a verbatim (case-insensitive) query match.
pub const KEYWORD_EXACT_SCORE: f32 = 1.0;
/// Keyword score for a shared normalized math expression.
pub const KEYWORD_EXPRESSION_SCORE: f32 = 0.8;
/// Multiplier applied to the fraction of query words found in a document.
pub const KEYWORD_WORD_RATIO_WEIGHT: f32 = 0.6;

/// Documents scanned per keyword search (bounded for latency).
pub const DEFAULT_KEYWORD_PAGE_SIZE: u32 = 100;

/// Minimum merged score for a candidate to count as a knowledge-base match.
pub const DEFAULT_KB_MIN_SCORE: f32 = 0.3;

/// Default response cache capacity.
pub const DEFAULT_CACHE_MAX_SIZE: usize = 500;
/// Default response cache TTL.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 60;

pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 180;
pub const DEFAULT_INDEX_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_EMBED_TIMEOUT_SECS: u64 = 10;

/// Output size of the offline stub embedder (matches `nomic-embed-text`).
pub const STUB_EMBEDDING_DIM: usize = 768;

/// Web results used as prompt context.
pub const WEB_CONTEXT_RESULTS: usize = 3;
/// Characters of each web result kept in the prompt context.
pub const WEB_CONTEXT_CHARS: usize = 500;

/// Shortest accepted question, in characters after sanitization.
pub const MIN_QUESTION_CHARS: usize = 3;
/// Longest accepted question, in characters after sanitization.
pub const MAX_QUESTION_CHARS: usize = 1000;

/// Returned when every fallback tier failed.
pub const DEGRADED_MESSAGE: &str = "I'm currently unable to process your question. \
Please ensure the language model service is running, or try again later.";

/// Returned by the output gate when a response carries no educational content.
pub const NON_EDUCATIONAL_FALLBACK: &str =
    "I can only provide educational mathematics content. Please ask a math question.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_weights_sum_to_one() {
        assert!((VECTOR_WEIGHT + KEYWORD_WEIGHT - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_keyword_scores_are_ordered() {
        assert!(KEYWORD_EXACT_SCORE > KEYWORD_EXPRESSION_SCORE);
        assert!(KEYWORD_EXPRESSION_SCORE > KEYWORD_WORD_RATIO_WEIGHT);
        assert!(KEYWORD_WORD_RATIO_WEIGHT > KEYWORD_MIN_SCORE);
    }
}
