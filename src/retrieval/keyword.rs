use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, instrument, warn};

use super::candidate::{CandidateDocument, SourceKind};
use super::error::{RetrievalError, RetrievalResult};
use crate::constants::{
    KEYWORD_EXACT_SCORE, KEYWORD_EXPRESSION_SCORE, KEYWORD_MIN_SCORE, KEYWORD_WORD_RATIO_WEIGHT,
};
use crate::vectordb::{KnowledgeIndex, SearchFilters};

/// `f(x) = value` style expressions.
static RE_MATH_EXPRESSION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[a-z]\([^)]+\)\s*=\s*\S+").ok());

/// Literal and pattern matching over one bounded page of the corpus.
pub struct KeywordSource<I> {
    index: Arc<I>,
    collection: String,
    page_size: u32,
    top_k: usize,
    timeout: Duration,
}

impl<I: KnowledgeIndex> KeywordSource<I> {
    pub fn new(
        index: Arc<I>,
        collection: impl Into<String>,
        page_size: u32,
        top_k: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            index,
            collection: collection.into(),
            page_size,
            top_k,
            timeout,
        }
    }

    /// Scores every document of the scrolled page against `text`; empty on any failure.
    #[instrument(skip(self, text, filters), fields(query_len = text.len(), page_size = self.page_size))]
    pub async fn search(&self, text: &str, filters: &SearchFilters) -> Vec<CandidateDocument> {
        match self.try_search(text, filters).await {
            Ok(candidates) => {
                debug!(candidates = candidates.len(), "Keyword search complete");
                candidates
            }
            Err(e) => {
                warn!(error = %e, collection = %self.collection, "Keyword search failed, continuing without keyword candidates");
                Vec::new()
            }
        }
    }

    async fn try_search(
        &self,
        text: &str,
        filters: &SearchFilters,
    ) -> RetrievalResult<Vec<CandidateDocument>> {
        let call = self.index.scroll(&self.collection, self.page_size, filters);
        let documents = match tokio::time::timeout(self.timeout, call).await {
            Ok(res) => res?,
            Err(_) => {
                return Err(RetrievalError::Timeout {
                    source_kind: SourceKind::Keyword.as_str(),
                    timeout: self.timeout,
                });
            }
        };

        let query = text.to_lowercase();
        let mut candidates: Vec<CandidateDocument> = documents
            .into_iter()
            .filter_map(|doc| {
                let score = keyword_score(&query, &doc.content.to_lowercase());
                (score > KEYWORD_MIN_SCORE)
                    .then(|| CandidateDocument::from_indexed(doc, score, SourceKind::Keyword))
            })
            .collect();

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id().cmp(b.id())));
        candidates.truncate(self.top_k);
        Ok(candidates)
    }
}

/// Scores `content` against `query`; both must already be lowercased.
///
/// Verbatim containment beats a matching math expression, which beats the
/// matched-word ratio.
pub fn keyword_score(query: &str, content: &str) -> f32 {
    if query.is_empty() {
        return 0.0;
    }
    if content.contains(query) {
        return KEYWORD_EXACT_SCORE;
    }
    if math_expression_matches(query, content) {
        return KEYWORD_EXPRESSION_SCORE;
    }
    word_match_ratio(query, content) * KEYWORD_WORD_RATIO_WEIGHT
}

/// Fraction of distinct query words that occur in `content`.
pub fn word_match_ratio(query: &str, content: &str) -> f32 {
    let words: HashSet<&str> = query.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let matched = words.iter().filter(|w| content.contains(*w)).count();
    matched as f32 / words.len() as f32
}

/// Concatenated math expressions of `text` with all whitespace removed.
pub fn normalized_math_expressions(text: &str) -> Option<String> {
    let re = RE_MATH_EXPRESSION.as_ref()?;
    let joined: String = re
        .find_iter(text)
        .flat_map(|m| m.as_str().chars())
        .filter(|c| !c.is_whitespace())
        .collect();
    (!joined.is_empty()).then_some(joined)
}

/// `true` if the query's normalized expressions occur inside the content's.
pub fn math_expression_matches(query: &str, content: &str) -> bool {
    match (
        normalized_math_expressions(query),
        normalized_math_expressions(content),
    ) {
        (Some(q), Some(c)) => c.contains(&q),
        _ => false,
    }
}
