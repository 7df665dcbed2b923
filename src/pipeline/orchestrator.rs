use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use super::config::PipelineConfig;
use super::error::{PipelineError, PipelineResult};
use super::types::{Answer, AnswerSource, PipelineResponse, Question};
use crate::cache::ResponseCache;
use crate::constants::{
    DEGRADED_MESSAGE, MAX_QUESTION_CHARS, MIN_QUESTION_CHARS, WEB_CONTEXT_RESULTS,
};
use crate::embedding::{EmbeddingError, QueryEmbedder};
use crate::gate::{ContentGate, Verdict};
use crate::generation::prompts::web_summary;
use crate::generation::{
    GenerationError, GenerationResult, TextGenerator, educational_prompt, format_web_context,
    knowledge_base_prompt,
};
use crate::hashing::{Fingerprint, fingerprint};
use crate::retrieval::{KeywordSource, MergedResult, RankMerger, VectorSource};
use crate::search::{SearchError, SearchProvider, WebResult};
use crate::vectordb::{KnowledgeIndex, VectorDbError};

/// Gated, cached, tiered question answering.
///
/// Tiers run in order until one yields an answer that passes the output gate:
/// knowledge base, web-augmented generation, direct generation. Every external call has
/// its own timeout and a failure only demotes to the next tier. A rejected direct answer
/// is returned as the static fallback and is not cached.
pub struct Pipeline<I> {
    config: PipelineConfig,
    gate: ContentGate,
    index: Arc<I>,
    vector: VectorSource<I>,
    keyword: KeywordSource<I>,
    embedder: Arc<dyn QueryEmbedder>,
    generator: Arc<dyn TextGenerator>,
    search: Arc<dyn SearchProvider>,
    cache: Arc<ResponseCache<Answer>>,
}

impl<I: KnowledgeIndex> Pipeline<I> {
    pub fn new(
        config: PipelineConfig,
        index: Arc<I>,
        embedder: Arc<dyn QueryEmbedder>,
        generator: Arc<dyn TextGenerator>,
        search: Arc<dyn SearchProvider>,
        cache: Arc<ResponseCache<Answer>>,
    ) -> Self {
        let vector = VectorSource::new(
            index.clone(),
            config.collection.clone(),
            config.merge.top_k as u64,
            config.score_threshold,
            config.index_timeout,
        );
        let keyword = KeywordSource::new(
            index.clone(),
            config.collection.clone(),
            config.keyword_page_size,
            config.merge.top_k,
            config.index_timeout,
        );

        Self {
            config,
            gate: ContentGate::new(),
            index,
            vector,
            keyword,
            embedder,
            generator,
            search,
            cache,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResponseCache<Answer>> {
        &self.cache
    }

    /// Succeeds when the knowledge index is reachable and the collection exists.
    pub async fn is_ready(&self) -> Result<(), VectorDbError> {
        self.index.is_ready(&self.config.collection).await
    }

    /// Answers `question`, serving from the cache when possible.
    #[instrument(skip(self, question), fields(query_len = question.text.len(), grade = %question.grade))]
    pub async fn answer(&self, question: &Question) -> PipelineResult<PipelineResponse> {
        let started = Instant::now();

        let sanitized = self.validate(question)?;
        let key = fingerprint(&sanitized, &question.context_key(), self.generator.model());

        if let Some(answer) = self.cache.get(&key)? {
            info!(source = %answer.source, "Cache hit");
            return Ok(Self::respond(answer, true, started));
        }

        let answer = match self.run_tiers(question, &sanitized).await {
            Some(answer) => Arc::new(answer),
            None => {
                warn!("All answer tiers failed");
                return Err(PipelineError::ServiceDegraded {
                    message: DEGRADED_MESSAGE,
                });
            }
        };

        if answer.source.is_cacheable() {
            self.store(key, answer.clone())?;
        }
        info!(
            source = %answer.source,
            confidence = answer.confidence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Question answered"
        );
        Ok(Self::respond(answer, false, started))
    }

    fn validate(&self, question: &Question) -> PipelineResult<String> {
        let verdict = self.gate.validate_input(&question.text);
        if !verdict.is_valid() {
            debug!(reason = verdict.reason.as_str(), rule = ?verdict.rule, "Question rejected");
            return Err(PipelineError::Validation {
                reason: verdict.reason.as_str(),
                message: verdict.reason.message().to_string(),
            });
        }

        let chars = verdict.text.chars().count();
        if chars < MIN_QUESTION_CHARS {
            return Err(PipelineError::Validation {
                reason: "too short",
                message: format!("Question too short (min {MIN_QUESTION_CHARS} characters)"),
            });
        }
        if chars > MAX_QUESTION_CHARS {
            return Err(PipelineError::Validation {
                reason: "too long",
                message: format!("Question too long (max {MAX_QUESTION_CHARS} characters)"),
            });
        }

        Ok(verdict.text)
    }

    fn store(&self, key: Fingerprint, answer: Arc<Answer>) -> PipelineResult<()> {
        self.cache.set(key, answer)?;
        Ok(())
    }

    fn respond(answer: Arc<Answer>, cache_hit: bool, started: Instant) -> PipelineResponse {
        PipelineResponse {
            answer,
            cache_hit,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    async fn run_tiers(&self, question: &Question, sanitized: &str) -> Option<Answer> {
        if let Some(answer) = self.knowledge_base_tier(question, sanitized).await {
            return Some(answer);
        }
        if let Some(answer) = self.web_tier(question, sanitized).await {
            return Some(answer);
        }
        self.direct_tier(question, sanitized).await
    }

    /// Vector and keyword candidates for `sanitized`, merged under this request's policy.
    pub async fn retrieve(&self, question: &Question, sanitized: &str) -> Vec<MergedResult> {
        let filters = question.filters();

        let vector_candidates = async {
            match self.embed(sanitized).await {
                Ok(vector) => self.vector.search(vector, &filters).await,
                Err(e) => {
                    warn!(error = %e, "Query embedding failed, skipping vector search");
                    Vec::new()
                }
            }
        };
        let keyword_candidates = self.keyword.search(sanitized, &filters);

        let (vector, keyword) = tokio::join!(vector_candidates, keyword_candidates);

        let policy = self
            .config
            .merge
            .with_min_score(self.config.kb_min_score)
            .with_best_effort(question.best_effort);
        RankMerger::new(policy).merge(vector, keyword)
    }

    async fn knowledge_base_tier(&self, question: &Question, sanitized: &str) -> Option<Answer> {
        let merged = self.retrieve(question, sanitized).await;
        let Some(best) = merged.into_iter().next() else {
            info!("No knowledge base match, trying web search");
            return None;
        };

        let doc_id = best.document.id().to_string();
        info!(document = %doc_id, score = best.final_score, "Knowledge base match");

        let prompt = knowledge_base_prompt(sanitized, &best.document.content);
        match self.generate(&prompt).await {
            Ok(text) => {
                let verdict = self.gate.validate_output(&text);
                if !verdict.is_valid() {
                    debug!(reason = verdict.reason.as_str(), "Knowledge base answer rejected by output gate");
                    return None;
                }
                Some(Answer {
                    source: AnswerSource::KnowledgeBase,
                    text: format!(
                        "**Based on Knowledge Base:**\n\n{}\n\n**Source:** {doc_id}",
                        verdict.text
                    ),
                    confidence: verdict.confidence,
                    sources: vec![doc_id],
                    score: Some(best.final_score),
                })
            }
            Err(e) => {
                warn!(error = %e, "Generation failed, returning raw knowledge base content");
                let raw = format!(
                    "**From Knowledge Base:**\n\n{}\n\n**Source:** {doc_id}",
                    best.document.content
                );
                let verdict = self.gate.validate_output(&raw);
                self.accept(verdict, AnswerSource::KnowledgeBaseRaw)
                    .map(|mut answer| {
                        answer.sources = vec![doc_id];
                        answer.score = Some(best.final_score);
                        answer
                    })
            }
        }
    }

    async fn web_tier(&self, question: &Question, sanitized: &str) -> Option<Answer> {
        let results = match self.web_search(sanitized).await {
            Ok(results) if !results.is_empty() => results,
            Ok(_) => {
                info!(provider = self.search.name(), "No web results");
                return None;
            }
            Err(e) => {
                warn!(error = %e, provider = self.search.name(), "Web search failed");
                return None;
            }
        };
        info!(results = results.len(), "Web results found");

        let context = format_web_context(&results);
        let prompt = educational_prompt(sanitized, &context, question.grade);
        let text = match self.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Web-augmented generation failed");
                return None;
            }
        };

        let verdict = self.gate.validate_output(&text);
        self.accept(verdict, AnswerSource::WebAugmented)
            .map(|mut answer| {
                answer.text = format!(
                    "**Search Found:**\n{}\n\n**Analysis:**\n{}",
                    web_summary(&results),
                    answer.text
                );
                answer.sources = results
                    .iter()
                    .take(WEB_CONTEXT_RESULTS)
                    .map(|r| r.id.clone())
                    .collect();
                answer
            })
    }

    async fn direct_tier(&self, question: &Question, sanitized: &str) -> Option<Answer> {
        let prompt = educational_prompt(sanitized, "", question.grade);
        let text = match self.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Direct generation failed");
                return None;
            }
        };
        let verdict = self.gate.validate_output(&text);
        if !verdict.is_valid() {
            warn!(reason = verdict.reason.as_str(), "Final answer rejected by output gate, returning fallback");
            return Some(Answer {
                source: AnswerSource::Filtered,
                text: verdict.text,
                confidence: verdict.confidence,
                sources: Vec::new(),
                score: None,
            });
        }
        self.accept(verdict, AnswerSource::Direct)
    }

    fn accept(&self, verdict: Verdict, source: AnswerSource) -> Option<Answer> {
        if !verdict.is_valid() {
            debug!(%source, reason = verdict.reason.as_str(), "Answer rejected by output gate");
            return None;
        }
        Some(Answer {
            source,
            text: verdict.text,
            confidence: verdict.confidence,
            sources: Vec::new(),
            score: None,
        })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let timeout = self.config.embed_timeout;
        match tokio::time::timeout(timeout, self.embedder.embed(text)).await {
            Ok(res) => res,
            Err(_) => Err(EmbeddingError::Timeout { timeout }),
        }
    }

    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        let timeout = self.config.generation_timeout;
        match tokio::time::timeout(timeout, self.generator.generate(prompt)).await {
            Ok(res) => res,
            Err(_) => Err(GenerationError::Timeout { timeout }),
        }
    }

    async fn web_search(&self, text: &str) -> Result<Vec<WebResult>, SearchError> {
        let timeout = self.config.search_timeout;
        match tokio::time::timeout(timeout, self.search.search(text)).await {
            Ok(res) => res,
            Err(_) => Err(SearchError::Timeout { timeout }),
        }
    }
}
