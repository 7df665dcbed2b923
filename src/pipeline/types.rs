use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::generation::GradeLevel;
use crate::vectordb::SearchFilters;

/// A user question and its request context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(default)]
    pub grade: GradeLevel,
    /// Restricts knowledge-base candidates to this topic.
    #[serde(default)]
    pub topic: Option<String>,
    /// Restricts knowledge-base candidates to the question's grade level.
    #[serde(default)]
    pub restrict_to_grade: bool,
    /// Accepts the best knowledge-base candidate even below the score threshold.
    #[serde(default)]
    pub best_effort: bool,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            grade: GradeLevel::default(),
            topic: None,
            restrict_to_grade: false,
            best_effort: false,
        }
    }

    pub fn with_grade(mut self, grade: GradeLevel) -> Self {
        self.grade = grade;
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn restrict_to_grade(mut self, restrict: bool) -> Self {
        self.restrict_to_grade = restrict;
        self
    }

    pub fn best_effort(mut self, best_effort: bool) -> Self {
        self.best_effort = best_effort;
        self
    }

    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            topic: self.topic.clone(),
            level: self
                .restrict_to_grade
                .then(|| self.grade.as_str().to_string()),
        }
    }

    /// Everything besides the text and model that changes the answer.
    pub fn context_key(&self) -> String {
        format!(
            "grade={};topic={};restrict={};best_effort={}",
            self.grade,
            self.topic.as_deref().unwrap_or(""),
            self.restrict_to_grade,
            self.best_effort
        )
    }
}

/// Tier that produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Knowledge-base content adapted by the generator.
    KnowledgeBase,
    /// Knowledge-base content returned as-is after the generator failed.
    KnowledgeBaseRaw,
    /// Generation grounded on web search results.
    WebAugmented,
    /// Generation without retrieved context.
    Direct,
    /// Every generated answer was rejected by the output gate; carries the static
    /// fallback message. Never cached.
    Filtered,
}

impl AnswerSource {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerSource::KnowledgeBase => "knowledge_base",
            AnswerSource::KnowledgeBaseRaw => "knowledge_base_raw",
            AnswerSource::WebAugmented => "web_augmented",
            AnswerSource::Direct => "direct",
            AnswerSource::Filtered => "filtered",
        }
    }
}

impl AnswerSource {
    pub fn is_cacheable(self) -> bool {
        self != AnswerSource::Filtered
    }
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gated answer. Immutable once cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub source: AnswerSource,
    pub text: String,
    pub confidence: f32,
    /// Knowledge-base document ids or web result URLs.
    pub sources: Vec<String>,
    /// Merged retrieval score of the knowledge-base document, if any.
    pub score: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineResponse {
    pub answer: Arc<Answer>,
    pub cache_hit: bool,
    pub elapsed_ms: u64,
}
