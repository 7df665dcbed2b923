use std::collections::HashMap;

use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{Condition, Filter, PointId, RetrievedPoint, ScoredPoint, Value};
use serde::{Deserialize, Serialize};

pub const PAYLOAD_CONTENT: &str = "page_content";
pub const PAYLOAD_SOURCE_ID: &str = "source_id";
pub const PAYLOAD_TOPIC: &str = "topic";
pub const PAYLOAD_GRADE_LEVEL: &str = "grade_level";
pub const PAYLOAD_NOTES: &str = "educational_notes";

/// Optional payload filters. When both are set, both must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchFilters {
    pub topic: Option<String>,
    pub level: Option<String>,
}

impl SearchFilters {
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.topic.is_none() && self.level.is_none()
    }

    /// Returns `true` if `doc` satisfies every configured filter.
    pub fn accepts(&self, doc: &IndexedDocument) -> bool {
        let topic_ok = self
            .topic
            .as_ref()
            .is_none_or(|t| doc.topic.as_deref() == Some(t.as_str()));
        let level_ok = self
            .level
            .as_ref()
            .is_none_or(|l| doc.grade_level.as_deref() == Some(l.as_str()));
        topic_ok && level_ok
    }

    /// Builds the Qdrant payload filter (`None` when no filter is set).
    pub fn to_qdrant(&self) -> Option<Filter> {
        let mut conditions = Vec::new();
        if let Some(topic) = &self.topic {
            conditions.push(Condition::matches(PAYLOAD_TOPIC, topic.clone()));
        }
        if let Some(level) = &self.level {
            conditions.push(Condition::matches(PAYLOAD_GRADE_LEVEL, level.clone()));
        }
        if conditions.is_empty() {
            None
        } else {
            Some(Filter::must(conditions))
        }
    }
}

/// A knowledge-base document as stored in the index payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// `source_id` payload field, falling back to the point id.
    pub id: String,
    pub content: String,
    pub topic: Option<String>,
    pub grade_level: Option<String>,
    pub educational_notes: Option<String>,
}

impl IndexedDocument {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            topic: None,
            grade_level: None,
            educational_notes: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_grade_level(mut self, level: impl Into<String>) -> Self {
        self.grade_level = Some(level.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.educational_notes = Some(notes.into());
        self
    }

    pub fn from_retrieved_point(point: RetrievedPoint) -> Option<Self> {
        Self::from_parts(point.id, point.payload)
    }

    fn from_parts(id: Option<PointId>, payload: HashMap<String, Value>) -> Option<Self> {
        let point_id = match id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n.to_string(),
            Some(PointIdOptions::Uuid(u)) => u,
            None => return None,
        };

        let text = |key: &str| {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        Some(Self {
            id: text(PAYLOAD_SOURCE_ID).unwrap_or(point_id),
            content: text(PAYLOAD_CONTENT).unwrap_or_default(),
            topic: text(PAYLOAD_TOPIC),
            grade_level: text(PAYLOAD_GRADE_LEVEL),
            educational_notes: text(PAYLOAD_NOTES),
        })
    }
}

/// Similarity search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub document: IndexedDocument,
    pub score: f32,
}

impl SearchHit {
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let score = point.score;
        IndexedDocument::from_parts(point.id, point.payload)
            .map(|document| SearchHit { document, score })
    }
}
