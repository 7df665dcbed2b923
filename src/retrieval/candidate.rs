use serde::Serialize;

use crate::vectordb::IndexedDocument;

/// Which candidate source produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Vector,
    Keyword,
}

impl SourceKind {
    /// Lower value wins merge ties.
    pub fn priority(self) -> u8 {
        match self {
            SourceKind::Vector => 0,
            SourceKind::Keyword => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Vector => "vector",
            SourceKind::Keyword => "keyword",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub id: String,
    pub topic: Option<String>,
    pub grade_level: Option<String>,
    pub educational_notes: Option<String>,
}

/// A document returned by one candidate source. `score` is on that source's own scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateDocument {
    pub content: String,
    pub score: f32,
    pub source: SourceKind,
    pub metadata: DocumentMetadata,
}

impl CandidateDocument {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        score: f32,
        source: SourceKind,
    ) -> Self {
        Self {
            content: content.into(),
            score,
            source,
            metadata: DocumentMetadata {
                id: id.into(),
                topic: None,
                grade_level: None,
                educational_notes: None,
            },
        }
    }

    pub fn from_indexed(document: IndexedDocument, score: f32, source: SourceKind) -> Self {
        Self {
            content: document.content,
            score,
            source,
            metadata: DocumentMetadata {
                id: document.id,
                topic: document.topic,
                grade_level: document.grade_level,
                educational_notes: document.educational_notes,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }
}
