//! Tutor library crate (used by the CLI and integration tests).
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`Pipeline`], [`Question`], [`PipelineResponse`], [`Answer`] - Tiered question answering
//! - [`Config`], [`ConfigError`] - Environment-backed configuration
//!
//! ## Building Blocks
//! - [`ContentGate`], [`Verdict`] - Input classification and output filtering
//! - [`VectorSource`], [`KeywordSource`], [`RankMerger`] - Hybrid retrieval
//! - [`ResponseCache`] - TTL + LRU response cache
//!
//! ## Collaborators
//! - [`KnowledgeIndex`] / [`QdrantIndex`] - Knowledge base access
//! - [`QueryEmbedder`], [`TextGenerator`], [`SearchProvider`] - External services
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gate;
pub mod generation;
pub mod hashing;
pub mod pipeline;
pub mod retrieval;
pub mod search;
pub mod vectordb;

pub use cache::{CacheEntry, CacheError, CacheStats, Clock, ResponseCache, SystemClock};
#[cfg(any(test, feature = "mock"))]
pub use cache::ManualClock;

pub use config::{Config, ConfigError};

pub use embedding::{EmbeddingError, HashEmbedder, OllamaEmbedder, QueryEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;

pub use gate::{ContentGate, ReasonCode, Verdict, sanitize};

pub use generation::{GenaiGenerator, GenerationError, GradeLevel, TextGenerator};
#[cfg(any(test, feature = "mock"))]
pub use generation::MockGenerator;

pub use hashing::{Fingerprint, fingerprint};

pub use pipeline::{
    Answer, AnswerSource, Pipeline, PipelineConfig, PipelineError, PipelineResponse,
    PipelineResult, Question,
};

pub use retrieval::{
    CandidateDocument, KeywordSource, MergePolicy, MergedResult, RankMerger, SourceKind,
    VectorSource,
};

pub use search::{NoopSearch, SearchError, SearchProvider, SerperSearch, WebResult};
#[cfg(any(test, feature = "mock"))]
pub use search::MockSearch;

pub use vectordb::{
    IndexedDocument, KnowledgeIndex, QdrantIndex, SearchFilters, SearchHit, VectorDbError,
};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockKnowledgeIndex;
