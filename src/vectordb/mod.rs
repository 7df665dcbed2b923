//! Knowledge-base index access (Qdrant).

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{KnowledgeIndex, QdrantIndex};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockKnowledgeIndex, cosine_similarity};
pub use model::{IndexedDocument, SearchFilters, SearchHit};

pub const DEFAULT_COLLECTION_NAME: &str = "math_knowledge";
