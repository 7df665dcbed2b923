//! Query embedding.
//!
//! [`OllamaEmbedder`] calls a local Ollama server. [`HashEmbedder`] is a deterministic
//! offline stand-in for tests and for running without an embedding model.

mod error;
pub mod ollama;
pub mod stub;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


use async_trait::async_trait;

pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use ollama::OllamaEmbedder;
pub use stub::HashEmbedder;

/// Turns query text into a vector for similarity search.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Model identity, part of the query fingerprint.
    fn model(&self) -> &str;
}
