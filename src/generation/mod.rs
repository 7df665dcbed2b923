//! Generative model access and prompt construction.

pub mod client;
pub mod error;
pub mod prompts;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


use async_trait::async_trait;

pub use error::{GenerationError, GenerationResult};
pub use client::GenaiGenerator;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerator;
pub use prompts::{GradeLevel, educational_prompt, format_web_context, knowledge_base_prompt};

/// Produces an answer for a fully built prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> GenerationResult<String>;

    /// Model identity, part of the query fingerprint.
    fn model(&self) -> &str;
}
