//! Question answering orchestrator.
//!
//! [`Pipeline::answer`] gates the question, consults the response cache, then walks the
//! answer tiers (knowledge base, web-augmented generation, direct generation) until one
//! produces an answer that passes the output gate. Answers are cached under the query
//! fingerprint; a degraded result never is.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod types;


pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use orchestrator::Pipeline;
pub use types::{Answer, AnswerSource, PipelineResponse, Question};
