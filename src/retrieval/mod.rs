//! Candidate retrieval and rank fusion.
//!
//! Two sources feed the merger: [`VectorSource`] (semantic similarity over the knowledge
//! index) and [`KeywordSource`] (literal and pattern matching over one bounded page of the
//! corpus). Sources never fail outward; errors are logged and yield no candidates.
//! [`RankMerger`] fuses both lists with a weighted, deterministic policy.

pub mod candidate;
pub mod error;
pub mod keyword;
pub mod merge;
pub mod vector;

#[cfg(test)]
mod tests;

pub use candidate::{CandidateDocument, DocumentMetadata, SourceKind};
pub use error::{RetrievalError, RetrievalResult};
pub use keyword::{KeywordSource, keyword_score, math_expression_matches, word_match_ratio};
pub use merge::{MergePolicy, MergedResult, RankMerger};
pub use vector::VectorSource;
