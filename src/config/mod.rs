//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `TUTOR_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_MAX_SIZE, DEFAULT_CACHE_TTL_SECS, DEFAULT_EMBED_TIMEOUT_SECS,
    DEFAULT_GENERATION_TIMEOUT_SECS, DEFAULT_INDEX_TIMEOUT_SECS, DEFAULT_KB_MIN_SCORE,
    DEFAULT_KEYWORD_PAGE_SIZE, DEFAULT_SCORE_THRESHOLD, DEFAULT_SEARCH_TIMEOUT_SECS,
    DEFAULT_TOP_K,
};
use crate::pipeline::PipelineConfig;
use crate::retrieval::MergePolicy;
use crate::vectordb::DEFAULT_COLLECTION_NAME;

/// Default Qdrant URL used when `TUTOR_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
/// Default Ollama URL used when `TUTOR_OLLAMA_URL` is not set.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_LLM_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Runtime configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `TUTOR_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Knowledge-base collection. Default: `math_knowledge`.
    pub collection: String,

    /// Ollama endpoint used for query embeddings. Default: `http://localhost:11434`.
    pub ollama_url: String,

    /// Generation model. Default: `llama3.1:8b`.
    pub llm_model: String,

    /// Embedding model. Default: `nomic-embed-text`.
    pub embedding_model: String,

    /// Serper API key; web search is disabled when unset.
    pub serper_api_key: Option<String>,

    /// Response cache capacity. Default: `500`.
    pub cache_max_size: usize,

    /// Response cache TTL. Default: 30 minutes.
    pub cache_ttl: Duration,

    /// Merged results kept per query. Default: `5`.
    pub top_k: usize,

    /// Minimum similarity requested from the vector index. Default: `0.3`.
    pub score_threshold: f32,

    /// Minimum merged score for a knowledge-base answer. Default: `0.3`.
    pub kb_min_score: f32,

    /// Documents scanned per keyword search. Default: `100`.
    pub keyword_page_size: u32,

    pub generation_timeout: Duration,
    pub index_timeout: Duration,
    pub search_timeout: Duration,
    pub embed_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            serper_api_key: None,
            cache_max_size: DEFAULT_CACHE_MAX_SIZE,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            top_k: DEFAULT_TOP_K,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            kb_min_score: DEFAULT_KB_MIN_SCORE,
            keyword_page_size: DEFAULT_KEYWORD_PAGE_SIZE,
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            index_timeout: Duration::from_secs(DEFAULT_INDEX_TIMEOUT_SECS),
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            embed_timeout: Duration::from_secs(DEFAULT_EMBED_TIMEOUT_SECS),
        }
    }
}

impl Config {
    const ENV_QDRANT_URL: &'static str = "TUTOR_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "TUTOR_COLLECTION";
    const ENV_OLLAMA_URL: &'static str = "TUTOR_OLLAMA_URL";
    const ENV_LLM_MODEL: &'static str = "TUTOR_LLM_MODEL";
    const ENV_EMBEDDING_MODEL: &'static str = "TUTOR_EMBEDDING_MODEL";
    const ENV_SERPER_API_KEY: &'static str = "TUTOR_SERPER_API_KEY";
    const ENV_CACHE_MAX_SIZE: &'static str = "TUTOR_CACHE_MAX_SIZE";
    const ENV_CACHE_TTL_SECS: &'static str = "TUTOR_CACHE_TTL_SECS";
    const ENV_TOP_K: &'static str = "TUTOR_TOP_K";
    const ENV_SCORE_THRESHOLD: &'static str = "TUTOR_SCORE_THRESHOLD";
    const ENV_KB_MIN_SCORE: &'static str = "TUTOR_KB_MIN_SCORE";
    const ENV_KEYWORD_PAGE_SIZE: &'static str = "TUTOR_KEYWORD_PAGE_SIZE";
    const ENV_GENERATION_TIMEOUT_SECS: &'static str = "TUTOR_GENERATION_TIMEOUT_SECS";
    const ENV_INDEX_TIMEOUT_SECS: &'static str = "TUTOR_INDEX_TIMEOUT_SECS";
    const ENV_SEARCH_TIMEOUT_SECS: &'static str = "TUTOR_SEARCH_TIMEOUT_SECS";
    const ENV_EMBED_TIMEOUT_SECS: &'static str = "TUTOR_EMBED_TIMEOUT_SECS";

    /// Every variable read by [`Config::from_env`].
    pub const ENV_VARS: [&'static str; 16] = [
        Self::ENV_QDRANT_URL,
        Self::ENV_COLLECTION,
        Self::ENV_OLLAMA_URL,
        Self::ENV_LLM_MODEL,
        Self::ENV_EMBEDDING_MODEL,
        Self::ENV_SERPER_API_KEY,
        Self::ENV_CACHE_MAX_SIZE,
        Self::ENV_CACHE_TTL_SECS,
        Self::ENV_TOP_K,
        Self::ENV_SCORE_THRESHOLD,
        Self::ENV_KB_MIN_SCORE,
        Self::ENV_KEYWORD_PAGE_SIZE,
        Self::ENV_GENERATION_TIMEOUT_SECS,
        Self::ENV_INDEX_TIMEOUT_SECS,
        Self::ENV_SEARCH_TIMEOUT_SECS,
        Self::ENV_EMBED_TIMEOUT_SECS,
    ];

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Malformed numbers are errors rather than silently ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection: Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection),
            ollama_url: Self::parse_string_from_env(Self::ENV_OLLAMA_URL, defaults.ollama_url),
            llm_model: Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model),
            embedding_model: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_MODEL,
                defaults.embedding_model,
            ),
            serper_api_key: Self::parse_optional_string_from_env(Self::ENV_SERPER_API_KEY),
            cache_max_size: Self::parse_number_from_env(
                Self::ENV_CACHE_MAX_SIZE,
                defaults.cache_max_size,
            )?,
            cache_ttl: Self::parse_secs_from_env(Self::ENV_CACHE_TTL_SECS, defaults.cache_ttl)?,
            top_k: Self::parse_number_from_env(Self::ENV_TOP_K, defaults.top_k)?,
            score_threshold: Self::parse_number_from_env(
                Self::ENV_SCORE_THRESHOLD,
                defaults.score_threshold,
            )?,
            kb_min_score: Self::parse_number_from_env(
                Self::ENV_KB_MIN_SCORE,
                defaults.kb_min_score,
            )?,
            keyword_page_size: Self::parse_number_from_env(
                Self::ENV_KEYWORD_PAGE_SIZE,
                defaults.keyword_page_size,
            )?,
            generation_timeout: Self::parse_secs_from_env(
                Self::ENV_GENERATION_TIMEOUT_SECS,
                defaults.generation_timeout,
            )?,
            index_timeout: Self::parse_secs_from_env(
                Self::ENV_INDEX_TIMEOUT_SECS,
                defaults.index_timeout,
            )?,
            search_timeout: Self::parse_secs_from_env(
                Self::ENV_SEARCH_TIMEOUT_SECS,
                defaults.search_timeout,
            )?,
            embed_timeout: Self::parse_secs_from_env(
                Self::ENV_EMBED_TIMEOUT_SECS,
                defaults.embed_timeout,
            )?,
        })
    }

    /// Checks value ranges and URL shapes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            (Self::ENV_QDRANT_URL, &self.qdrant_url),
            (Self::ENV_OLLAMA_URL, &self.ollama_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    name,
                    value: url.clone(),
                });
            }
        }

        for (name, value) in [
            (Self::ENV_COLLECTION, &self.collection),
            (Self::ENV_LLM_MODEL, &self.llm_model),
            (Self::ENV_EMBEDDING_MODEL, &self.embedding_model),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { name });
            }
        }

        for (name, value) in [
            (Self::ENV_SCORE_THRESHOLD, self.score_threshold),
            (Self::ENV_KB_MIN_SCORE, self.kb_min_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ScoreOutOfRange { name, value });
            }
        }

        let counts = [
            (Self::ENV_CACHE_MAX_SIZE, self.cache_max_size as u64),
            (Self::ENV_TOP_K, self.top_k as u64),
            (Self::ENV_KEYWORD_PAGE_SIZE, self.keyword_page_size as u64),
        ];
        let durations = [
            (Self::ENV_CACHE_TTL_SECS, self.cache_ttl),
            (Self::ENV_GENERATION_TIMEOUT_SECS, self.generation_timeout),
            (Self::ENV_INDEX_TIMEOUT_SECS, self.index_timeout),
            (Self::ENV_SEARCH_TIMEOUT_SECS, self.search_timeout),
            (Self::ENV_EMBED_TIMEOUT_SECS, self.embed_timeout),
        ];
        if let Some(&(name, _)) = counts.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Zero { name });
        }
        if let Some(&(name, _)) = durations.iter().find(|(_, d)| d.is_zero()) {
            return Err(ConfigError::Zero { name });
        }

        Ok(())
    }

    /// Orchestrator settings derived from this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            collection: self.collection.clone(),
            score_threshold: self.score_threshold,
            kb_min_score: self.kb_min_score,
            keyword_page_size: self.keyword_page_size,
            merge: MergePolicy::default().with_top_k(self.top_k),
            embed_timeout: self.embed_timeout,
            index_timeout: self.index_timeout,
            generation_timeout: self.generation_timeout,
            search_timeout: self.search_timeout,
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) if !value.trim().is_empty() => {
                value
                    .trim()
                    .parse()
                    .map_err(|e: T::Err| ConfigError::InvalidNumber {
                        name: var_name,
                        value: value.clone(),
                        reason: e.to_string(),
                    })
            }
            _ => Ok(default),
        }
    }

    fn parse_secs_from_env(var_name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        Self::parse_number_from_env(var_name, default.as_secs()).map(Duration::from_secs)
    }
}
