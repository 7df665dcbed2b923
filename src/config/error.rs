//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("failed to parse {name}='{value}': {reason}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A URL setting does not look like an HTTP(S) URL.
    #[error("invalid URL for {name}: '{value}'")]
    InvalidUrl { name: &'static str, value: String },

    /// A setting that must be non-empty is empty.
    #[error("{name} must not be empty")]
    Empty { name: &'static str },

    /// A score setting is outside `[0.0, 1.0]`.
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    ScoreOutOfRange { name: &'static str, value: f32 },

    /// A count or duration setting is zero.
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}
