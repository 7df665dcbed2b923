use thiserror::Error;

/// Internal gate failures. Never escapes [`super::ContentGate`]; converted to a
/// [`super::ReasonCode::Internal`] verdict instead.
#[derive(Debug, Error)]
pub enum GateError {
    /// A rule's regex failed to compile at first use.
    #[error("rule pattern '{rule}' is unavailable")]
    PatternUnavailable { rule: &'static str },
}

pub type GateResult<T> = Result<T, GateError>;
