use serde::Serialize;

/// Why the gate accepted or rejected a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Accepted,
    Empty,
    OutOfDomain,
    Inappropriate,
    NotEducational,
    Internal,
}

impl ReasonCode {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Accepted => "ok",
            ReasonCode::Empty => "empty",
            ReasonCode::OutOfDomain => "out of domain",
            ReasonCode::Inappropriate => "inappropriate",
            ReasonCode::NotEducational => "not educational",
            ReasonCode::Internal => "internal",
        }
    }

    /// User-facing explanation for a rejection.
    pub fn message(&self) -> &'static str {
        match self {
            ReasonCode::Accepted => "Accepted.",
            ReasonCode::Empty => "Question cannot be empty.",
            ReasonCode::OutOfDomain => {
                "This system is focused on mathematics education only. Please ask math-related questions."
            }
            ReasonCode::Inappropriate => {
                "Please keep questions appropriate for educational purposes."
            }
            ReasonCode::NotEducational => crate::constants::NON_EDUCATIONAL_FALLBACK,
            ReasonCode::Internal => "Unable to process text. Please try again.",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured accept/reject outcome of the content gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// `true` if the text may proceed.
    pub valid: bool,
    pub reason: ReasonCode,
    /// Sanitized input, filtered output, or the static fallback message.
    pub text: String,
    /// Always within `[0.0, 1.0]`.
    pub confidence: f32,
    /// Name of the rule that decided the verdict, if one did.
    pub rule: Option<&'static str>,
}

impl Verdict {
    pub(crate) fn accepted(text: String, confidence: f32, rule: Option<&'static str>) -> Self {
        Self {
            valid: true,
            reason: ReasonCode::Accepted,
            text,
            confidence: confidence.clamp(0.0, 1.0),
            rule,
        }
    }

    pub(crate) fn rejected(reason: ReasonCode, text: String, rule: Option<&'static str>) -> Self {
        Self {
            valid: false,
            reason,
            text,
            confidence: 0.0,
            rule,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
