//! Input/output content gate.
//!
//! The gate decides whether a query is in-domain and safe, sanitizes it, and checks a
//! generated answer before it is returned or cached. It never returns an error: internal
//! failures become a [`ReasonCode::Internal`] verdict.

pub mod error;
pub mod rules;
pub mod verdict;


pub use error::{GateError, GateResult};
pub use rules::{ConfidenceTerm, InputRule, LineRule, RuleEffect, RuleInput, score_confidence};
pub use verdict::{ReasonCode, Verdict};

use tracing::{debug, error};

use crate::constants::NON_EDUCATIONAL_FALLBACK;
use rules::EDUCATIONAL_MARKERS;

/// Strips `<>{}`, collapses whitespace runs to a single space and trims.
///
/// Characters are stripped before whitespace is collapsed so the result is idempotent.
pub fn sanitize(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}'))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Stateless content gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentGate;

impl ContentGate {
    pub fn new() -> Self {
        Self
    }

    /// Classifies and sanitizes a user query.
    ///
    /// Rules run on the sanitized text, so re-validating `verdict.text` yields the same
    /// verdict.
    pub fn validate_input(&self, text: &str) -> Verdict {
        match self.try_validate_input(text) {
            Ok(verdict) => verdict,
            Err(e) => {
                error!(error = %e, "Input validation failed internally");
                Verdict::rejected(ReasonCode::Internal, String::new(), None)
            }
        }
    }

    fn try_validate_input(&self, text: &str) -> GateResult<Verdict> {
        let sanitized = sanitize(text);
        if sanitized.is_empty() {
            return Ok(Verdict::rejected(ReasonCode::Empty, sanitized, None));
        }

        let input = RuleInput::new(&sanitized);
        for rule in InputRule::ORDERED {
            if !rule.matches(&input)? {
                continue;
            }
            debug!(rule = rule.name(), "Input rule matched");
            return Ok(match rule.effect() {
                RuleEffect::Reject(reason) => Verdict::rejected(reason, sanitized, Some(rule.name())),
                RuleEffect::AcceptDomain => Verdict::accepted(sanitized, 1.0, Some(rule.name())),
            });
        }

        Ok(Verdict::rejected(ReasonCode::OutOfDomain, sanitized, None))
    }

    /// Checks a generated answer, filters its lines and scores its confidence.
    pub fn validate_output(&self, text: &str) -> Verdict {
        let lower = text.to_lowercase();
        let marker = EDUCATIONAL_MARKERS
            .iter()
            .find(|marker| lower.contains(*marker));

        let Some(marker) = marker else {
            debug!(len = text.len(), "Output has no educational marker");
            return Verdict::rejected(
                ReasonCode::NotEducational,
                NON_EDUCATIONAL_FALLBACK.to_string(),
                None,
            );
        };

        let filtered = filter_lines(text);
        let confidence = score_confidence(&filtered);

        debug!(marker = *marker, confidence, "Output accepted");
        Verdict::accepted(filtered, confidence, Some("educational_marker"))
    }
}

/// Keeps lines matched by any [`LineRule`]; returns `text` unchanged if none survive.
pub fn filter_lines(text: &str) -> String {
    let kept: Vec<&str> = text
        .split('\n')
        .filter(|line| LineRule::keeping(line).is_some())
        .collect();

    if kept.is_empty() {
        text.to_string()
    } else {
        kept.join("\n")
    }
}
