//! Ordered, enumerable classification rules used by [`super::ContentGate`].
//!
//! Input rules run in [`InputRule::ORDERED`] order. Every rejecting rule precedes every
//! domain rule, so disallowed content wins over domain relevance. Output lines are kept
//! by [`LineRule`]s and confidence is the clamped sum of [`ConfidenceTerm`]s.

use regex::Regex;
use std::sync::LazyLock;

use super::error::{GateError, GateResult};
use super::verdict::ReasonCode;

macro_rules! rule_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── Disallowed ─────────────────────────────────────────────────────────────
rule_pattern!(
    RE_SECURITY_BYPASS,
    r"\b(?:hack|hacking|exploit|bypass|cheat|cheating)\b"
);
rule_pattern!(
    RE_PRIVACY_SENSITIVE,
    r"\b(?:personal|private|confidential|password|ssn)\b|\bphone\s+numbers?\b|\b(?:e-?mail|home)\s+address(?:es)?\b|\bsocial\s+security\b|[\w.+-]+@[\w-]+\.[a-z]{2,}"
);
rule_pattern!(
    RE_VIOLENCE_ILLEGAL,
    r"\b(?:violence|violent|harm|illegal|weapons?)\b"
);

// ── Structural numeric ─────────────────────────────────────────────────────
rule_pattern!(RE_OPERATOR_EXPRESSION, r"\d+[+\-*/^]\d+");
rule_pattern!(
    RE_MEASUREMENT,
    r"\d+\s*(?:meters?|feet|inches?|cm|km|miles?|seconds?|minutes?|hours?)"
);
rule_pattern!(RE_RATIO, r"\d+\s+\w+\s+\d+\s+\w+");

/// Case-insensitive substring vocabulary marking a query as mathematical.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    // core
    "derivative", "integral", "equation", "solve", "calculate", "function", "algebra",
    "calculus", "geometry", "trigonometry", "statistics", "probability", "matrix", "vector",
    "limit", "series", "polynomial", "logarithm", "exponential", "sin", "cos", "tan", "sqrt",
    "sum", "product", "factor", "prime", "theorem", "proof", "formula",
    // word problems
    "machines", "widgets", "hours", "minutes", "rate", "ratio", "proportion", "speed",
    "distance", "time", "work", "production", "efficiency", "cost", "price", "profit",
    "percentage", "percent", "discount",
    // geometry
    "area", "volume", "perimeter", "circumference", "radius", "diameter", "triangle",
    "square", "rectangle", "circle", "sphere", "cube", "angle", "degrees", "radians",
    "parallel", "perpendicular", "shape", "polygon", "vertex", "edge", "face", "surface",
    // units
    "meters", "feet", "inches", "centimeters", "kilometers", "miles", "seconds", "days",
    "weeks", "months", "years", "grams", "kilograms", "pounds", "ounces", "liters",
    "gallons",
    // problem solving
    "how many", "how much", "how long", "how far", "how fast", "find", "determine",
    "compute", "evaluate", "estimate",
];

/// Literal symbols marking a query as mathematical.
pub const DOMAIN_SYMBOLS: &[char] = &[
    '=', '+', '-', '*', '/', '^', '∫', '∑', '∏', 'π', '∞', '√', '%',
];

/// A response must contain at least one of these (case-insensitive).
pub const EDUCATIONAL_MARKERS: &[&str] = &[
    "step", "solution", "answer", "formula", "theorem", "proof", "calculate", "solve",
    "derivative", "integral", "equation",
];

/// Symbols that keep an output line.
pub const LINE_MATH_SYMBOLS: &[char] = &['=', '+', '-', '*', '/', '^', '∫', '∑', '∏', 'π', '∞', '√'];

/// Connective words that keep an output line.
pub const LINE_CONNECTIVES: &[&str] = &["step", "solution", "because", "therefore", "thus"];

/// Symbols counted by [`ConfidenceTerm::SymbolDensity`].
pub const CONFIDENCE_SYMBOLS: &[char] = &['=', '∫', '∑', '∏', 'π', '∞', '√', '^'];

/// Terms counted by [`ConfidenceTerm::DomainTerms`].
pub const CONFIDENCE_TERMS: &[&str] = &["derivative", "integral", "equation", "formula", "theorem"];

/// Raw query plus its lowercase form, computed once per validation.
#[derive(Debug)]
pub struct RuleInput<'a> {
    raw: &'a str,
    lower: String,
}

impl<'a> RuleInput<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
        }
    }

    pub fn raw(&self) -> &str {
        self.raw
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }
}

/// What a matching rule does to the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleEffect {
    /// Rejects the input with this reason; evaluation stops.
    Reject(ReasonCode),
    /// Marks the input as in-domain; evaluation stops.
    AcceptDomain,
}

/// Input classification rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputRule {
    /// Security-bypass vocabulary. Rejects as `inappropriate`.
    SecurityBypass,
    /// Privacy-sensitive requests (contact details, credentials). Rejects as `inappropriate`.
    PrivacySensitive,
    /// Violence or illegal activity. Rejects as `inappropriate`.
    ViolenceOrIllegal,
    /// Substring match against [`DOMAIN_KEYWORDS`].
    DomainKeyword,
    /// Two numbers joined by an operator, e.g. `12*4`.
    ///
    /// Checked before [`InputRule::DomainSymbol`], which matches every operator too.
    OperatorExpression,
    /// Literal match against [`DOMAIN_SYMBOLS`].
    DomainSymbol,
    /// Number followed by a unit word, e.g. `5 km`.
    Measurement,
    /// `<num> <word> <num> <word>`, e.g. `5 machines 5 hours`.
    Ratio,
}

impl InputRule {
    /// Evaluation order. Rejecting rules first.
    pub const ORDERED: [InputRule; 8] = [
        InputRule::SecurityBypass,
        InputRule::PrivacySensitive,
        InputRule::ViolenceOrIllegal,
        InputRule::DomainKeyword,
        InputRule::OperatorExpression,
        InputRule::DomainSymbol,
        InputRule::Measurement,
        InputRule::Ratio,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InputRule::SecurityBypass => "security_bypass",
            InputRule::PrivacySensitive => "privacy_sensitive",
            InputRule::ViolenceOrIllegal => "violence_or_illegal",
            InputRule::DomainKeyword => "domain_keyword",
            InputRule::DomainSymbol => "domain_symbol",
            InputRule::OperatorExpression => "operator_expression",
            InputRule::Measurement => "measurement",
            InputRule::Ratio => "ratio",
        }
    }

    pub fn effect(&self) -> RuleEffect {
        match self {
            InputRule::SecurityBypass
            | InputRule::PrivacySensitive
            | InputRule::ViolenceOrIllegal => RuleEffect::Reject(ReasonCode::Inappropriate),
            InputRule::DomainKeyword
            | InputRule::DomainSymbol
            | InputRule::OperatorExpression
            | InputRule::Measurement
            | InputRule::Ratio => RuleEffect::AcceptDomain,
        }
    }

    /// Returns `true` if the rule fires for `input`.
    pub fn matches(&self, input: &RuleInput<'_>) -> GateResult<bool> {
        match self {
            InputRule::SecurityBypass => self.regex_match(&RE_SECURITY_BYPASS, input.lower()),
            InputRule::PrivacySensitive => self.regex_match(&RE_PRIVACY_SENSITIVE, input.lower()),
            InputRule::ViolenceOrIllegal => {
                self.regex_match(&RE_VIOLENCE_ILLEGAL, input.lower())
            }
            InputRule::DomainKeyword => Ok(DOMAIN_KEYWORDS
                .iter()
                .any(|keyword| input.lower().contains(keyword))),
            InputRule::DomainSymbol => Ok(input.raw().contains(DOMAIN_SYMBOLS)),
            InputRule::OperatorExpression => {
                self.regex_match(&RE_OPERATOR_EXPRESSION, input.raw())
            }
            InputRule::Measurement => self.regex_match(&RE_MEASUREMENT, input.lower()),
            InputRule::Ratio => self.regex_match(&RE_RATIO, input.raw()),
        }
    }

    fn regex_match(&self, pattern: &LazyLock<Option<Regex>>, text: &str) -> GateResult<bool> {
        pattern
            .as_ref()
            .map(|re| re.is_match(text))
            .ok_or(GateError::PatternUnavailable { rule: self.name() })
    }
}

/// Output line filter rules. A line is kept if any rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRule {
    /// Line contains one of [`LINE_MATH_SYMBOLS`].
    MathSymbol,
    /// Line contains one of [`LINE_CONNECTIVES`] (case-insensitive).
    Connective,
    /// Line has any non-whitespace content.
    ///
    /// This makes the filter near-permissive: only blank lines are ever dropped.
    NonEmpty,
}

impl LineRule {
    pub const ORDERED: [LineRule; 3] = [LineRule::MathSymbol, LineRule::Connective, LineRule::NonEmpty];

    pub fn matches(&self, line: &str) -> bool {
        match self {
            LineRule::MathSymbol => line.contains(LINE_MATH_SYMBOLS),
            LineRule::Connective => {
                let lower = line.to_lowercase();
                LINE_CONNECTIVES.iter().any(|word| lower.contains(word))
            }
            LineRule::NonEmpty => !line.trim().is_empty(),
        }
    }

    /// Returns the first rule keeping `line`, if any.
    pub fn keeping(line: &str) -> Option<LineRule> {
        Self::ORDERED.into_iter().find(|rule| rule.matches(line))
    }
}

/// Additive terms of the output confidence heuristic.
///
/// The sum is clamped to `[0.0, 1.0]`. This is a coarse heuristic, not a calibrated
/// probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceTerm {
    /// 0.1 per [`CONFIDENCE_SYMBOLS`] occurrence, capped at 0.3.
    SymbolDensity,
    /// Flat 0.2 if "step" appears.
    StepMarker,
    /// 0.1 per [`CONFIDENCE_TERMS`] occurrence, capped at 0.3.
    DomainTerms,
    /// Flat 0.2 if longer than 100 characters.
    Length,
}

impl ConfidenceTerm {
    pub const ALL: [ConfidenceTerm; 4] = [
        ConfidenceTerm::SymbolDensity,
        ConfidenceTerm::StepMarker,
        ConfidenceTerm::DomainTerms,
        ConfidenceTerm::Length,
    ];

    /// Contribution of this term for `text` (`lower` is its lowercase form).
    pub fn contribution(&self, text: &str, lower: &str) -> f32 {
        match self {
            ConfidenceTerm::SymbolDensity => {
                let count = text.chars().filter(|c| CONFIDENCE_SYMBOLS.contains(c)).count();
                (count as f32 * 0.1).min(0.3)
            }
            ConfidenceTerm::StepMarker => {
                if lower.contains("step") {
                    0.2
                } else {
                    0.0
                }
            }
            ConfidenceTerm::DomainTerms => {
                let count: usize = CONFIDENCE_TERMS
                    .iter()
                    .map(|term| lower.matches(term).count())
                    .sum();
                (count as f32 * 0.1).min(0.3)
            }
            ConfidenceTerm::Length => {
                if text.chars().count() > 100 {
                    0.2
                } else {
                    0.0
                }
            }
        }
    }
}

/// Sums all [`ConfidenceTerm`]s and clamps the result.
pub fn score_confidence(text: &str) -> f32 {
    let lower = text.to_lowercase();
    ConfidenceTerm::ALL
        .iter()
        .map(|term| term.contribution(text, &lower))
        .sum::<f32>()
        .clamp(0.0, 1.0)
}
