//! Prompt builders for each answer tier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{WEB_CONTEXT_CHARS, WEB_CONTEXT_RESULTS};
use crate::search::WebResult;

/// Audience level the answer is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeLevel {
    Elementary,
    #[default]
    Intermediate,
    Advanced,
}

impl GradeLevel {
    pub const ALL: [GradeLevel; 3] = [
        GradeLevel::Elementary,
        GradeLevel::Intermediate,
        GradeLevel::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GradeLevel::Elementary => "elementary",
            GradeLevel::Intermediate => "intermediate",
            GradeLevel::Advanced => "advanced",
        }
    }

    pub fn instructions(self) -> &'static str {
        match self {
            GradeLevel::Elementary => {
                "Use simple language and basic concepts. Explain each step clearly."
            }
            GradeLevel::Intermediate => {
                "Use standard mathematical terminology. Show detailed steps."
            }
            GradeLevel::Advanced => {
                "Use advanced mathematical concepts and notation as appropriate."
            }
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GradeLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("grade must be one of: elementary, intermediate, advanced (got '{s}')")
            })
    }
}

const ANSWER_SHAPE: &str = "Provide:
1. Numbered solution steps
2. Clear final answer
3. Brief explanation of key concepts used";

/// Asks the model to adapt a knowledge-base entry to the question.
pub fn knowledge_base_prompt(question: &str, kb_content: &str) -> String {
    format!(
        "You are a math professor. Use the following knowledge base content to answer the specific question.

Knowledge Base Content:
{kb_content}

Specific Question: {question}

Provide a step-by-step solution tailored to this specific question. If the knowledge base content doesn't exactly match, adapt the solution method to the current question."
    )
}

/// Grade-level prompt, with reference material when `context` is non-empty.
pub fn educational_prompt(question: &str, context: &str, grade: GradeLevel) -> String {
    let preamble = format!(
        "You are a math professor teaching {grade} level students. {}",
        grade.instructions()
    );

    if context.trim().is_empty() {
        format!("{preamble}\n\nQuestion: {question}\n\n{ANSWER_SHAPE}")
    } else {
        format!(
            "{preamble}\n\nBased on the following information, provide a clear step-by-step solution:\n\nReference Material:\n{context}\n\nQuestion: {question}\n\n{ANSWER_SHAPE}"
        )
    }
}

/// Numbered reference blocks from the top web results, each truncated.
pub fn format_web_context(results: &[WebResult]) -> String {
    results
        .iter()
        .take(WEB_CONTEXT_RESULTS)
        .enumerate()
        .filter_map(|(i, result)| {
            let body = result.body();
            if body.is_empty() {
                return None;
            }
            let truncated = truncate_chars(body, WEB_CONTEXT_CHARS);
            let ellipsis = if truncated.len() < body.len() { "..." } else { "" };
            Some(format!("Source {} ({}):\n{truncated}{ellipsis}", i + 1, result.title))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One `- title: snippet...` line per web result.
pub fn web_summary(results: &[WebResult]) -> String {
    results
        .iter()
        .take(WEB_CONTEXT_RESULTS)
        .map(|r| format!("- {}: {}...", r.title, truncate_chars(&r.snippet, 100)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Longest prefix of `text` with at most `max` chars.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
