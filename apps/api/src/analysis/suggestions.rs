//! Suggestion engine — canned advice keyed on words the job description uses
//! and the resume does not.

use std::collections::HashSet;

/// Emitted when no rule fires.
pub const ALIGNED_FALLBACK: &str = "Great job! Your resume already aligns well.";

/// A rule fires when any of its trigger tokens is missing from the resume.
struct SuggestionRule {
    triggers: &'static [&'static str],
    message: &'static str,
}

/// Evaluated in order; output order follows this table.
const RULES: &[SuggestionRule] = &[
    SuggestionRule {
        triggers: &["python"],
        message: "Mention Python if you have experience with it.",
    },
    SuggestionRule {
        triggers: &["machine", "learning"],
        message: "Include Machine Learning projects or skills.",
    },
    SuggestionRule {
        triggers: &["team"],
        message: "Show teamwork or collaboration experience.",
    },
    SuggestionRule {
        triggers: &["project"],
        message: "Add details about relevant projects.",
    },
    SuggestionRule {
        triggers: &["experience"],
        message: "Clearly state your years of experience.",
    },
];

/// Lowercases `text` and splits it on runs of non-word characters.
/// Word characters are ASCII letters, digits and `_`. Empty tokens are dropped.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Returns the improvement suggestions for a resume against a job description.
/// Never empty: falls back to [`ALIGNED_FALLBACK`].
pub fn suggest(resume_text: &str, job_text: &str) -> Vec<String> {
    let resume_tokens = tokenize(resume_text);
    let missing: HashSet<String> = tokenize(job_text)
        .into_iter()
        .filter(|token| !resume_tokens.contains(token))
        .collect();

    let mut suggestions: Vec<String> = RULES
        .iter()
        .filter(|rule| rule.triggers.iter().any(|t| missing.contains(*t)))
        .map(|rule| rule.message.to_string())
        .collect();

    if suggestions.is_empty() {
        suggestions.push(ALIGNED_FALLBACK.to_string());
    }
    suggestions
}
