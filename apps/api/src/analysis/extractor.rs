//! Extractor — turns raw resume text into structured facts.
//!
//! Every function here is total: arbitrary input (including the empty string
//! and the inline error markers produced for unreadable documents) yields a
//! value, never an error.

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::analysis::lexicon::Lexicon;

/// Structured facts pulled out of a resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionFacts {
    /// Skill terms found, in lexicon order.
    pub skills_found: Vec<String>,
    /// Lowercased lines mentioning an education term, in input order.
    pub education_lines: Vec<String>,
    /// Largest "N years" figure in the text. `None` when undetermined.
    pub experience_years: Option<YearCount>,
}

/// A year figure exactly as written, without leading zeros. No upper bound:
/// figures that do not fit a machine integer keep their full digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearCount(String);

impl YearCount {
    /// `digits` must be ASCII digits only.
    pub fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            YearCount("0".to_string())
        } else {
            YearCount(trimmed.to_string())
        }
    }

    /// `None` when the figure does not fit a `u64`.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<u64> for YearCount {
    fn from(n: u64) -> Self {
        YearCount(n.to_string())
    }
}

impl Ord for YearCount {
    // Canonical digit strings: longer is larger, equal lengths compare digit by digit.
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for YearCount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for YearCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSON number when it fits a `u64`, otherwise the digit string.
impl Serialize for YearCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_u64() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl ExtractionFacts {
    /// Human-readable experience, e.g. "5 years" or "Not clearly mentioned".
    pub fn experience_label(&self) -> String {
        match &self.experience_years {
            Some(years) => format!("{years} years"),
            None => "Not clearly mentioned".to_string(),
        }
    }
}

/// Runs all three extractors over `text`.
pub fn extract_facts(text: &str, lexicon: &Lexicon) -> ExtractionFacts {
    ExtractionFacts {
        skills_found: extract_skills(text, lexicon)
            .into_iter()
            .map(String::from)
            .collect(),
        education_lines: extract_education(text, lexicon),
        experience_years: extract_experience_years(text),
    }
}

/// Returns the skill terms contained anywhere in `text`, in lexicon order.
pub fn extract_skills(text: &str, lexicon: &Lexicon) -> Vec<&'static str> {
    let text_lower = text.to_lowercase();
    let mut found: Vec<&'static str> = Vec::new();
    for &skill in lexicon.skills {
        if text_lower.contains(skill) && !found.contains(&skill) {
            found.push(skill);
        }
    }
    found
}

/// Returns every line that mentions an education term, lowercased.
/// Duplicated lines are kept.
pub fn extract_education(text: &str, lexicon: &Lexicon) -> Vec<String> {
    text.to_lowercase()
        .lines()
        .filter(|line| lexicon.education.iter().any(|term| line.contains(term)))
        .map(String::from)
        .collect()
}

fn years_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)([0-9]+)\+?\s+years?").expect("years pattern is a valid regex")
    })
}

/// Returns the largest `N years` / `N+ years` figure in `text`.
pub fn extract_experience_years(text: &str) -> Option<YearCount> {
    years_pattern()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|digits| YearCount::from_digits(digits.as_str()))
        .max()
}
