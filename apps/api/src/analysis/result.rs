//! Result assembly and the downloadable feedback text.

use std::fmt::{Display, Write};

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

use crate::analysis::extractor::{extract_facts, extract_skills, ExtractionFacts};
use crate::analysis::lexicon::Lexicon;
use crate::analysis::scorer::{score_breakdown, ScoreBreakdown};
use crate::analysis::suggestions::suggest;

/// Timestamp layout used in feedback text and history listings.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Coarse verdict on the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLevel {
    Great,
    Moderate,
    Low,
}

impl MatchLevel {
    /// > 70 is great, > 40 moderate, anything else low.
    pub fn from_score(final_score: u8) -> Self {
        if final_score > 70 {
            MatchLevel::Great
        } else if final_score > 40 {
            MatchLevel::Moderate
        } else {
            MatchLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchLevel::Great => "Great match!",
            MatchLevel::Moderate => "Moderate match.",
            MatchLevel::Low => "Low match.",
        }
    }
}

/// Outcome of analysing one resume against one job description.
/// Built once by [`analyze`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub resume_name: String,
    pub job_name: String,
    pub breakdown: ScoreBreakdown,
    pub match_level: MatchLevel,
    /// Skill terms found in the resume, lexicon order.
    pub matched_skills: Vec<String>,
    /// The remaining skill terms, lexicon order.
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
    pub facts: ExtractionFacts,
    /// Set when the resume could not be converted to text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inputs to [`analyze`].
pub struct AnalysisInput<'a> {
    pub resume_name: &'a str,
    pub job_name: &'a str,
    pub resume_text: &'a str,
    pub job_text: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Runs extraction, scoring and suggestions over already-extracted text.
pub fn analyze(input: AnalysisInput<'_>, lexicon: &Lexicon) -> AnalysisResult {
    let AnalysisInput {
        resume_name,
        job_name,
        resume_text,
        job_text,
        created_at,
    } = input;

    let breakdown = score_breakdown(resume_text, job_text, lexicon);
    let matched = extract_skills(resume_text, lexicon);
    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = lexicon
        .skills
        .iter()
        .map(|skill| skill.to_string())
        .partition(|skill| matched.iter().any(|m| *m == skill.as_str()));

    AnalysisResult {
        resume_name: resume_name.to_string(),
        job_name: job_name.to_string(),
        match_level: MatchLevel::from_score(breakdown.final_score),
        breakdown,
        matched_skills,
        missing_skills,
        suggestions: suggest(resume_text, job_text),
        facts: extract_facts(resume_text, lexicon),
        extraction_error: None,
        created_at,
    }
}

impl AnalysisResult {
    /// Marks this result as produced from an unreadable document.
    pub fn with_extraction_error(mut self, error: impl Into<String>) -> Self {
        self.extraction_error = Some(error.into());
        self
    }

    /// Plain-text feedback, timestamps in the server's local time zone.
    pub fn feedback_text(&self) -> String {
        self.feedback_text_in(&Local)
    }

    /// Plain-text feedback with timestamps rendered in `tz`.
    pub fn feedback_text_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let b = &self.breakdown;
        let mut txt = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(txt, "Resume: {}", self.resume_name);
        let _ = writeln!(txt, "Job: {}", self.job_name);
        let _ = writeln!(txt, "Score: {}%\n", b.final_score);
        txt.push_str("Breakdown:\n");
        let _ = writeln!(txt, " - Skills: {}%", b.skill_score);
        let _ = writeln!(txt, " - Experience: {}%", b.experience_score);
        let _ = writeln!(txt, " - Education: {}%\n", b.education_score);
        txt.push_str("Suggestions:\n");
        for suggestion in &self.suggestions {
            let _ = writeln!(txt, " - {suggestion}");
        }
        if !self.missing_skills.is_empty() {
            let _ = writeln!(txt, "\nMissing keywords: {}", self.missing_skills.join(", "));
        }
        let _ = write!(txt, "\nGenerated at: {}", format_timestamp(&self.created_at, tz));
        txt
    }
}

/// Renders `ts` in `tz` using [`TIMESTAMP_FORMAT`].
pub fn format_timestamp<Tz>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ts.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extractor::YearCount;
    use crate::analysis::lexicon::{STANDARD, SKILL_TERMS};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    fn run(resume_text: &str, job_text: &str) -> AnalysisResult {
        analyze(
            AnalysisInput {
                resume_name: "jane.pdf",
                job_name: "backend.txt",
                resume_text,
                job_text,
                created_at: fixed_time(),
            },
            &STANDARD,
        )
    }

    fn assert_partition(result: &AnalysisResult) {
        for skill in &result.matched_skills {
            assert!(!result.missing_skills.contains(skill), "{skill} in both sets");
        }
        let mut union: Vec<&str> = result
            .matched_skills
            .iter()
            .chain(result.missing_skills.iter())
            .map(String::as_str)
            .collect();
        union.sort_unstable();
        let mut lexicon = SKILL_TERMS.to_vec();
        lexicon.sort_unstable();
        assert_eq!(union, lexicon);
    }

    #[test]
    fn test_matched_and_missing_partition_lexicon() {
        let samples = [
            "",
            "Python, Django and Flask with PostgreSQL",
            "machine learning + data analysis + html + javascript + sql + api",
            "∆∆∆ nothing useful ∆∆∆",
        ];
        for text in samples {
            assert_partition(&run(text, "whatever"));
        }
    }

    #[test]
    fn test_missing_skills_in_lexicon_order() {
        let result = run("SQL and Python", "");
        assert_eq!(result.matched_skills, vec!["python", "sql"]);
        assert_eq!(result.missing_skills[0], "django");
        assert_eq!(result.missing_skills.last().map(String::as_str), Some("data analysis"));
    }

    #[test]
    fn test_scenario_result() {
        let result = run(
            "I have 3 years of experience with Python and SQL, B.Tech in Engineering",
            "Looking for a Python developer with machine learning experience and teamwork",
        );
        assert_eq!(result.breakdown.skill_score, 20);
        assert_eq!(result.facts.experience_years, Some(YearCount::from(3)));
        assert!(result.matched_skills.contains(&"python".to_string()));
        assert!(result.matched_skills.contains(&"sql".to_string()));
        assert!(result
            .suggestions
            .contains(&"Include Machine Learning projects or skills.".to_string()));
        assert_eq!(result.match_level, MatchLevel::Low);
    }

    #[test]
    fn test_empty_resume_result() {
        let result = run("", "python team");
        assert_eq!(result.breakdown, ScoreBreakdown::default());
        assert_eq!(result.facts.experience_years, None);
        assert!(result.facts.education_lines.is_empty());
        assert!(result.matched_skills.is_empty());
        assert_eq!(result.missing_skills.len(), SKILL_TERMS.len());
        assert_eq!(
            result.suggestions,
            vec![
                "Mention Python if you have experience with it.",
                "Show teamwork or collaboration experience."
            ]
        );

        let both_empty = run("", "");
        assert_eq!(
            both_empty.suggestions,
            vec!["Great job! Your resume already aligns well."]
        );
    }

    #[test]
    fn test_match_level_thresholds() {
        assert_eq!(MatchLevel::from_score(71), MatchLevel::Great);
        assert_eq!(MatchLevel::from_score(70), MatchLevel::Moderate);
        assert_eq!(MatchLevel::from_score(41), MatchLevel::Moderate);
        assert_eq!(MatchLevel::from_score(40), MatchLevel::Low);
        assert_eq!(MatchLevel::Great.label(), "Great match!");
    }

    #[test]
    fn test_feedback_text_exact_layout() {
        let result = run("SQL and Python, worked at Acme", "python");
        let text = result.feedback_text_in(&Utc);
        let expected = "Resume: jane.pdf\n\
                        Job: backend.txt\n\
                        Score: 13%\n\
                        \n\
                        Breakdown:\n \
                        - Skills: 20%\n \
                        - Experience: 20%\n \
                        - Education: 0%\n\
                        \n\
                        Suggestions:\n \
                        - Great job! Your resume already aligns well.\n\
                        \n\
                        Missing keywords: django, flask, api, html, javascript, postgresql, machine learning, data analysis\n\
                        \n\
                        Generated at: 2024-03-09 14:05:07";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_feedback_text_omits_missing_line_when_complete() {
        let resume = "python django flask sql api html javascript postgresql machine learning data analysis";
        let result = run(resume, "");
        let text = result.feedback_text_in(&Utc);
        assert!(!text.contains("Missing keywords"));
        assert!(text.contains(" - Skills: 100%\n"));
        assert!(text.ends_with("\n\nGenerated at: 2024-03-09 14:05:07"));
    }

    #[test]
    fn test_with_extraction_error() {
        let result = run("", "").with_extraction_error("boom");
        assert_eq!(result.extraction_error.as_deref(), Some("boom"));
    }
}
