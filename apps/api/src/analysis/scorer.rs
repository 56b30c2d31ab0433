//! Scorer — three-part percentage breakdown of a resume against the lexicon.
//!
//! Only the resume text is scored. The job description is accepted so every
//! stage of the pipeline shares one call shape, but it never moves the score;
//! job content only reaches the suggestion engine.
//!
//! Rounding is half away from zero, done in integer arithmetic so that no
//! float error can push a tie the wrong way.

use serde::Serialize;

use crate::analysis::lexicon::Lexicon;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Percentage scores, each in 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub skill_score: u8,
    pub experience_score: u8,
    pub education_score: u8,
    /// Rounded mean of the three category scores.
    pub final_score: u8,
}

impl ScoreBreakdown {
    /// Builds a breakdown from category scores, deriving `final_score`.
    pub fn from_categories(skill_score: u8, experience_score: u8, education_score: u8) -> Self {
        let sum = u64::from(skill_score) + u64::from(experience_score) + u64::from(education_score);
        Self {
            skill_score,
            experience_score,
            education_score,
            final_score: round_div(sum, 3) as u8,
        }
    }

    /// The final score as a fraction in 0.0..=1.0, as stored in history.
    pub fn fraction(&self) -> f64 {
        f64::from(self.final_score) / 100.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores `resume_text` against each vocabulary of `lexicon`.
///
/// `_job_text` is intentionally unused.
pub fn score_breakdown(resume_text: &str, _job_text: &str, lexicon: &Lexicon) -> ScoreBreakdown {
    let resume_lower = resume_text.to_lowercase();

    ScoreBreakdown::from_categories(
        category_score(&resume_lower, lexicon.skills),
        category_score(&resume_lower, lexicon.experience),
        category_score(&resume_lower, lexicon.education),
    )
}

/// Percentage of `terms` contained in `text_lower`. Each term counts once.
fn category_score(text_lower: &str, terms: &[&str]) -> u8 {
    if terms.is_empty() {
        return 0;
    }
    let matched = terms.iter().filter(|term| text_lower.contains(*term)).count() as u64;
    percent(matched, terms.len() as u64)
}

/// `round(100 * part / whole)`, clamped to 100.
pub fn percent(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    round_div(100 * part, whole).min(100) as u8
}

/// Integer division rounding half away from zero (non-negative operands).
fn round_div(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::lexicon::STANDARD;

    const SCENARIO_RESUME: &str =
        "I have 3 years of experience with Python and SQL, B.Tech in Engineering";
    const SCENARIO_JOB: &str =
        "Looking for a Python developer with machine learning experience and teamwork";

    #[test]
    fn test_round_div_ties_round_up() {
        assert_eq!(round_div(1, 2), 1);
        assert_eq!(round_div(5, 2), 3);
        assert_eq!(round_div(1, 3), 0);
        assert_eq!(round_div(2, 3), 1);
        assert_eq!(round_div(0, 7), 0);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(percent(1, 12), 8); // 8.33
        assert_eq!(percent(2, 3), 67); // 66.67
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn test_final_score_is_rounded_mean() {
        // (20 + 20 + 17) / 3 = 19.0
        let b = ScoreBreakdown::from_categories(20, 20, 17);
        assert_eq!(b.final_score, 19);
        // (0 + 0 + 1) / 3 = 0.33
        assert_eq!(ScoreBreakdown::from_categories(0, 0, 1).final_score, 0);
        // (0 + 1 + 1) / 3 = 0.67
        assert_eq!(ScoreBreakdown::from_categories(0, 1, 1).final_score, 1);
        assert_eq!(ScoreBreakdown::from_categories(100, 100, 100).final_score, 100);
    }

    #[test]
    fn test_scenario_breakdown() {
        let b = score_breakdown(SCENARIO_RESUME, SCENARIO_JOB, &STANDARD);
        // python, sql → 2/10
        assert_eq!(b.skill_score, 20);
        // experience → 1/5
        assert_eq!(b.experience_score, 20);
        // b.tech, engineering → 2/12 = 16.67
        assert_eq!(b.education_score, 17);
        assert_eq!(b.final_score, 19);
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        let b = score_breakdown("", "any job at all", &STANDARD);
        assert_eq!(b, ScoreBreakdown::default());
    }

    #[test]
    fn test_breakdown_ignores_job_text() {
        let resumes = [SCENARIO_RESUME, "", "Django, Flask, PostgreSQL; worked at Acme"];
        let jobs = ["", SCENARIO_JOB, "python python python", "!!!@@@###"];
        for resume in resumes {
            let baseline = score_breakdown(resume, "", &STANDARD);
            for job in jobs {
                assert_eq!(score_breakdown(resume, job, &STANDARD), baseline);
            }
        }
    }

    #[test]
    fn test_term_counts_once() {
        let once = score_breakdown("python", "", &STANDARD);
        let many = score_breakdown("python python python python", "", &STANDARD);
        assert_eq!(once, many);
        assert_eq!(once.skill_score, 10);
    }

    #[test]
    fn test_full_marks() {
        let resume = "python django flask sql api html javascript postgresql \
                      machine learning data analysis experience worked at project \
                      internship responsible for bachelor master b.tech m.tech phd \
                      b.sc m.sc graduation engineering degree university college";
        let b = score_breakdown(resume, "", &STANDARD);
        assert_eq!(b.skill_score, 100);
        assert_eq!(b.experience_score, 100);
        assert_eq!(b.education_score, 100);
        assert_eq!(b.final_score, 100);
    }

    #[test]
    fn test_scores_bounded_and_final_is_mean() {
        let samples = [
            "",
            "§¶•ªº–≠",
            SCENARIO_RESUME,
            "MASTER'S DEGREE, UNIVERSITY COLLEGE, internship, HTML",
            "responsible for API projects",
        ];
        for text in samples {
            let b = score_breakdown(text, "", &STANDARD);
            assert!(b.skill_score <= 100);
            assert!(b.experience_score <= 100);
            assert!(b.education_score <= 100);
            let expected = ScoreBreakdown::from_categories(
                b.skill_score,
                b.experience_score,
                b.education_score,
            );
            assert_eq!(b.final_score, expected.final_score);
        }
    }

    #[test]
    fn test_fraction() {
        let b = ScoreBreakdown::from_categories(20, 20, 17);
        assert!((b.fraction() - 0.19).abs() < f64::EPSILON);
    }
}
