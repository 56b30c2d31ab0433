//! Lexicon — the fixed vocabularies every analysis is measured against.
//!
//! Terms are lowercase. Order only fixes the order of extracted output.

/// Skill terms. The skill score is measured against all ten.
pub const SKILL_TERMS: &[&str] = &[
    "python",
    "django",
    "flask",
    "sql",
    "api",
    "html",
    "javascript",
    "postgresql",
    "machine learning",
    "data analysis",
];

/// Phrases that indicate work experience.
pub const EXPERIENCE_TERMS: &[&str] = &[
    "experience",
    "worked at",
    "project",
    "internship",
    "responsible for",
];

/// Phrases that indicate an education section or degree.
pub const EDUCATION_TERMS: &[&str] = &[
    "bachelor",
    "master",
    "b.tech",
    "m.tech",
    "phd",
    "b.sc",
    "m.sc",
    "graduation",
    "engineering",
    "degree",
    "university",
    "college",
];

/// The three vocabularies bundled together so scoring can be run against an
/// alternative set in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexicon {
    pub skills: &'static [&'static str],
    pub experience: &'static [&'static str],
    pub education: &'static [&'static str],
}

/// The lexicon used by the service.
pub const STANDARD: Lexicon = Lexicon {
    skills: SKILL_TERMS,
    experience: EXPERIENCE_TERMS,
    education: EDUCATION_TERMS,
};

impl Default for Lexicon {
    fn default() -> Self {
        STANDARD
    }
}
