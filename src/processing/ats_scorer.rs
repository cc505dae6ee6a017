//! ATS-style resume scoring
//!
//! Five category scorers, each a pure function of the resume text, combined
//! into a fixed weighted overall score.

use crate::error::{AtsError, Result};
use crate::input::ExtractedText;
use crate::processing::formatting::formatting_score;
use crate::processing::vocabulary::SkillVocabulary;
use chrono::Datelike;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const SKILLS_WEIGHT: f64 = 0.50;
pub const EXPERIENCE_WEIGHT: f64 = 0.30;
pub const FORMATTING_WEIGHT: f64 = 0.10;
pub const EDUCATION_WEIGHT: f64 = 0.05;
pub const CERTIFICATION_WEIGHT: f64 = 0.05;

pub const SOFT_SKILLS: [&str; 5] = [
    "communication",
    "teamwork",
    "leadership",
    "problem-solving",
    "adaptability",
];

const CERTIFICATION_KEYWORDS: [&str; 3] = ["certified", "certification", "certificate"];

static EXPERIENCE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{4})\s*[-–]\s*(\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)?\s*\d{4}|\bPresent)",
    )
    .expect("valid experience regex")
});

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid year regex"));

/// Degree tiers in precedence order, only the first match counts
static EDUCATION_TIERS: Lazy<Vec<(Regex, u32)>> = Lazy::new(|| {
    [
        (r"\b(phd|doctorate)\b", 100),
        (r"\b(master|m\.tech|postgraduate|pg diploma)\b", 90),
        (r"\b(bachelor|b\.tech|under\s?graduation|engineering|bsc|bca)\b", 70),
        (r"\b(intermediate|12th|higher\s?secondary|junior college)\b", 50),
        (r"\b(secondary\s?school|10th|high\s?school)\b", 40),
    ]
    .into_iter()
    .map(|(pattern, score)| (Regex::new(pattern).expect("valid degree regex"), score))
    .collect()
});

static GPA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(cgpa|gpa)\s*[:\-]?\s*\d+(\.\d+)?").expect("valid gpa regex"));

static PERCENTAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bpercentage\s*[:\-]?\s*\d{2,3}").expect("valid percentage regex"));

static INSTITUTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(university|college|institute|school)\b").expect("valid institution regex")
});

static CERTIFICATION_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(certified|certification|certificate|course)\b")
        .expect("valid certification regex")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub formatting: u32,
    pub experience: u32,
    pub skills: u32,
    pub education: u32,
    pub certification: u32,
    pub overall: f64,
}

impl ScoreReport {
    pub fn from_scores(
        formatting: u32,
        experience: u32,
        skills: u32,
        education: u32,
        certification: u32,
    ) -> Self {
        let overall = skills as f64 * SKILLS_WEIGHT
            + experience as f64 * EXPERIENCE_WEIGHT
            + formatting as f64 * FORMATTING_WEIGHT
            + education as f64 * EDUCATION_WEIGHT
            + certification as f64 * CERTIFICATION_WEIGHT;

        Self {
            formatting,
            experience,
            skills,
            education,
            certification,
            overall: overall.clamp(0.0, 100.0),
        }
    }
}

pub struct AtsScorer<'a> {
    vocabulary: &'a SkillVocabulary,
    current_year: i32,
}

impl<'a> AtsScorer<'a> {
    pub fn new(vocabulary: &'a SkillVocabulary) -> Self {
        Self {
            vocabulary,
            current_year: chrono::Utc::now().year(),
        }
    }

    /// Pin the year "Present" resolves to
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn score(&self, resume: &ExtractedText) -> Result<ScoreReport> {
        if resume.is_blank() {
            return Err(AtsError::InvalidInput(
                "Cannot score an empty resume".to_string(),
            ));
        }

        let text = &resume.text;
        let report = ScoreReport::from_scores(
            formatting_score(text, resume.page_count),
            experience_score(text, self.current_year),
            skills_score(text, self.vocabulary),
            education_score(text),
            certification_score(text),
        );

        debug!(
            "ATS scores: formatting={} experience={} skills={} education={} certification={} overall={:.2}",
            report.formatting,
            report.experience,
            report.skills,
            report.education,
            report.certification,
            report.overall
        );

        Ok(report)
    }
}

/// Total years across all "Mon YYYY - Mon YYYY|Present" ranges. Overlapping
/// ranges are summed as-is.
pub fn experience_years(text: &str, current_year: i32) -> i32 {
    EXPERIENCE_RANGE
        .captures_iter(text)
        .map(|caps| {
            let start = first_year(&caps[1]);
            let end = if caps[2].to_lowercase().contains("present") {
                Some(current_year)
            } else {
                first_year(&caps[2])
            };
            match (start, end) {
                (Some(start), Some(end)) => (end - start).max(0),
                _ => 0,
            }
        })
        .fold(0i32, i32::saturating_add)
}

fn first_year(text: &str) -> Option<i32> {
    YEAR.find(text).and_then(|m| m.as_str().parse().ok())
}

pub fn experience_score(text: &str, current_year: i32) -> u32 {
    let years = experience_years(text, current_year);
    if years >= 1 {
        (years as u32).saturating_mul(10).saturating_add(20).min(100)
    } else if text.to_lowercase().contains("internship") {
        40
    } else {
        20
    }
}

pub fn education_score(text: &str) -> u32 {
    let lowered = text.to_lowercase();

    let mut score = EDUCATION_TIERS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&lowered))
        .map_or(0, |(_, score)| *score);

    if GPA.is_match(&lowered) {
        score += 20;
    } else if PERCENTAGE.is_match(&lowered) {
        score += 15;
    }
    if INSTITUTION.is_match(&lowered) {
        score += 10;
    }
    if CERTIFICATION_MENTION.is_match(&lowered) {
        score += 10;
    }

    score.min(100)
}

pub fn certification_score(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    if CERTIFICATION_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        50
    } else {
        0
    }
}

/// Vocabulary hits (5 each, capped at 50) plus soft skills (5 each, capped at 20)
pub fn skills_score(text: &str, vocabulary: &SkillVocabulary) -> u32 {
    let lowered = text.to_lowercase();
    let technical = vocabulary.count_occurrences(&lowered) as u32;
    let soft = SOFT_SKILLS.iter().filter(|s| lowered.contains(*s)).count() as u32;

    (technical * 5).min(50) + (soft * 5).min(20)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vocabulary() -> SkillVocabulary {
        SkillVocabulary::from_skill_lists(["Python, SQL, Docker", "Java, Kubernetes, AWS"]).unwrap()
    }

    #[test]
    fn test_experience_present_resolves_to_current_year() {
        let text = "Software Engineer, Acme (Jan 2020 - Present)";
        assert_eq!(experience_years(text, 2025), 5);
        assert_eq!(experience_score(text, 2025), 70);
    }

    #[test]
    fn test_experience_fallbacks() {
        assert_eq!(experience_score("Summer internship at a bank", 2025), 40);
        assert_eq!(experience_score("No dated roles", 2025), 20);
        // reversed range clamps to zero years
        assert_eq!(experience_score("Mar 2022 - Jan 2020", 2025), 20);
    }

    #[test]
    fn test_overlapping_ranges_are_summed() {
        // same three years counted twice, a known overestimate
        let text = "Acme Jan 2019 - Dec 2022\nSide project Feb 2019 - Nov 2022";
        assert_eq!(experience_years(text, 2025), 6);
        assert_eq!(experience_score(text, 2025), 80);
    }

    #[test]
    fn test_experience_caps_at_100() {
        let text = "Jan 2000 – Present";
        assert_eq!(experience_score(text, 2025), 100);
    }

    #[test]
    fn test_huge_year_totals_do_not_overflow() {
        let text = "Jan 0000 - Dec 9999\n".repeat(22_000);
        assert_eq!(experience_years(&text, 2025), 9999 * 22_000);
        assert_eq!(experience_score(&text, 2025), 100);
    }

    #[test]
    fn test_education_tiers_are_exclusive() {
        assert_eq!(education_score("PhD and Master of Science"), 100);
        assert_eq!(education_score("Master of Science"), 90);
        assert_eq!(education_score("Bachelor of Arts, GPA: 3.8"), 90);
        assert_eq!(education_score("12th grade, percentage 87"), 65);
        assert_eq!(education_score("High School, Springfield school"), 50);
        assert_eq!(education_score("none"), 0);
    }

    #[test]
    fn test_education_bonuses_clamp() {
        assert_eq!(
            education_score("PhD, CGPA 9.1, State University, certified course"),
            100
        );
        assert_eq!(education_score("B.Tech from XYZ Institute, percentage: 78"), 95);
    }

    #[test]
    fn test_certification_score() {
        assert_eq!(certification_score("AWS Certified Developer"), 50);
        assert_eq!(certification_score("Holds a certificate"), 50);
        assert_eq!(certification_score("No credentials listed"), 0);
    }

    #[test]
    fn test_skills_score() {
        let vocabulary = vocabulary();
        let text = "Python, SQL and Docker. Strong communication and leadership.";
        assert_eq!(skills_score(text, &vocabulary), 15 + 10);
    }

    #[test]
    fn test_overall_uses_fixed_weights() {
        let report = ScoreReport::from_scores(80, 70, 50, 90, 50);
        let expected = 0.5 * 50.0 + 0.3 * 70.0 + 0.1 * 80.0 + 0.05 * 90.0 + 0.05 * 50.0;
        assert_relative_eq!(report.overall, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_blank_resume_is_rejected() {
        let vocabulary = vocabulary();
        let scorer = AtsScorer::new(&vocabulary);
        let blank = ExtractedText::new("   ".to_string(), 1);
        assert!(matches!(scorer.score(&blank), Err(AtsError::InvalidInput(_))));
    }

    #[test]
    fn test_full_report_is_bounded() {
        let vocabulary = vocabulary();
        let scorer = AtsScorer::new(&vocabulary).with_current_year(2025);
        let resume = ExtractedText::new(
            "Jane Doe\n\nExperience\nDeveloper Jan 2018 - Present\nSkills: Python, Java, AWS\nBachelor of Engineering".to_string(),
            1,
        );
        let report = scorer.score(&resume).unwrap();

        for score in [
            report.formatting,
            report.experience,
            report.skills,
            report.education,
            report.certification,
        ] {
            assert!(score <= 100);
        }
        assert!((0.0..=100.0).contains(&report.overall));
        assert_eq!(report.experience, 90);
        assert_eq!(report.skills, 15);
    }
}
