//! Output formatters for console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{Report, ReportBody, ScoreBand};
use crate::processing::analyzer::MatchResult;
use crate::processing::ats_scorer::{
    ScoreReport, CERTIFICATION_WEIGHT, EDUCATION_WEIGHT, EXPERIENCE_WEIGHT, FORMATTING_WEIGHT,
    SKILLS_WEIGHT,
};
use crate::processing::predictor::JobMatch;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &Report) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for the requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".blue().bold(), title.blue().bold())
        } else {
            format!("\n█ {}\n", title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let band = ScoreBand::from_score(score);
        let color = match band {
            ScoreBand::Excellent => Color::Green,
            ScoreBand::Good => Color::Yellow,
            ScoreBand::Fair => Color::BrightYellow,
            ScoreBand::Poor => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", band.label().color(color).bold())
        } else {
            format!("[{}]", band.label())
        }
    }

    fn format_score_report(&self, scores: &ScoreReport, output: &mut String) {
        output.push_str(&format!(
            "Overall ATS Score: {:.2}% {}\n\n",
            scores.overall,
            self.format_score_badge(scores.overall)
        ));
        let rows = [
            ("Skills", scores.skills, SKILLS_WEIGHT),
            ("Experience", scores.experience, EXPERIENCE_WEIGHT),
            ("Formatting", scores.formatting, FORMATTING_WEIGHT),
            ("Education", scores.education, EDUCATION_WEIGHT),
            ("Certification", scores.certification, CERTIFICATION_WEIGHT),
        ];
        for (name, score, weight) in rows {
            output.push_str(&format!(
                "  {:<14} {:>3}%  (weight {:.0}%)\n",
                name,
                score,
                weight * 100.0
            ));
        }
    }

    fn format_match(&self, result: &MatchResult, output: &mut String) {
        let scores = &result.scores;
        output.push_str(&format!(
            "Hybrid Match Score: {:.2}% {}\n\n",
            scores.hybrid,
            self.format_score_badge(scores.hybrid)
        ));
        output.push_str(&format!("  Semantic  {:>6.2}%\n", scores.semantic));
        output.push_str(&format!("  TF-IDF    {:>6.2}%\n", scores.tfidf));
        output.push_str(&format!("  Fuzzy     {:>6.2}%\n", scores.fuzzy));

        output.push_str(&self.format_header("Missing Skills"));
        if result.gap.missing_skills.is_empty() {
            output.push_str(&self.colorize("  None, every required skill was found\n", Color::Green));
        } else {
            for skill in &result.gap.missing_skills {
                output.push_str(&format!("  • {}\n", self.colorize(skill, Color::Red)));
            }
        }

        if !result.gap.suggested_skills.is_empty() {
            output.push_str(&self.format_header("Suggested Learning"));
            for skill in &result.gap.suggested_skills {
                output.push_str(&format!("  {}\n", self.colorize(skill, Color::Cyan)));
                for resource in result.gap.resources.get(skill).into_iter().flatten() {
                    output.push_str(&format!("    - {} <{}>\n", resource.title, resource.url));
                }
            }
        }
    }

    fn format_predictions(&self, matches: &[JobMatch], output: &mut String) {
        for (rank, job) in matches.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {:<32} {:>6.2}% skill match\n",
                rank + 1,
                self.colorize(&job.title, Color::Cyan),
                job.skill_match
            ));
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(report.title()));
        output.push_str(&format!(
            "Generated: {} | Resume: {} | Processing time: {}ms\n\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.resume_file,
            report.metadata.processing_time_ms
        ));

        match &report.body {
            ReportBody::AtsScore(scores) => self.format_score_report(scores, &mut output),
            ReportBody::JobMatch(result) => self.format_match(result, &mut output),
            ReportBody::JobPrediction(matches) => self.format_predictions(matches, &mut output),
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn file_name(path: &str) -> String {
        Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string())
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = format!("# {}\n\n", report.title());

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Resume:** `{}`",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                Self::file_name(&report.metadata.resume_file)
            ));
            if let Some(job_file) = &report.metadata.job_file {
                output.push_str(&format!(" | **Job:** `{}`", Self::file_name(job_file)));
            }
            output.push_str("\n\n");
        }

        match &report.body {
            ReportBody::AtsScore(scores) => {
                output.push_str(&format!(
                    "**Overall ATS Score:** {:.2}% ({})\n\n",
                    scores.overall,
                    ScoreBand::from_score(scores.overall).label()
                ));
                output.push_str("| Category | Score | Weight |\n");
                output.push_str("|----------|-------|--------|\n");
                for (name, score, weight) in [
                    ("Skills", scores.skills, SKILLS_WEIGHT),
                    ("Experience", scores.experience, EXPERIENCE_WEIGHT),
                    ("Formatting", scores.formatting, FORMATTING_WEIGHT),
                    ("Education", scores.education, EDUCATION_WEIGHT),
                    ("Certification", scores.certification, CERTIFICATION_WEIGHT),
                ] {
                    output.push_str(&format!("| {} | {}% | {:.0}% |\n", name, score, weight * 100.0));
                }
            }
            ReportBody::JobMatch(result) => {
                let scores = &result.scores;
                output.push_str(&format!("**Hybrid Match Score:** {:.2}%\n\n", scores.hybrid));
                output.push_str("| Component | Score |\n|-----------|-------|\n");
                output.push_str(&format!("| Semantic | {:.2}% |\n", scores.semantic));
                output.push_str(&format!("| TF-IDF | {:.2}% |\n", scores.tfidf));
                output.push_str(&format!("| Fuzzy | {:.2}% |\n\n", scores.fuzzy));

                output.push_str("## Missing Skills\n\n");
                if result.gap.missing_skills.is_empty() {
                    output.push_str("None.\n");
                }
                for skill in &result.gap.missing_skills {
                    output.push_str(&format!("- {}\n", skill));
                }

                if !result.gap.suggested_skills.is_empty() {
                    output.push_str("\n## Suggested Learning\n\n");
                    for skill in &result.gap.suggested_skills {
                        output.push_str(&format!("### {}\n\n", skill));
                        for resource in result.gap.resources.get(skill).into_iter().flatten() {
                            output.push_str(&format!("- [{}]({})\n", resource.title, resource.url));
                        }
                        output.push('\n');
                    }
                }
            }
            ReportBody::JobPrediction(matches) => {
                output.push_str("| Rank | Job Title | Skill Match |\n");
                output.push_str("|------|-----------|-------------|\n");
                for (rank, job) in matches.iter().enumerate() {
                    output.push_str(&format!(
                        "| {} | {} | {:.2}% |\n",
                        rank + 1,
                        job.title,
                        job.skill_match
                    ));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &Report, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::search::LearningResource;
    use crate::output::report::ReportMetadata;
    use crate::processing::hybrid_matcher::MatchScores;
    use crate::processing::skill_gap::SkillGap;
    use std::collections::BTreeMap;

    fn match_report() -> Report {
        let mut resources = BTreeMap::new();
        resources.insert(
            "docker".to_string(),
            vec![LearningResource {
                title: "Docker Mastery".to_string(),
                url: "https://example.org/docker".to_string(),
            }],
        );
        Report::new(
            ReportMetadata::new("resumes/cv.pdf", Some("jobs/backend.txt"), 40),
            ReportBody::JobMatch(MatchResult {
                scores: MatchScores {
                    semantic: 81.5,
                    tfidf: 40.25,
                    fuzzy: 50.0,
                    hybrid: 62.34,
                },
                gap: SkillGap {
                    missing_skills: vec!["docker".to_string(), "terraform".to_string()],
                    suggested_skills: vec!["docker".to_string()],
                    resources,
                },
            }),
        )
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false).format_report(&match_report()).unwrap();

        assert!(output.contains("JOB DESCRIPTION MATCH"));
        assert!(output.contains("Hybrid Match Score: 62.34% [FAIR]"));
        assert!(output.contains("• terraform"));
        assert!(output.contains("Docker Mastery <https://example.org/docker>"));
    }

    #[test]
    fn test_markdown_links_resources() {
        let output = MarkdownFormatter::new(true).format_report(&match_report()).unwrap();

        assert!(output.starts_with("# JOB DESCRIPTION MATCH"));
        assert!(output.contains("**Job:** `backend.txt`"));
        assert!(output.contains("- [Docker Mastery](https://example.org/docker)"));
    }

    #[test]
    fn test_json_round_trips() {
        let generator = ReportGenerator::with_options(false, false, false);
        let json = generator.generate_report(&match_report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["body"]["kind"], "job_match");
        assert_eq!(value["body"]["result"]["hybrid"], 62.34);
        assert_eq!(value["body"]["result"]["missing_skills"][1], "terraform");
    }

    #[test]
    fn test_prediction_table() {
        let report = Report::new(
            ReportMetadata::new("cv.pdf", None, 5),
            ReportBody::JobPrediction(vec![JobMatch {
                title: "Data Scientist".to_string(),
                skill_match: 75.0,
                similarity: 0.6,
            }]),
        );
        let output = MarkdownFormatter::new(false).format_report(&report).unwrap();
        assert!(output.contains("| 1 | Data Scientist | 75.00% |"));
    }
}
