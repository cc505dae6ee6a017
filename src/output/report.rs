//! Report structures wrapping the three analysis results

use crate::external::history::SubmissionModule;
use crate::processing::analyzer::MatchResult;
use crate::processing::ats_scorer::ScoreReport;
use crate::processing::predictor::JobMatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub body: ReportBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum ReportBody {
    AtsScore(ScoreReport),
    JobMatch(MatchResult),
    JobPrediction(Vec<JobMatch>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub resume_file: String,
    pub job_file: Option<String>,
    pub processing_time_ms: u64,
}

impl ReportMetadata {
    pub fn new(resume_file: &str, job_file: Option<&str>, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.to_string(),
            job_file: job_file.map(str::to_string),
            processing_time_ms,
        }
    }
}

impl Report {
    pub fn new(metadata: ReportMetadata, body: ReportBody) -> Self {
        Self { metadata, body }
    }

    pub fn module(&self) -> SubmissionModule {
        match self.body {
            ReportBody::AtsScore(_) => SubmissionModule::AtsScore,
            ReportBody::JobMatch(_) => SubmissionModule::JobMatcher,
            ReportBody::JobPrediction(_) => SubmissionModule::JobPredictor,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.body {
            ReportBody::AtsScore(_) => "ATS SCORE",
            ReportBody::JobMatch(_) => "JOB DESCRIPTION MATCH",
            ReportBody::JobPrediction(_) => "JOB TITLE PREDICTION",
        }
    }
}

/// Rating bands shared by every formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => ScoreBand::Excellent,
            s if s >= 65.0 => ScoreBand::Good,
            s if s >= 50.0 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "EXCELLENT",
            ScoreBand::Good => "GOOD",
            ScoreBand::Fair => "FAIR",
            ScoreBand::Poor => "POOR",
        }
    }
}
