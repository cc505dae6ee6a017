//! Job corpus loading

use crate::error::{AtsError, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

const TITLE_COLUMN: &str = "Job Title";
const IT_SKILLS_COLUMN: &str = "IT Skills";
const SOFT_SKILLS_COLUMN: &str = "Soft Skills";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    /// Comma-separated technical skills
    pub it_skills: String,
    pub soft_skills: String,
}

impl JobPosting {
    pub fn new(title: &str, it_skills: &str, soft_skills: &str) -> Self {
        Self {
            title: title.to_string(),
            it_skills: it_skills.to_string(),
            soft_skills: soft_skills.to_string(),
        }
    }

    pub fn skill_text(&self) -> String {
        format!("{} {}", self.it_skills, self.soft_skills)
    }
}

/// Read-only reference postings, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct JobCorpus {
    postings: Vec<JobPosting>,
}

impl JobCorpus {
    pub fn from_postings(postings: Vec<JobPosting>) -> Self {
        Self { postings }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AtsError::CorpusLoad(format!(
                "Job corpus not found: {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)?;
        let corpus = Self::from_csv_bytes(&bytes)?;
        info!("Loaded {} job postings from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    /// Parse CSV bytes, falling back to ISO-8859-1 when they are not UTF-8
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let content = match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                warn!("Job corpus is not valid UTF-8, decoding as ISO-8859-1");
                bytes.iter().map(|&b| b as char).collect()
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);

        let title_idx = column(TITLE_COLUMN).ok_or_else(|| {
            AtsError::CorpusLoad(format!("Missing required column '{}'", TITLE_COLUMN))
        })?;
        let it_idx = column(IT_SKILLS_COLUMN).ok_or_else(|| {
            AtsError::CorpusLoad(format!("Missing required column '{}'", IT_SKILLS_COLUMN))
        })?;
        let soft_idx = column(SOFT_SKILLS_COLUMN);

        let mut postings = Vec::new();
        for record in reader.records() {
            let record = record?;
            let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

            let title = field(title_idx);
            if title.is_empty() {
                continue;
            }

            postings.push(JobPosting {
                title,
                it_skills: field(it_idx),
                soft_skills: soft_idx.map(field).unwrap_or_default(),
            });
        }

        if postings.is_empty() {
            return Err(AtsError::CorpusLoad("Job corpus has no postings".to_string()));
        }

        Ok(Self { postings })
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
