//! Per-identity submission history
//!
//! Only the host process writes here, after a report has been produced.
//! Nothing in the scoring path reads it back.

use crate::error::{AtsError, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionModule {
    AtsScore,
    JobMatcher,
    JobPredictor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub filename: String,
    pub resume_text: String,
    pub timestamp: DateTime<Utc>,
    pub module: SubmissionModule,
    pub output: serde_json::Value,
}

impl SubmissionRecord {
    pub fn new<T: Serialize>(
        filename: &str,
        resume_text: &str,
        module: SubmissionModule,
        output: &T,
    ) -> Result<Self> {
        Ok(Self {
            filename: filename.to_string(),
            resume_text: resume_text.to_string(),
            timestamp: Utc::now(),
            module,
            output: serde_json::to_value(output)?,
        })
    }
}

pub trait SubmissionStore {
    fn append(&self, identity: &str, record: &SubmissionRecord) -> Result<()>;
}

/// One JSON line per record in `<dir>/<identity>.jsonl`
pub struct JsonlHistoryStore {
    dir: PathBuf,
}

impl JsonlHistoryStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn history_path(&self, identity: &str) -> Result<PathBuf> {
        let sanitized: String = identity
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || "@._-".contains(c) { c } else { '_' })
            .collect();

        if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
            return Err(AtsError::History(format!("Invalid identity: '{}'", identity)));
        }

        Ok(self.dir.join(format!("{}.jsonl", sanitized)))
    }
}

impl SubmissionStore for JsonlHistoryStore {
    fn append(&self, identity: &str, record: &SubmissionRecord) -> Result<()> {
        let path = self.history_path(identity)?;
        std::fs::create_dir_all(&self.dir)?;

        let line = serde_json::to_string(record)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| AtsError::History(format!("Cannot open {}: {}", path.display(), e)))?;
        writeln!(file, "{}", line)?;

        info!("Saved {:?} submission to {}", record.module, path.display());
        Ok(())
    }
}
