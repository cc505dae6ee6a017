//! Error handling for the resume ATS toolkit

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    /// Extraction succeeded but produced no text. Never treated as a valid
    /// zero-content resume.
    #[error("No text could be extracted from {0}")]
    EmptyExtraction(String),

    #[error("Job corpus error: {0}")]
    CorpusLoad(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Embedding model error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The resume produced an empty skill set, so no ranking was attempted.
    #[error("No relevant skills could be extracted from the resume")]
    NoSkillsExtracted,

    #[error("Network error: {0}")]
    Network(String),

    #[error("History store error: {0}")]
    History(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

pub type Result<T> = std::result::Result<T, AtsError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for AtsError {
    fn from(err: anyhow::Error) -> Self {
        AtsError::AnalysisFailed(err.to_string())
    }
}
