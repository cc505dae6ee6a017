//! CLI interface for the resume ATS toolkit

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-ats")]
#[command(about = "Resume ATS scoring, job-description matching and job-title prediction")]
#[command(
    long_about = "Score a resume the way an applicant-tracking system would, compare it with a job description using semantic, lexical and fuzzy similarity, find missing skills, and predict the job titles it fits best"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Job corpus CSV (overrides the configured path)
    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    /// Output format: console, json, markdown
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Save output to file
    #[arg(short, long, global = true)]
    pub save: Option<PathBuf>,

    /// Append the result to this identity's submission history
    #[arg(long, global = true)]
    pub identity: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume's formatting and content
    Score {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Override the detected page count
        #[arg(long)]
        pages: Option<usize>,
    },

    /// Match a resume against a job description
    Match {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file, or `-` for stdin
        #[arg(short, long)]
        job: PathBuf,

        /// Skip learning-resource lookups
        #[arg(long)]
        no_resources: bool,
    },

    /// Predict the job titles a resume fits best
    Predict {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_match_with_globals() {
        let cli = Cli::try_parse_from([
            "resume-ats",
            "match",
            "--resume",
            "cv.pdf",
            "--job",
            "-",
            "--no-resources",
            "--output",
            "json",
            "--identity",
            "jane@example.com",
        ])
        .unwrap();

        assert_eq!(cli.output.as_deref(), Some("json"));
        assert_eq!(cli.identity.as_deref(), Some("jane@example.com"));
        match cli.command {
            Commands::Match { job, no_resources, .. } => {
                assert_eq!(job, PathBuf::from("-"));
                assert!(no_resources);
            }
            _ => panic!("expected match subcommand"),
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_extension_validation() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "docx"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.png"), &["pdf", "docx"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
