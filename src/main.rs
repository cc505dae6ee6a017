//! resume-ats: ATS scoring, job matching and job-title prediction for resumes

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_ats::cli::{self, Cli, Commands, ConfigAction};
use resume_ats::config::Config;
use resume_ats::error::{AtsError, Result};
use resume_ats::external::history::{JsonlHistoryStore, SubmissionRecord, SubmissionStore};
use resume_ats::external::search::{DuckDuckGoSearch, NoopSearch};
use resume_ats::input::manager::InputManager;
use resume_ats::input::ExtractedText;
use resume_ats::output::formatter::{save_report_to_file, ReportGenerator};
use resume_ats::output::report::{Report, ReportBody, ReportMetadata};
use resume_ats::processing::analyzer::AnalysisContext;
use resume_ats::processing::embeddings::EmbeddingEngine;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;

const RESUME_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md"];

/// Where a finished report goes besides stdout
struct Delivery {
    save: Option<PathBuf>,
    identity: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Some(corpus) = &cli.corpus {
        config.corpus.path = corpus.clone();
    }
    if let Some(output) = &cli.output {
        match cli::parse_output_format(output) {
            Ok(format) => config.output.format = format,
            Err(e) => {
                error!("{}", e);
                process::exit(2);
            }
        }
    }

    let identity = cli
        .identity
        .clone()
        .or_else(|| config.history.enabled.then(|| "default".to_string()));
    let delivery = Delivery {
        save: cli.save.clone(),
        identity,
    };

    if let Err(e) = run_command(cli.command, config, &config_path, delivery).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(
    command: Commands,
    config: Config,
    config_path: &Path,
    delivery: Delivery,
) -> Result<()> {
    match command {
        Commands::Score { resume, pages } => {
            let start_time = Instant::now();
            let mut extracted = read_resume(&resume).await?;
            if let Some(pages) = pages {
                extracted.page_count = pages;
            }

            let context = load_context(&config)?;
            let scores = context.score_resume(&extracted)?;

            let report = Report::new(
                ReportMetadata::new(&resume.to_string_lossy(), None, elapsed_ms(start_time)),
                ReportBody::AtsScore(scores),
            );
            deliver(&report, &resume, &extracted.text, &config, &delivery)
        }

        Commands::Match {
            resume,
            job,
            no_resources,
        } => {
            let start_time = Instant::now();
            let extracted = read_resume(&resume).await?;
            let job_text = read_job_description(&job).await?;

            let context = load_context(&config)?;
            let encoder = load_encoder(&config).await?;

            let result = if no_resources || !config.resources.enabled {
                info!("Learning-resource lookups disabled");
                context
                    .match_resume(&encoder, &extracted.text, &job_text, &NoopSearch, &config.resources)
                    .await?
            } else {
                let search = DuckDuckGoSearch::new(&config.resources)?;
                context
                    .match_resume(&encoder, &extracted.text, &job_text, &search, &config.resources)
                    .await?
            };

            let job_name = job.to_string_lossy();
            let report = Report::new(
                ReportMetadata::new(&resume.to_string_lossy(), Some(&job_name), elapsed_ms(start_time)),
                ReportBody::JobMatch(result),
            );
            deliver(&report, &resume, &extracted.text, &config, &delivery)
        }

        Commands::Predict { resume } => {
            let start_time = Instant::now();
            let extracted = read_resume(&resume).await?;

            let context = load_context(&config)?;
            let matches = match context.predict_titles(&extracted.text) {
                Err(AtsError::NoSkillsExtracted) => {
                    warn!("No relevant skills extracted from the resume");
                    return Err(AtsError::NoSkillsExtracted);
                }
                other => other?,
            };

            let report = Report::new(
                ReportMetadata::new(&resume.to_string_lossy(), None, elapsed_ms(start_time)),
                ReportBody::JobPrediction(matches),
            );
            deliver(&report, &resume, &extracted.text, &config, &delivery)
        }

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration\n");
                    println!("Config File: {}", config_path.display());
                    println!("Models Directory: {}", config.models.models_dir.display());
                    println!("Embedding Model: {}", config.models.embedding_model);
                    println!("Job Corpus: {}", config.corpus.path.display());
                    println!("\nLearning Resources:");
                    println!("  Enabled: {}", config.resources.enabled);
                    println!("  Endpoint: {}", config.resources.endpoint);
                    println!("  Query: {}", config.resources.query_template);
                    println!("  Results per skill: {}", config.resources.max_results);
                    println!("\nHistory:");
                    println!("  Enabled: {}", config.history.enabled);
                    println!("  Directory: {}", config.history.dir.display());
                    println!("\nOutput Format: {:?}", config.output.format);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(config_path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
            Ok(())
        }
    }
}

async fn read_resume(path: &Path) -> Result<ExtractedText> {
    cli::validate_file_extension(path, RESUME_EXTENSIONS)
        .map_err(|e| AtsError::UnsupportedFormat(format!("Resume file: {}", e)))?;

    let mut input_manager = InputManager::new();
    let extracted = input_manager.extract_text(path).await?;
    info!(
        "Resume text: {} characters, {} page(s)",
        extracted.text.len(),
        extracted.page_count
    );
    Ok(extracted)
}

async fn read_job_description(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        if text.trim().is_empty() {
            return Err(AtsError::EmptyExtraction("stdin".to_string()));
        }
        return Ok(text);
    }

    let mut input_manager = InputManager::new();
    Ok(input_manager.extract_text(path).await?.text)
}

fn load_context(config: &Config) -> Result<AnalysisContext> {
    AnalysisContext::load(&config.corpus.path)
}

async fn load_encoder(config: &Config) -> Result<EmbeddingEngine> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Loading embedding model {}", config.models.embedding_model));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let model_location = config.embedding_model_location();
    let loaded = tokio::task::spawn_blocking(move || EmbeddingEngine::new(&model_location))
        .await
        .map_err(|e| AtsError::Embedding(format!("Model loading task failed: {}", e)))?;

    spinner.finish_and_clear();
    loaded
}

fn deliver(
    report: &Report,
    resume: &Path,
    resume_text: &str,
    config: &Config,
    delivery: &Delivery,
) -> Result<()> {
    let format = config.output.format;
    let generator = ReportGenerator::with_options(config.output.color_output, true, true);
    println!("{}", generator.generate_report(report, format)?);

    if let Some(save_path) = &delivery.save {
        let plain = ReportGenerator::with_options(false, true, true);
        save_report_to_file(&plain.generate_report(report, format)?, save_path)?;
        info!("Report saved to {}", save_path.display());
    }

    if let Some(identity) = &delivery.identity {
        let filename = resume
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let record = SubmissionRecord::new(&filename, resume_text, report.module(), &report.body)?;
        JsonlHistoryStore::new(&config.history.dir).append(identity, &record)?;
    }

    Ok(())
}

fn elapsed_ms(start_time: Instant) -> u64 {
    start_time.elapsed().as_millis() as u64
}
