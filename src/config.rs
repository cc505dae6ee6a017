//! Configuration management for the resume ATS toolkit

use crate::error::{AtsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub corpus: CorpusConfig,
    pub resources: ResourceConfig,
    pub history: HistoryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// HuggingFace repo id or a folder name under `models_dir`
    pub embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// CSV with `Job Title`, `IT Skills` and `Soft Skills` columns
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub enabled: bool,
    pub endpoint: String,
    /// `{skill}` is replaced with the missing skill
    pub query_template: String,
    pub max_results: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-ats");

        Self {
            models: ModelConfig {
                models_dir: data_dir.join("models"),
                embedding_model: "minishlab/potion-base-8M".to_string(),
            },
            corpus: CorpusConfig {
                path: PathBuf::from("data.csv"),
            },
            resources: ResourceConfig {
                enabled: true,
                endpoint: "https://html.duckduckgo.com/html/".to_string(),
                query_template: "Best {skill} online course with certification".to_string(),
                max_results: 3,
                timeout_secs: 10,
                user_agent: format!("resume-ats/{}", env!("CARGO_PKG_VERSION")),
            },
            history: HistoryConfig {
                enabled: false,
                dir: data_dir.join("history"),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| AtsError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ats")
            .join("config.toml")
    }

    /// Resolve the embedding model to a local folder when one exists,
    /// otherwise hand back the repo id for a hub download.
    pub fn embedding_model_location(&self) -> PathBuf {
        let local_path = self.models.models_dir.join(&self.models.embedding_model);
        if local_path.exists() {
            local_path
        } else {
            PathBuf::from(&self.models.embedding_model)
        }
    }

    pub fn search_query(&self, skill: &str) -> String {
        self.resources.query_template.replace("{skill}", skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.corpus.path = PathBuf::from("/srv/jobs.csv");
        config.resources.max_results = 5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.corpus.path, PathBuf::from("/srv/jobs.csv"));
        assert_eq!(loaded.resources.max_results, 5);
        assert_eq!(loaded.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.resources.max_results, 3);
    }

    #[test]
    fn test_invalid_toml_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "models = 12").unwrap();

        assert!(matches!(Config::load_from(&path), Err(AtsError::Configuration(_))));
    }

    #[test]
    fn test_search_query_template() {
        let config = Config::default();
        assert_eq!(
            config.search_query("kubernetes"),
            "Best kubernetes online course with certification"
        );
    }
}
