//! Input manager for handling different file types

use crate::error::{AtsError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, ExtractedText, MarkdownExtractor, PdfExtractor, PlainTextExtractor,
    TextExtractor,
};
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, ExtractedText>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<ExtractedText> {
        let path_str = path.to_string_lossy().to_string();

        if let Some(cached) = self.cache.get(&path_str) {
            info!("Using cached text for: {}", path.display());
            return Ok(cached.clone());
        }

        if !path.exists() {
            return Err(AtsError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = self.detect_file_type(path)?;
        if file_type == FileType::Unknown {
            return Err(AtsError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        let bytes = fs::read(path).await?;
        info!("Extracting {:?} text from: {}", file_type, path.display());
        let extracted = Self::extract_bytes(&bytes, file_type, &path_str)?;

        self.cache.insert(path_str, extracted.clone());

        Ok(extracted)
    }

    /// Extract from an in-memory upload. Blank output is an error so callers
    /// never score an empty resume.
    pub fn extract_bytes(bytes: &[u8], file_type: FileType, source: &str) -> Result<ExtractedText> {
        let extracted = match file_type {
            FileType::Pdf => PdfExtractor.extract(bytes)?,
            FileType::Docx => DocxExtractor.extract(bytes)?,
            FileType::Text => PlainTextExtractor.extract(bytes)?,
            FileType::Markdown => MarkdownExtractor.extract(bytes)?,
            FileType::Unknown => {
                return Err(AtsError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    source
                )));
            }
        };

        if extracted.is_blank() {
            return Err(AtsError::EmptyExtraction(source.to_string()));
        }

        Ok(extracted)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                AtsError::UnsupportedFormat(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
