//! Sentence embeddings using Model2Vec

use crate::config::Config;
use crate::error::{AtsError, Result};
use log::info;
use model2vec_rs::model::StaticModel;
use ndarray::{Array1, Array2, Axis};
use std::path::Path;
use std::time::Instant;

/// Anything that turns sentences into fixed-width vectors
pub trait SentenceEncoder: Send + Sync {
    fn encode(&self, sentences: &[String]) -> Vec<Vec<f32>>;

    fn name(&self) -> &str;
}

pub struct EmbeddingEngine {
    model: StaticModel,
    model_name: String,
}

impl EmbeddingEngine {
    /// Load from a local folder or a HuggingFace repo id
    pub fn new(model_path: &Path) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(model_path, None, None, None)
            .map_err(|e| AtsError::Embedding(format!("Failed to load model: {}", e)))?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_path.display().to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.embedding_model_location())
    }
}

impl SentenceEncoder for EmbeddingEngine {
    fn encode(&self, sentences: &[String]) -> Vec<Vec<f32>> {
        self.model.encode(sentences)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Average of the sentence vectors, `None` when there are none
pub fn mean_embedding(embeddings: &[Vec<f32>]) -> Option<Array1<f32>> {
    let dim = embeddings.first()?.len();
    if dim == 0 || embeddings.iter().any(|e| e.len() != dim) {
        return None;
    }

    let flat: Vec<f32> = embeddings.iter().flatten().copied().collect();
    let matrix = Array2::from_shape_vec((embeddings.len(), dim), flat).ok()?;
    matrix.mean_axis(Axis(0))
}

pub fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let norm_a = a.dot(a).sqrt();
    let norm_b = b.dot(b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        a.dot(b) / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_mean_embedding() {
        let mean = mean_embedding(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 2.0]]).unwrap();
        assert_relative_eq!(mean[0], 1.0);
        assert_relative_eq!(mean[1], 1.0);
    }

    #[test]
    fn test_mean_embedding_rejects_empty_and_ragged() {
        assert!(mean_embedding(&[]).is_none());
        assert!(mean_embedding(&[vec![1.0], vec![1.0, 2.0]]).is_none());
    }

    #[test]
    fn test_cosine_similarity() {
        let a = array![1.0f32, 2.0, 3.0];
        let b = array![2.0f32, 4.0, 6.0];
        let c = array![-1.0f32, -2.0, -3.0];
        let zero = array![0.0f32, 0.0, 0.0];

        assert_relative_eq!(cosine_similarity(&a, &b), 1.0, epsilon = 1e-6);
        assert_relative_eq!(cosine_similarity(&a, &c), -1.0, epsilon = 1e-6);
        assert_eq!(cosine_similarity(&a, &zero), 0.0);
    }
}
