//! TF-IDF vectorization over word n-grams
//!
//! Vectors are sparse maps from term to weight. Weighting follows the
//! smoothed scheme `idf = ln((1 + n) / (1 + df)) + 1` with optional
//! sublinear term frequency, and every vector is L2-normalized so cosine
//! similarity reduces to a dot product.

use crate::processing::text_processor::TextProcessor;
use std::collections::{BTreeSet, HashMap};

pub type SparseVector = HashMap<String, f64>;

#[derive(Debug, Clone)]
pub struct TfidfConfig {
    /// Inclusive word n-gram range
    pub ngram_range: (usize, usize),
    /// Replace raw counts with `1 + ln(tf)`
    pub sublinear_tf: bool,
    /// Drop terms present in more than this fraction of documents
    pub max_df: f64,
    pub remove_stop_words: bool,
    /// Restrict features to a fixed set of terms
    pub vocabulary: Option<BTreeSet<String>>,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 1),
            sublinear_tf: false,
            max_df: 1.0,
            remove_stop_words: false,
            vocabulary: None,
        }
    }
}

pub struct TfidfVectorizer {
    config: TfidfConfig,
    processor: TextProcessor,
    idf: HashMap<String, f64>,
}

impl TfidfVectorizer {
    pub fn new(config: TfidfConfig) -> Self {
        Self {
            config,
            processor: TextProcessor::new(),
            idf: HashMap::new(),
        }
    }

    /// Learn document frequencies and idf weights from `documents`
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> &mut Self {
        let n_docs = documents.len();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for document in documents {
            for term in self.count_terms(document.as_ref()).into_keys() {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if let Some(vocabulary) = &self.config.vocabulary {
            for term in vocabulary {
                document_frequency.entry(term.clone()).or_insert(0);
            }
        }

        let max_documents = self.config.max_df * n_docs as f64;
        self.idf = document_frequency
            .into_iter()
            .filter(|(_, df)| self.config.max_df >= 1.0 || (*df as f64) <= max_documents)
            .map(|(term, df)| {
                let idf = ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0;
                (term, idf)
            })
            .collect();

        self
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Vec<SparseVector> {
        self.fit(documents);
        documents.iter().map(|d| self.transform(d.as_ref())).collect()
    }

    /// Weight a document against the fitted features
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut vector: SparseVector = self
            .count_terms(document)
            .into_iter()
            .filter_map(|(term, count)| {
                let idf = *self.idf.get(&term)?;
                let tf = if self.config.sublinear_tf {
                    1.0 + (count as f64).ln()
                } else {
                    count as f64
                };
                Some((term, tf * idf))
            })
            .collect();

        let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in vector.values_mut() {
                *weight /= norm;
            }
        }
        vector
    }

    pub fn feature_count(&self) -> usize {
        self.idf.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    fn count_terms(&self, document: &str) -> HashMap<String, usize> {
        let tokens: Vec<String> = self
            .processor
            .tokenize(document)
            .into_iter()
            .filter(|t| !self.config.remove_stop_words || !self.processor.is_stop_word(t))
            .collect();

        let (min_n, max_n) = self.config.ngram_range;
        let mut counts = HashMap::new();

        for n in min_n.max(1)..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(vocabulary) = &self.config.vocabulary {
                    if !vocabulary.contains(&term) {
                        continue;
                    }
                }
                *counts.entry(term).or_insert(0) += 1;
            }
        }

        counts
    }
}

/// Cosine similarity of two sparse vectors, 0 when either is empty
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, weight)| large.get(term).map(|other| weight * other))
        .sum();

    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_documents_have_unit_similarity() {
        let mut vectorizer = TfidfVectorizer::new(TfidfConfig {
            remove_stop_words: true,
            ..Default::default()
        });
        let docs = ["rust engineer building services", "rust engineer building services"];
        let vectors = vectorizer.fit_transform(&docs);

        assert_relative_eq!(cosine_similarity(&vectors[0], &vectors[1]), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_smoothed_idf() {
        let mut vectorizer = TfidfVectorizer::new(TfidfConfig::default());
        vectorizer.fit(&["python sql", "python java", "go"]);

        // df(python) = 2 of 3, df(java) = 1 of 3
        assert_relative_eq!(vectorizer.idf("python").unwrap(), (4.0f64 / 3.0).ln() + 1.0);
        assert_relative_eq!(vectorizer.idf("java").unwrap(), 2.0f64.ln() + 1.0);
    }

    #[test]
    fn test_fixed_vocabulary_with_ngrams_and_max_df() {
        let vocabulary: BTreeSet<String> = ["machine learning", "python", "sql"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut vectorizer = TfidfVectorizer::new(TfidfConfig {
            ngram_range: (1, 3),
            sublinear_tf: true,
            max_df: 0.85,
            remove_stop_words: false,
            vocabulary: Some(vocabulary),
        });
        let vectors = vectorizer.fit_transform(&[
            "python machine learning",
            "python sql",
            "python",
        ]);

        // python is in every document and is dropped by max_df
        assert!(vectorizer.idf("python").is_none());
        assert!(vectors[0].contains_key("machine learning"));
        assert!(!vectors[0].contains_key("machine"));
        assert!(vectors[2].is_empty());
    }

    #[test]
    fn test_disjoint_documents_are_orthogonal() {
        let mut vectorizer = TfidfVectorizer::new(TfidfConfig::default());
        let vectors = vectorizer.fit_transform(&["kubernetes docker", "accounting payroll"]);
        assert_eq!(cosine_similarity(&vectors[0], &vectors[1]), 0.0);
    }
}
