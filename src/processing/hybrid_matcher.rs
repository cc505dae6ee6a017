//! Hybrid resume / job-description similarity
//!
//! Combines three views of the same pair of texts:
//! - semantic: mean sentence embeddings compared by cosine
//! - lexical: TF-IDF over the two stop-word-filtered documents
//! - fuzzy: share of job phrases with a close resume phrase

use crate::error::{AtsError, Result};
use crate::processing::embeddings::{cosine_similarity, mean_embedding, SentenceEncoder};
use crate::processing::fuzzy::fuzzy_overlap_score;
use crate::processing::phrase_extractor::PhraseExtractor;
use crate::processing::text_processor::TextProcessor;
use crate::processing::tfidf::{self, TfidfConfig, TfidfVectorizer};
use log::debug;
use serde::{Deserialize, Serialize};

pub const SEMANTIC_WEIGHT: f64 = 0.5;
pub const LEXICAL_WEIGHT: f64 = 0.35;
pub const FUZZY_WEIGHT: f64 = 0.15;

/// Sentences need more than this many words to be embedded
const MIN_SENTENCE_WORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScores {
    pub semantic: f64,
    pub tfidf: f64,
    pub fuzzy: f64,
    pub hybrid: f64,
}

pub struct HybridMatcher<'a> {
    encoder: &'a dyn SentenceEncoder,
    processor: TextProcessor,
    extractor: PhraseExtractor,
}

impl<'a> HybridMatcher<'a> {
    pub fn new(encoder: &'a dyn SentenceEncoder) -> Self {
        Self {
            encoder,
            processor: TextProcessor::new(),
            extractor: PhraseExtractor::new(),
        }
    }

    pub fn score(&self, resume_text: &str, job_text: &str) -> Result<MatchScores> {
        if resume_text.trim().is_empty() || job_text.trim().is_empty() {
            return Err(AtsError::InvalidInput(
                "Both resume and job description must contain text".to_string(),
            ));
        }

        let semantic = self.semantic_score(resume_text, job_text);
        let lexical = self.lexical_score(resume_text, job_text);
        let fuzzy = self.fuzzy_score(resume_text, job_text);
        let hybrid = round2(SEMANTIC_WEIGHT * semantic + LEXICAL_WEIGHT * lexical + FUZZY_WEIGHT * fuzzy);

        debug!(
            "Semantic: {:.2}, TF-IDF: {:.2}, Fuzzy: {:.2}, Final: {:.2} ({})",
            semantic,
            lexical,
            fuzzy,
            hybrid,
            self.encoder.name()
        );

        Ok(MatchScores {
            semantic,
            tfidf: lexical,
            fuzzy,
            hybrid: hybrid.clamp(0.0, 100.0),
        })
    }

    /// 0 when either side has no sentence long enough to embed
    pub fn semantic_score(&self, resume_text: &str, job_text: &str) -> f64 {
        let resume_sentences = self.processor.split_sentences(resume_text, MIN_SENTENCE_WORDS);
        let job_sentences = self.processor.split_sentences(job_text, MIN_SENTENCE_WORDS);
        if resume_sentences.is_empty() || job_sentences.is_empty() {
            return 0.0;
        }

        let resume_mean = mean_embedding(&self.encoder.encode(&resume_sentences));
        let job_mean = mean_embedding(&self.encoder.encode(&job_sentences));

        match (resume_mean, job_mean) {
            (Some(resume), Some(job)) => to_percentage(cosine_similarity(&resume, &job) as f64),
            _ => 0.0,
        }
    }

    pub fn lexical_score(&self, resume_text: &str, job_text: &str) -> f64 {
        let documents = [
            self.processor.remove_stop_words(resume_text),
            self.processor.remove_stop_words(job_text),
        ];

        let mut vectorizer = TfidfVectorizer::new(TfidfConfig {
            remove_stop_words: true,
            ..Default::default()
        });
        let vectors = vectorizer.fit_transform(&documents);

        to_percentage(tfidf::cosine_similarity(&vectors[0], &vectors[1]))
    }

    pub fn fuzzy_score(&self, resume_text: &str, job_text: &str) -> f64 {
        let resume_phrases = self.extractor.extract(resume_text);
        let job_phrases = self.extractor.extract(job_text);
        fuzzy_overlap_score(&job_phrases, &resume_phrases)
    }
}

fn to_percentage(similarity: f64) -> f64 {
    (similarity * 100.0).clamp(0.0, 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Maps every sentence to the same vector
    struct ConstantEncoder;

    impl SentenceEncoder for ConstantEncoder {
        fn encode(&self, sentences: &[String]) -> Vec<Vec<f32>> {
            sentences.iter().map(|_| vec![0.5, 0.5, 0.0]).collect()
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    const JOB: &str = "We are hiring a backend engineer with strong Python and PostgreSQL experience.\n\
                       The engineer will build data pipelines on Kubernetes and AWS infrastructure.";

    #[test]
    fn test_identical_texts_score_full_marks() {
        let encoder = ConstantEncoder;
        let matcher = HybridMatcher::new(&encoder);
        let scores = matcher.score(JOB, JOB).unwrap();

        assert!((scores.semantic - 100.0).abs() < 1e-3);
        assert!((scores.tfidf - 100.0).abs() < 1e-6);
        assert_eq!(scores.fuzzy, 100.0);
        assert_eq!(scores.hybrid, 100.0);
    }

    #[test]
    fn test_short_sentences_give_zero_semantic() {
        let encoder = ConstantEncoder;
        let matcher = HybridMatcher::new(&encoder);
        assert_eq!(matcher.semantic_score("Python. SQL.", JOB), 0.0);
    }

    #[test]
    fn test_unrelated_texts_have_no_lexical_overlap() {
        let encoder = ConstantEncoder;
        let matcher = HybridMatcher::new(&encoder);
        let score = matcher.lexical_score("payroll accounting ledgers", "kubernetes terraform");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_hybrid_is_weighted_and_rounded() {
        let encoder = ConstantEncoder;
        let matcher = HybridMatcher::new(&encoder);
        let resume = "Experienced engineer who builds Python services and data pipelines daily.";
        let scores = matcher.score(resume, JOB).unwrap();

        let expected = round2(0.5 * scores.semantic + 0.35 * scores.tfidf + 0.15 * scores.fuzzy);
        assert_eq!(scores.hybrid, expected);
        for score in [scores.semantic, scores.tfidf, scores.fuzzy, scores.hybrid] {
            assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let encoder = ConstantEncoder;
        let matcher = HybridMatcher::new(&encoder);
        assert!(matches!(matcher.score("  ", JOB), Err(AtsError::InvalidInput(_))));
    }
}
