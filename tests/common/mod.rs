//! Shared helpers for integration tests

use resume_ats::processing::corpus::{JobCorpus, JobPosting};
use resume_ats::processing::embeddings::SentenceEncoder;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

const DIMENSIONS: usize = 64;

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn sample_corpus() -> JobCorpus {
    JobCorpus::from_postings(vec![
        JobPosting::new("Data Scientist", "Python, SQL, Pandas, Statistics", "Communication"),
        JobPosting::new("DevOps Engineer", "Docker, Kubernetes, Terraform, Linux", "Teamwork"),
        JobPosting::new("Frontend Developer", "JavaScript, React, CSS, HTML", "Creativity"),
        JobPosting::new("Backend Developer", "Java, Spring, SQL, Docker", "Teamwork"),
    ])
}

/// Hashed bag of words, so equal sentences get equal vectors without a model
pub struct HashingEncoder;

impl SentenceEncoder for HashingEncoder {
    fn encode(&self, sentences: &[String]) -> Vec<Vec<f32>> {
        sentences
            .iter()
            .map(|sentence| {
                let mut vector = vec![0.0f32; DIMENSIONS];
                for word in sentence.split_whitespace() {
                    let mut hasher = DefaultHasher::new();
                    word.to_lowercase().hash(&mut hasher);
                    vector[(hasher.finish() as usize) % DIMENSIONS] += 1.0;
                }
                vector
            })
            .collect()
    }

    fn name(&self) -> &str {
        "hashing-test-encoder"
    }
}
