//! Job-title prediction against the job corpus

use crate::error::{AtsError, Result};
use crate::processing::corpus::JobCorpus;
use crate::processing::phrase_extractor::{PhraseExtractor, PhraseSet};
use crate::processing::tfidf::{cosine_similarity, SparseVector, TfidfConfig, TfidfVectorizer};
use crate::processing::vocabulary::SkillVocabulary;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const TOP_MATCHES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub title: String,
    /// Share of the posting's skills found in the resume, in [0, 100]
    pub skill_match: f64,
    /// TF-IDF cosine similarity that put the posting in the shortlist
    pub similarity: f64,
}

struct IndexedPosting {
    title: String,
    vector: SparseVector,
    skills: PhraseSet,
}

/// Fitted once at startup, read-only afterwards
pub struct JobTitlePredictor {
    vocabulary: SkillVocabulary,
    vectorizer: TfidfVectorizer,
    extractor: PhraseExtractor,
    postings: Vec<IndexedPosting>,
}

impl JobTitlePredictor {
    pub fn new(corpus: &JobCorpus) -> Result<Self> {
        let vocabulary = SkillVocabulary::from_corpus_with_soft_skills(corpus)?;
        let extractor = PhraseExtractor::new();

        let skill_texts: Vec<String> = corpus.postings().iter().map(|p| p.skill_text()).collect();
        let mut vectorizer = TfidfVectorizer::new(TfidfConfig {
            ngram_range: (1, 3),
            sublinear_tf: true,
            max_df: 0.85,
            remove_stop_words: false,
            vocabulary: Some(vocabulary.skills().clone()),
        });
        let vectors = vectorizer.fit_transform(&skill_texts);

        let postings = corpus
            .postings()
            .iter()
            .zip(skill_texts.iter())
            .zip(vectors)
            .map(|((posting, skill_text), vector)| IndexedPosting {
                title: posting.title.clone(),
                vector,
                skills: vocabulary.filter(&extractor.extract(skill_text)),
            })
            .collect();

        info!(
            "Job-title predictor fitted on {} postings with {} features",
            corpus.len(),
            vectorizer.feature_count()
        );

        Ok(Self {
            vocabulary,
            vectorizer,
            extractor,
            postings,
        })
    }

    /// Canonical skills found in the resume
    pub fn resume_skills(&self, resume_text: &str) -> PhraseSet {
        self.vocabulary.filter(&self.extractor.extract(resume_text))
    }

    /// Up to five postings, highest skill overlap first. Equal overlaps keep
    /// their similarity order.
    pub fn predict(&self, resume_text: &str) -> Result<Vec<JobMatch>> {
        let resume_skills = self.resume_skills(resume_text);
        if resume_skills.is_empty() {
            return Err(AtsError::NoSkillsExtracted);
        }
        debug!("Resume skills: {:?}", resume_skills);

        let resume_document = resume_skills.iter().cloned().collect::<Vec<_>>().join(" ");
        let resume_vector = self.vectorizer.transform(&resume_document);

        let mut shortlist: Vec<(&IndexedPosting, f64)> = self
            .postings
            .iter()
            .map(|posting| (posting, cosine_similarity(&resume_vector, &posting.vector)))
            .collect();
        shortlist.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        shortlist.truncate(TOP_MATCHES);

        let mut matches: Vec<JobMatch> = shortlist
            .into_iter()
            .map(|(posting, similarity)| JobMatch {
                title: posting.title.clone(),
                skill_match: skill_overlap(&resume_skills, &posting.skills),
                similarity,
            })
            .collect();
        matches.sort_by(|a, b| {
            b.skill_match
                .partial_cmp(&a.skill_match)
                .unwrap_or(Ordering::Equal)
        });

        Ok(matches)
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }
}

/// `|resume ∩ job| / |job| * 100`, 0 for a posting without skills
pub fn skill_overlap(resume_skills: &PhraseSet, job_skills: &PhraseSet) -> f64 {
    if job_skills.is_empty() || resume_skills.is_empty() {
        return 0.0;
    }
    let common = resume_skills.intersection(job_skills).count();
    common as f64 / job_skills.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::corpus::JobPosting;

    fn corpus() -> JobCorpus {
        JobCorpus::from_postings(vec![
            JobPosting::new("Data Scientist", "Python, SQL, Pandas, Statistics", "Communication"),
            JobPosting::new("DevOps Engineer", "Docker, Kubernetes, Terraform, Linux", "Teamwork"),
            JobPosting::new("Frontend Developer", "JavaScript, React, CSS, HTML", "Creativity"),
            JobPosting::new("Backend Developer", "Java, Spring, SQL, Docker", "Teamwork"),
        ])
    }

    #[test]
    fn test_verbatim_skill_text_ranks_its_posting_first() {
        let corpus = corpus();
        let predictor = JobTitlePredictor::new(&corpus).unwrap();

        let resume = corpus.postings()[1].skill_text();
        let matches = predictor.predict(&resume).unwrap();

        assert_eq!(matches[0].title, "DevOps Engineer");
        assert_eq!(matches[0].skill_match, 100.0);
        assert!(matches.len() <= TOP_MATCHES);
    }

    #[test]
    fn test_matches_are_sorted_by_skill_match() {
        let predictor = JobTitlePredictor::new(&corpus()).unwrap();
        let matches = predictor
            .predict("Built services in Java and SQL, deployed with Docker on Linux.")
            .unwrap();

        assert_eq!(matches[0].title, "Backend Developer");
        assert!(matches
            .windows(2)
            .all(|pair| pair[0].skill_match >= pair[1].skill_match));
        for m in &matches {
            assert!((0.0..=100.0).contains(&m.skill_match));
        }
    }

    #[test]
    fn test_no_skills_is_a_distinct_error() {
        let predictor = JobTitlePredictor::new(&corpus()).unwrap();
        let result = predictor.predict("I enjoy hiking and photography.");
        assert!(matches!(result, Err(AtsError::NoSkillsExtracted)));
    }

    #[test]
    fn test_skill_overlap() {
        let resume: PhraseSet = ["python", "sql"].iter().map(|s| s.to_string()).collect();
        let job: PhraseSet = ["python", "sql", "pandas", "statistics"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(skill_overlap(&resume, &job), 50.0);
        assert_eq!(skill_overlap(&resume, &PhraseSet::new()), 0.0);
    }
}
