//! Startup analysis context shared by every request

use crate::config::ResourceConfig;
use crate::error::{AtsError, Result};
use crate::external::search::ResourceSearch;
use crate::input::ExtractedText;
use crate::processing::ats_scorer::{AtsScorer, ScoreReport};
use crate::processing::corpus::JobCorpus;
use crate::processing::embeddings::SentenceEncoder;
use crate::processing::hybrid_matcher::{HybridMatcher, MatchScores};
use crate::processing::predictor::{JobMatch, JobTitlePredictor};
use crate::processing::skill_gap::{SkillGap, SkillGapAnalyzer};
use crate::processing::vocabulary::SkillVocabulary;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Similarity scores plus the skill gap for one resume / job pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub scores: MatchScores,
    #[serde(flatten)]
    pub gap: SkillGap,
}

/// Corpus, vocabulary and fitted predictor. Built once, then only read, so a
/// shared reference can be used from any number of threads.
pub struct AnalysisContext {
    corpus: JobCorpus,
    vocabulary: SkillVocabulary,
    predictor: JobTitlePredictor,
}

impl AnalysisContext {
    pub fn new(corpus: JobCorpus) -> Result<Self> {
        if corpus.is_empty() {
            return Err(AtsError::CorpusLoad("Job corpus has no postings".to_string()));
        }

        let start_time = Instant::now();
        let vocabulary = SkillVocabulary::from_corpus(&corpus)?;
        let predictor = JobTitlePredictor::new(&corpus)?;
        info!(
            "Analysis context ready: {} postings, {} canonical skills ({:.2?})",
            corpus.len(),
            vocabulary.len(),
            start_time.elapsed()
        );

        Ok(Self {
            corpus,
            vocabulary,
            predictor,
        })
    }

    pub fn load(corpus_path: &Path) -> Result<Self> {
        Self::new(JobCorpus::load(corpus_path)?)
    }

    pub fn corpus(&self) -> &JobCorpus {
        &self.corpus
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn predictor(&self) -> &JobTitlePredictor {
        &self.predictor
    }

    pub fn scorer(&self) -> AtsScorer<'_> {
        AtsScorer::new(&self.vocabulary)
    }

    pub fn score_resume(&self, resume: &ExtractedText) -> Result<ScoreReport> {
        self.scorer().score(resume)
    }

    pub fn skill_gap_analyzer(&self, resources: &ResourceConfig) -> SkillGapAnalyzer<'_> {
        SkillGapAnalyzer::new(&self.vocabulary)
            .with_query_template(&resources.query_template)
            .with_resources_per_skill(resources.max_results)
    }

    pub async fn match_resume<S: ResourceSearch>(
        &self,
        encoder: &dyn SentenceEncoder,
        resume_text: &str,
        job_text: &str,
        search: &S,
        resources: &ResourceConfig,
    ) -> Result<MatchResult> {
        let scores = HybridMatcher::new(encoder).score(resume_text, job_text)?;
        let gap = self
            .skill_gap_analyzer(resources)
            .analyze(resume_text, job_text, search)
            .await;

        Ok(MatchResult { scores, gap })
    }

    pub fn predict_titles(&self, resume_text: &str) -> Result<Vec<JobMatch>> {
        if resume_text.trim().is_empty() {
            return Err(AtsError::InvalidInput(
                "Cannot predict titles for an empty resume".to_string(),
            ));
        }
        self.predictor.predict(resume_text)
    }
}
