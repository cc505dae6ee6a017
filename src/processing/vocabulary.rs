//! Canonical skill vocabulary built from the job corpus

use crate::error::{AtsError, Result};
use crate::processing::corpus::JobCorpus;
use crate::processing::phrase_extractor::PhraseSet;
use aho_corasick::AhoCorasick;
use std::collections::{BTreeSet, HashSet};

/// The only dictionary against which extracted phrases count as skills.
/// Built once and never mutated.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    skills: BTreeSet<String>,
    matcher: AhoCorasick,
}

impl SkillVocabulary {
    /// Vocabulary from the `IT Skills` column of every posting
    pub fn from_corpus(corpus: &JobCorpus) -> Result<Self> {
        Self::from_skill_lists(corpus.postings().iter().map(|p| p.it_skills.as_str()))
    }

    /// Vocabulary from both skill columns, used by the job-title predictor
    pub fn from_corpus_with_soft_skills(corpus: &JobCorpus) -> Result<Self> {
        Self::from_skill_lists(
            corpus
                .postings()
                .iter()
                .flat_map(|p| [p.it_skills.as_str(), p.soft_skills.as_str()]),
        )
    }

    /// Split comma-separated lists into trimmed, lower-cased skills
    pub fn from_skill_lists<'a>(lists: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let skills: BTreeSet<String> = lists
            .into_iter()
            .flat_map(|list| list.split(','))
            .map(|skill| skill.trim().to_lowercase())
            .filter(|skill| !skill.is_empty())
            .collect();

        Self::from_skills(skills)
    }

    pub fn from_skills(skills: BTreeSet<String>) -> Result<Self> {
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&skills)
            .map_err(|e| AtsError::AnalysisFailed(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self { skills, matcher })
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.skills.contains(phrase)
    }

    /// Keep only the phrases that are canonical skills
    pub fn filter(&self, phrases: &PhraseSet) -> PhraseSet {
        phrases
            .iter()
            .filter(|phrase| self.skills.contains(phrase.as_str()))
            .cloned()
            .collect()
    }

    /// Number of distinct skills occurring anywhere in `text` as a substring
    pub fn count_occurrences(&self, text: &str) -> usize {
        let lowered = text.to_lowercase();
        self.matcher
            .find_overlapping_iter(&lowered)
            .map(|m| m.pattern().as_usize())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn skills(&self) -> &BTreeSet<String> {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
