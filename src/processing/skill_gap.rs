//! Skill-gap analysis and learning-resource suggestions

use crate::external::search::{LearningResource, ResourceSearch};
use crate::processing::phrase_extractor::{PhraseExtractor, PhraseSet};
use crate::processing::tfidf::{cosine_similarity, TfidfConfig, TfidfVectorizer};
use crate::processing::vocabulary::SkillVocabulary;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const MAX_SUGGESTED_SKILLS: usize = 3;
pub const DEFAULT_QUERY_TEMPLATE: &str = "Best {skill} online course with certification";
pub const DEFAULT_RESOURCES_PER_SKILL: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    /// Every job skill the resume lacks, sorted
    pub missing_skills: Vec<String>,
    /// At most three missing skills that have learning resources
    pub suggested_skills: Vec<String>,
    pub resources: BTreeMap<String, Vec<LearningResource>>,
}

pub struct SkillGapAnalyzer<'a> {
    vocabulary: &'a SkillVocabulary,
    extractor: PhraseExtractor,
    query_template: String,
    resources_per_skill: usize,
}

impl<'a> SkillGapAnalyzer<'a> {
    pub fn new(vocabulary: &'a SkillVocabulary) -> Self {
        Self {
            vocabulary,
            extractor: PhraseExtractor::new(),
            query_template: DEFAULT_QUERY_TEMPLATE.to_string(),
            resources_per_skill: DEFAULT_RESOURCES_PER_SKILL,
        }
    }

    /// `{skill}` in the template is replaced with the skill being looked up
    pub fn with_query_template(mut self, template: &str) -> Self {
        self.query_template = template.to_string();
        self
    }

    pub fn with_resources_per_skill(mut self, limit: usize) -> Self {
        self.resources_per_skill = limit;
        self
    }

    /// Job skills absent from the resume, both sides restricted to the vocabulary
    pub fn missing_skills(&self, resume_phrases: &PhraseSet, job_phrases: &PhraseSet) -> Vec<String> {
        let resume_skills = self.vocabulary.filter(resume_phrases);
        let job_skills = self.vocabulary.filter(job_phrases);

        job_skills.difference(&resume_skills).cloned().collect()
    }

    /// Top missing skills by TF-IDF similarity to the job description.
    /// Equal scores keep the input order.
    pub fn rank_missing(&self, job_text: &str, missing: &[String]) -> Vec<String> {
        if missing.is_empty() {
            return Vec::new();
        }

        let mut documents = Vec::with_capacity(missing.len() + 1);
        documents.push(job_text.to_string());
        documents.extend(missing.iter().cloned());

        let mut vectorizer = TfidfVectorizer::new(TfidfConfig::default());
        let vectors = vectorizer.fit_transform(&documents);

        let mut ranked: Vec<(&String, f64)> = missing
            .iter()
            .zip(&vectors[1..])
            .map(|(skill, vector)| (skill, cosine_similarity(&vectors[0], vector)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        ranked
            .into_iter()
            .take(MAX_SUGGESTED_SKILLS)
            .map(|(skill, _)| skill.clone())
            .collect()
    }

    pub fn query_for(&self, skill: &str) -> String {
        self.query_template.replace("{skill}", skill)
    }

    pub async fn analyze<S: ResourceSearch>(
        &self,
        resume_text: &str,
        job_text: &str,
        search: &S,
    ) -> SkillGap {
        let resume_phrases = self.extractor.extract(resume_text);
        let job_phrases = self.extractor.extract(job_text);
        self.analyze_phrases(&resume_phrases, &job_phrases, job_text, search)
            .await
    }

    pub async fn analyze_phrases<S: ResourceSearch>(
        &self,
        resume_phrases: &PhraseSet,
        job_phrases: &PhraseSet,
        job_text: &str,
        search: &S,
    ) -> SkillGap {
        let missing_skills = self.missing_skills(resume_phrases, job_phrases);
        info!("{} missing skills found", missing_skills.len());

        let mut suggested_skills = Vec::new();
        let mut resources = BTreeMap::new();

        for skill in self.rank_missing(job_text, &missing_skills) {
            let found = search
                .search(&self.query_for(&skill), self.resources_per_skill)
                .await;
            if found.is_empty() {
                debug!("No resources for '{}', dropping suggestion", skill);
                continue;
            }
            resources.insert(skill.clone(), found);
            suggested_skills.push(skill);
        }

        SkillGap {
            missing_skills,
            suggested_skills,
            resources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::search::NoopSearch;
    use std::sync::Mutex;

    /// Returns one canned result per query, except for skills listed as unknown
    struct CannedSearch {
        unknown: Vec<&'static str>,
        queries: Mutex<Vec<String>>,
    }

    impl CannedSearch {
        fn new(unknown: Vec<&'static str>) -> Self {
            Self {
                unknown,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl ResourceSearch for CannedSearch {
        async fn search(&self, query: &str, limit: usize) -> Vec<LearningResource> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.unknown.iter().any(|u| query.contains(u)) {
                return Vec::new();
            }
            vec![
                LearningResource {
                    title: format!("Course for {}", query),
                    url: "https://example.org/course".to_string(),
                };
                limit.min(1)
            ]
        }
    }

    fn vocabulary() -> SkillVocabulary {
        SkillVocabulary::from_skill_lists([
            "python, sql, docker, kubernetes, terraform, aws, java, golang",
        ])
        .unwrap()
    }

    fn phrases(items: &[&str]) -> PhraseSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_is_set_difference_within_vocabulary() {
        let vocabulary = vocabulary();
        let analyzer = SkillGapAnalyzer::new(&vocabulary);

        let resume = phrases(&["python", "sql", "team player"]);
        let job = phrases(&["python", "docker", "kubernetes", "great culture"]);
        let missing = analyzer.missing_skills(&resume, &job);

        assert_eq!(missing, vec!["docker", "kubernetes"]);
        assert!(missing.iter().all(|s| vocabulary.contains(s)));
        assert!(analyzer.missing_skills(&job, &job).is_empty());
    }

    #[test]
    fn test_rank_prefers_skills_the_job_repeats() {
        let vocabulary = vocabulary();
        let analyzer = SkillGapAnalyzer::new(&vocabulary);

        let job = "Terraform and AWS. More Terraform. Terraform modules on AWS. Some Java.";
        let missing: Vec<String> = ["aws", "golang", "java", "terraform"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ranked = analyzer.rank_missing(job, &missing);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0], "terraform");
        assert_eq!(ranked[1], "aws");
        assert_eq!(ranked[2], "java");
    }

    #[tokio::test]
    async fn test_skills_without_resources_are_dropped() {
        let vocabulary = vocabulary();
        let analyzer = SkillGapAnalyzer::new(&vocabulary);
        let search = CannedSearch::new(vec!["kubernetes"]);

        let gap = analyzer
            .analyze_phrases(
                &phrases(&["python"]),
                &phrases(&["python", "docker", "kubernetes"]),
                "Docker and Kubernetes in production",
                &search,
            )
            .await;

        assert_eq!(gap.missing_skills, vec!["docker", "kubernetes"]);
        assert_eq!(gap.suggested_skills, vec!["docker"]);
        assert_eq!(gap.resources.len(), 1);
        assert!(gap.resources.contains_key("docker"));

        let queries = search.queries.lock().unwrap();
        assert!(queries.contains(&"Best docker online course with certification".to_string()));
    }

    #[tokio::test]
    async fn test_noop_search_keeps_missing_but_suggests_nothing() {
        let vocabulary = vocabulary();
        let analyzer = SkillGapAnalyzer::new(&vocabulary);

        let gap = analyzer
            .analyze("I write Python.", "We need Python, Docker and Terraform.", &NoopSearch)
            .await;

        assert_eq!(gap.missing_skills, vec!["docker", "terraform"]);
        assert!(gap.suggested_skills.is_empty());
        assert!(gap.resources.is_empty());
    }
}
