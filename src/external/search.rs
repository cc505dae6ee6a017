//! Learning-resource search
//!
//! Lookups never fail from the caller's point of view: transport or parse
//! errors are logged and surface as an empty result list.

use crate::config::ResourceConfig;
use crate::error::{AtsError, Result};
use log::{debug, warn};
use reqwest::Url;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningResource {
    pub title: String,
    pub url: String,
}

pub trait ResourceSearch: Send + Sync {
    fn search(&self, query: &str, limit: usize) -> impl Future<Output = Vec<LearningResource>> + Send;
}

/// Always returns nothing; used when lookups are disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSearch;

impl ResourceSearch for NoopSearch {
    async fn search(&self, _query: &str, _limit: usize) -> Vec<LearningResource> {
        Vec::new()
    }
}

/// Scrapes the DuckDuckGo HTML endpoint
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(config: &ResourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AtsError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn fetch(&self, query: &str) -> std::result::Result<String, reqwest::Error> {
        self.client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

impl ResourceSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<LearningResource> {
        match self.fetch(query).await {
            Ok(body) => {
                let results = parse_results(&body, limit);
                debug!("{} resources found for '{}'", results.len(), query);
                results
            }
            Err(e) => {
                warn!("Resource search failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }
}

/// Pull `{title, url}` pairs out of a DuckDuckGo HTML results page
pub fn parse_results(body: &str, limit: usize) -> Vec<LearningResource> {
    let selector = match Selector::parse("a.result__a") {
        Ok(selector) => selector,
        Err(e) => {
            warn!("Invalid result selector: {}", e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(body);
    document
        .select(&selector)
        .filter_map(|anchor| {
            let title = anchor.text().collect::<Vec<_>>().join("").trim().to_string();
            let url = resolve_link(anchor.value().attr("href")?)?;
            (!title.is_empty()).then_some(LearningResource { title, url })
        })
        .take(limit)
        .collect()
}

/// Unwrap `//duckduckgo.com/l/?uddg=<target>` redirect links
fn resolve_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let url = Url::parse(&absolute).ok()?;
    if let Some((_, target)) = url.query_pairs().find(|(key, _)| key == "uddg") {
        return Some(target.into_owned());
    }

    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.coursera.org%2Flearn%2Fkubernetes&amp;rut=abc">Kubernetes <b>Course</b></a>
          </div>
          <div class="result">
            <a class="result__a" href="https://www.udemy.com/course/k8s/">K8s Bootcamp</a>
          </div>
          <div class="result">
            <a class="result__a" href="javascript:void(0)">Broken</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://example.org/third">Third</a>
          </div>
        </body></html>"#;

    #[test]
    fn test_parses_and_decodes_results() {
        let results = parse_results(RESULTS_PAGE, 3);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Kubernetes Course");
        assert_eq!(results[0].url, "https://www.coursera.org/learn/kubernetes");
        assert_eq!(results[1].url, "https://www.udemy.com/course/k8s/");
        assert_eq!(results[2].title, "Third");
    }

    #[test]
    fn test_limit_is_respected() {
        assert_eq!(parse_results(RESULTS_PAGE, 1).len(), 1);
        assert!(parse_results("<html></html>", 3).is_empty());
    }

    #[tokio::test]
    async fn test_noop_search_returns_nothing() {
        assert!(NoopSearch.search("rust", 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_empty_list() {
        let config = ResourceConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:9/html/".to_string(),
            query_template: "{skill}".to_string(),
            max_results: 3,
            timeout_secs: 2,
            user_agent: "test".to_string(),
        };
        let search = DuckDuckGoSearch::new(&config).unwrap();
        assert!(search.search("rust", 3).await.is_empty());
    }
}
