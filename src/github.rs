//! GitHub repository search client.
//!
//! One call per keyword, first page only, host-native `sort=stars`. The host
//! is treated as an opaque rate-limited search capability; throttling maps to
//! [`SearchError::RateLimited`] and everything else non-recoverable to
//! [`SearchError::Host`]. Retry/backoff policy lives in the orchestrator, not
//! here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::GithubConfig;
use crate::error::SearchError;
use crate::models::Candidate;

/// Query-by-keyword search capability. Implemented by the real GitHub client
/// and by in-process fakes in tests.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<Vec<Candidate>, SearchError>;
}

pub struct GithubSearch {
    client: reqwest::Client,
    config: GithubConfig,
    /// Lowercase substrings that disqualify a candidate.
    blocklist: Vec<String>,
}

impl GithubSearch {
    pub fn new(client: reqwest::Client, config: GithubConfig, blocklist: Vec<String>) -> Self {
        Self {
            client,
            config,
            blocklist,
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    items: Vec<RepoItem>,
}

#[derive(Deserialize)]
struct RepoItem {
    full_name: String,
    html_url: String,
    description: Option<String>,
    stargazers_count: u64,
    forks_count: u64,
    pushed_at: Option<DateTime<Utc>>,
    language: Option<String>,
}

impl RepoItem {
    fn into_candidate(self, keyword: &str) -> Candidate {
        Candidate {
            identifier: self.full_name,
            url: self.html_url,
            description: self.description,
            stars: self.stargazers_count,
            forks: self.forks_count,
            pushed_at: self.pushed_at,
            language: self.language,
            source_keyword: keyword.to_string(),
        }
    }
}

#[async_trait]
impl SearchBackend for GithubSearch {
    async fn search(&self, keyword: &str) -> Result<Vec<Candidate>, SearchError> {
        let url = format!("{}/search/repositories", self.config.api_url);
        let per_page = self.config.per_page.to_string();

        let mut req = self
            .client
            .get(&url)
            .query(&[
                ("q", keyword),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ])
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", "awesome-search");

        if let Some(token) = &self.config.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let resp = req
            .send()
            .await
            .map_err(|e| SearchError::Host(format!("request failed: {e}")))?;

        let status = resp.status();
        // GitHub signals both primary and secondary rate limits with 403/429.
        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            return Err(SearchError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Host(format!(
                "search API returned {status}: {body}"
            )));
        }

        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::Host(format!("malformed search response: {e}")))?;

        let candidates: Vec<Candidate> = body
            .items
            .into_iter()
            .map(|item| item.into_candidate(keyword))
            .filter(|c| !is_blocked(c, &self.blocklist))
            .collect();

        tracing::info!(
            "Keyword '{keyword}' returned {} candidates after filtering",
            candidates.len()
        );
        Ok(candidates)
    }
}

fn is_blocked(candidate: &Candidate, blocklist: &[String]) -> bool {
    if blocklist.is_empty() {
        return false;
    }
    let name = candidate.identifier.to_lowercase();
    let desc = candidate
        .description
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    blocklist
        .iter()
        .any(|term| name.contains(term) || desc.contains(term))
}
