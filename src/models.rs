use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which query-expansion workflow produced (or should produce) a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Deterministic heuristic expansion, no LLM involved.
    Standard,
    /// LLM-driven expansion.
    Logic,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Standard => "standard",
            SearchMode::Logic => "logic",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated pipeline request: the free-text domain plus the workflow mode.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub domain: String,
    pub mode: SearchMode,
}

/// One repository record returned by a single keyword search, pre-ranking.
///
/// Candidates from different keywords may share an `identifier` (owner/name);
/// the ranker merges them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// "owner/name", the merge key.
    pub identifier: String,
    pub url: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    /// Most recent push observed for this repository.
    pub pushed_at: Option<DateTime<Utc>>,
    pub language: Option<String>,
    /// The keyword whose search produced this record.
    pub source_keyword: String,
}

/// A deduplicated, scored candidate with its final rank position.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub identifier: String,
    pub url: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub pushed_at: Option<DateTime<Utc>>,
    pub language: Option<String>,
    /// Every distinct keyword that surfaced this repository.
    /// BTreeSet so iteration order is stable.
    pub matched_keywords: BTreeSet<String>,
    pub score: f64,
    /// 1-based position after ordering.
    pub rank: usize,
}

/// The finished Markdown report. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub markdown: String,
    pub mode: SearchMode,
}

/// Body of POST /api/awesome_search and /api/awesome_search_logic.
#[derive(Debug, Clone, Deserialize)]
pub struct AwesomeSearchRequest {
    pub domain: String,
}

/// Uniform response envelope: `code` mirrors the HTTP status, `message` holds
/// the rendered report on success or a human-readable error otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResponse {
    pub code: u16,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serializes_to_snake_case() {
        assert_eq!(serde_json::to_value(SearchMode::Standard).unwrap(), "standard");
        assert_eq!(serde_json::to_value(SearchMode::Logic).unwrap(), "logic");
    }

    #[test]
    fn test_mode_round_trips() {
        let back: SearchMode = serde_json::from_str("\"logic\"").unwrap();
        assert_eq!(back, SearchMode::Logic);
    }

    #[test]
    fn test_search_request_body_parses() {
        let req: AwesomeSearchRequest =
            serde_json::from_str(r#"{"domain": "container orchestration"}"#).unwrap();
        assert_eq!(req.domain, "container orchestration");
    }
}
