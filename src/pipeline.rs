//! Pipeline orchestrator: validate -> expand -> search -> rank -> render.
//!
//! One strictly linear execution per request. Keyword searches fan out as
//! independent tasks and join before ranking; per-keyword failures are
//! absorbed into partial results, and only the whole request failing
//! surfaces an error. Dropping the returned future (caller disconnect or
//! timeout) aborts all in-flight searches via `JoinSet`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinSet;

use crate::config::Config;
use crate::error::{PipelineError, SearchError};
use crate::expand::Expander;
use crate::github::SearchBackend;
use crate::llm::ChatBackend;
use crate::models::{Candidate, Report, SearchMode, SearchRequest};
use crate::{rank, report};

pub struct Pipeline {
    searcher: Arc<dyn SearchBackend>,
    chat: Arc<dyn ChatBackend>,
    rate_limit_retries: u32,
    backoff: Duration,
    max_report_entries: usize,
}

impl Pipeline {
    /// Both outbound clients are injected ready-to-use; the pipeline never
    /// reads ambient configuration at call time.
    pub fn new(
        searcher: Arc<dyn SearchBackend>,
        chat: Arc<dyn ChatBackend>,
        config: &Config,
    ) -> Self {
        Self {
            searcher,
            chat,
            rate_limit_retries: config.github.rate_limit_retries,
            backoff: Duration::from_millis(config.github.backoff_ms),
            max_report_entries: config.max_report_entries,
        }
    }

    /// Run one request end to end.
    pub async fn run(&self, request: SearchRequest) -> Result<Report, PipelineError> {
        let domain = request.domain.trim().to_string();
        if domain.is_empty() {
            return Err(PipelineError::Validation("domain is required".into()));
        }

        let expander = match request.mode {
            SearchMode::Standard => Expander::Heuristic,
            SearchMode::Logic => Expander::Llm(self.chat.clone()),
        };
        let keywords = expander.expand(&domain).await?;
        tracing::info!(
            "Expanded '{domain}' into {} keywords ({} mode): {:?}",
            keywords.len(),
            request.mode,
            keywords.phrases()
        );

        // Fan out one search task per keyword; fan in before ranking.
        let mut set = JoinSet::new();
        for (index, keyword) in keywords.phrases().iter().enumerate() {
            let searcher = self.searcher.clone();
            let keyword = keyword.clone();
            let retries = self.rate_limit_retries;
            let backoff = self.backoff;
            set.spawn(async move {
                let result = search_with_retry(searcher.as_ref(), &keyword, retries, backoff).await;
                (index, keyword, result)
            });
        }

        // Slots indexed by keyword position so the outcome is independent of
        // completion order.
        let mut outcomes: Vec<Option<(String, Result<Vec<Candidate>, SearchError>)>> =
            (0..keywords.len()).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, keyword, result)) => outcomes[index] = Some((keyword, result)),
                Err(e) => {
                    // A panicking search task is a defect; treat the slot as failed.
                    tracing::error!("Keyword search task failed to join: {e}");
                }
            }
        }

        let mut candidates = Vec::new();
        let mut failed_keywords = Vec::new();
        let mut first_error: Option<SearchError> = None;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Some((_, Ok(found))) => candidates.extend(found),
                Some((keyword, Err(e))) => {
                    tracing::warn!("Search for '{keyword}' gave up: {e}");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                    failed_keywords.push(keyword);
                }
                // Slot never reported back (the task panicked): failed.
                None => failed_keywords.push(keywords.phrases()[index].clone()),
            }
        }

        if failed_keywords.len() == keywords.len() {
            let detail = first_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no keyword search completed".to_string());
            return Err(PipelineError::Search(detail));
        }

        let entries = rank::rank(
            &candidates,
            keywords.len(),
            Utc::now(),
            self.max_report_entries,
        );
        tracing::info!(
            "Ranked {} candidates into {} entries for '{domain}'",
            candidates.len(),
            entries.len()
        );

        Ok(report::render(
            &entries,
            &domain,
            request.mode,
            &failed_keywords,
        ))
    }
}

/// One keyword search with a bounded rate-limit retry budget.
///
/// Throttling is retried with a doubling delay; host errors are
/// non-recoverable and returned immediately.
async fn search_with_retry(
    searcher: &dyn SearchBackend,
    keyword: &str,
    retries: u32,
    backoff: Duration,
) -> Result<Vec<Candidate>, SearchError> {
    let mut attempt = 0;
    loop {
        match searcher.search(keyword).await {
            Ok(candidates) => return Ok(candidates),
            Err(SearchError::RateLimited) if attempt < retries => {
                let delay = backoff.saturating_mul(2u32.saturating_pow(attempt));
                tracing::warn!(
                    "Rate limited on '{keyword}', retry {} of {retries} in {delay:?}",
                    attempt + 1
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with RateLimited a set number of times, then succeeds.
    struct FlakySearcher {
        failures_before_success: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl SearchBackend for FlakySearcher {
        async fn search(&self, keyword: &str) -> Result<Vec<Candidate>, SearchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                return Err(SearchError::RateLimited);
            }
            Ok(vec![Candidate {
                identifier: "owner/repo".to_string(),
                url: "https://github.com/owner/repo".to_string(),
                description: None,
                stars: 10,
                forks: 1,
                pushed_at: None,
                language: None,
                source_keyword: keyword.to_string(),
            }])
        }
    }

    struct AlwaysHostError;

    #[async_trait]
    impl SearchBackend for AlwaysHostError {
        async fn search(&self, _keyword: &str) -> Result<Vec<Candidate>, SearchError> {
            Err(SearchError::Host("bad credentials".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retried_within_budget() {
        let searcher = FlakySearcher {
            failures_before_success: 2,
            calls: AtomicU32::new(0),
        };
        let result =
            search_with_retry(&searcher, "kw", 2, Duration::from_millis(500)).await;
        assert!(result.is_ok());
        assert_eq!(searcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhausts_budget() {
        let searcher = FlakySearcher {
            failures_before_success: 10,
            calls: AtomicU32::new(0),
        };
        let result =
            search_with_retry(&searcher, "kw", 2, Duration::from_millis(500)).await;
        assert!(matches!(result, Err(SearchError::RateLimited)));
        // Initial attempt plus two retries.
        assert_eq!(searcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_saturates_for_large_retry_budgets() {
        // 2^40 overflows u32; the delay must clamp instead of panicking.
        let searcher = FlakySearcher {
            failures_before_success: u32::MAX,
            calls: AtomicU32::new(0),
        };
        let result =
            search_with_retry(&searcher, "kw", 40, Duration::from_millis(500)).await;
        assert!(matches!(result, Err(SearchError::RateLimited)));
        assert_eq!(searcher.calls.load(Ordering::SeqCst), 41);
    }

    #[tokio::test]
    async fn test_host_error_not_retried() {
        let result = search_with_retry(
            &AlwaysHostError,
            "kw",
            2,
            Duration::from_millis(500),
        )
        .await;
        assert!(matches!(result, Err(SearchError::Host(_))));
    }
}
