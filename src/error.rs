use thiserror::Error;

/// Failure modes of a single keyword search against the repository host.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The host is throttling us. Retried with backoff up to the configured
    /// budget before the keyword is given up on.
    #[error("rate limited by the repository host")]
    RateLimited,
    /// Auth failure, malformed query, or any other non-recoverable host error.
    #[error("repository search failed: {0}")]
    Host(String),
}

/// Keyword derivation failure. Logic mode never falls back to the heuristic;
/// a parse failure after the bounded retry surfaces as this error.
#[derive(Debug, Error)]
#[error("keyword expansion failed: {0}")]
pub struct ExpansionError(pub String);

/// The pipeline-level taxonomy surfaced to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Empty or whitespace-only domain. Rejected before any external call.
    #[error("invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    /// Every keyword search failed; no candidates to rank.
    #[error("all keyword searches failed: {0}")]
    Search(String),
}

impl PipelineError {
    /// HTTP status for the uniform `{code, message}` envelope.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Validation(_) => 422,
            PipelineError::Expansion(_) => 502,
            PipelineError::Search(_) => 502,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_422() {
        let err = PipelineError::Validation("domain is required".into());
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_upstream_failures_map_to_502() {
        assert_eq!(
            PipelineError::from(ExpansionError("bad response".into())).status_code(),
            502
        );
        assert_eq!(PipelineError::Search("all failed".into()).status_code(), 502);
    }

    #[test]
    fn test_expansion_error_message_passes_through() {
        let err = PipelineError::from(ExpansionError("unparseable".into()));
        assert_eq!(err.to_string(), "keyword expansion failed: unparseable");
    }
}
