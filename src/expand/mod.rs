//! Query expansion: turning a free-text domain into concrete search phrases.
//!
//! Two implementations sit behind [`Expander::expand`]: a deterministic
//! heuristic ([`heuristic`]) and an LLM-driven one ([`llm`]). The mode chosen
//! by the caller is honored strictly; logic mode never falls back to the
//! heuristic on failure.

pub mod heuristic;
pub mod llm;

use std::sync::Arc;

use crate::error::ExpansionError;
use crate::llm::ChatBackend;

/// An ordered set of distinct, non-empty search phrases.
///
/// Construction is the single place the invariants are enforced: phrases are
/// trimmed, empties dropped, duplicates removed (first occurrence wins), and
/// an empty result is an error.
#[derive(Debug, Clone)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new(phrases: Vec<String>) -> Result<Self, ExpansionError> {
        let mut seen = std::collections::HashSet::new();
        let mut cleaned = Vec::new();
        for phrase in phrases {
            let phrase = phrase.trim().to_string();
            if phrase.is_empty() {
                continue;
            }
            if seen.insert(phrase.to_lowercase()) {
                cleaned.push(phrase);
            }
        }
        if cleaned.is_empty() {
            return Err(ExpansionError("no usable keywords were produced".into()));
        }
        Ok(Self(cleaned))
    }

    pub fn phrases(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Closed set of query-expander implementations, selected per request by the
/// workflow mode.
#[derive(Clone)]
pub enum Expander {
    Heuristic,
    Llm(Arc<dyn ChatBackend>),
}

impl Expander {
    /// Derive a keyword set from the domain description.
    ///
    /// Fails with [`ExpansionError`] if the domain is blank or (LLM variant)
    /// if the completion cannot be parsed after the bounded retry.
    pub async fn expand(&self, domain: &str) -> Result<KeywordSet, ExpansionError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(ExpansionError("domain is empty".into()));
        }
        match self {
            Expander::Heuristic => KeywordSet::new(heuristic::derive_keywords(domain)),
            Expander::Llm(chat) => llm::expand_with_llm(chat.as_ref(), domain).await,
        }
    }
}
