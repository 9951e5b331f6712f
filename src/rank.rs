//! Candidate deduplication, scoring, and ordering.
//!
//! `rank` is a pure function of its inputs: equal inputs produce identical
//! output, regardless of the order in which keyword searches completed.
//!
//! The composite score is a weighted sum of three normalized signals:
//!
//! - popularity: log-scaled stars and forks, split 0.7/0.3
//! - recency: tiered decay of the last push over a two-year horizon
//! - coverage: fraction of the queried keywords that surfaced the repository
//!
//! The weights and tiers below are the tunable constants of the ranker; they
//! are fixed per build, not per request.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::collections::HashMap;

use crate::models::{Candidate, RankedEntry};

/// Weight of the popularity signal in the composite score.
pub const POPULARITY_WEIGHT: f64 = 0.5;
/// Weight of the recency signal in the composite score.
pub const RECENCY_WEIGHT: f64 = 0.3;
/// Weight of the keyword-coverage signal in the composite score.
pub const COVERAGE_WEIGHT: f64 = 0.2;

/// Star/fork split inside the popularity signal.
const STAR_SPLIT: f64 = 0.7;
const FORK_SPLIT: f64 = 0.3;

/// ln(1_000_001): a million stars normalizes to 1.0. Anything beyond clamps.
const POPULARITY_SCALE: f64 = 13.815_511_557_963_774;

/// Recency tiers: pushed within the given number of days scores the given
/// value. Past the last tier the floor applies.
const RECENCY_TIERS: &[(i64, f64)] = &[(30, 1.0), (180, 0.8), (365, 0.5), (730, 0.2)];
const RECENCY_FLOOR: f64 = 0.05;
/// Score for candidates with no activity timestamp at all.
const RECENCY_UNKNOWN: f64 = 0.1;

/// Deduplicate, score, and order candidates.
///
/// `total_keywords` is the number of distinct phrases that were queried (the
/// coverage denominator); `now` anchors recency so callers and tests get
/// deterministic results; `cap` bounds the returned list.
///
/// Never fails: empty input yields empty output.
pub fn rank(
    candidates: &[Candidate],
    total_keywords: usize,
    now: DateTime<Utc>,
    cap: usize,
) -> Vec<RankedEntry> {
    let mut merged: HashMap<String, MergedCandidate> = HashMap::new();

    for candidate in candidates {
        match merged.get_mut(&candidate.identifier) {
            Some(existing) => existing.absorb(candidate),
            None => {
                merged.insert(
                    candidate.identifier.clone(),
                    MergedCandidate::from_candidate(candidate),
                );
            }
        }
    }

    let mut entries: Vec<RankedEntry> = merged
        .into_values()
        .map(|m| {
            let score = composite_score(&m, total_keywords, now);
            RankedEntry {
                identifier: m.identifier,
                url: m.url,
                description: m.description,
                stars: m.stars,
                forks: m.forks,
                pushed_at: m.pushed_at,
                language: m.language,
                matched_keywords: m.keywords,
                score,
                rank: 0,
            }
        })
        .collect();

    // Total order: score descending, identifier ascending on ties.
    entries.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });
    entries.truncate(cap);

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    entries
}

/// Accumulator for candidates sharing an identifier.
struct MergedCandidate {
    identifier: String,
    url: String,
    description: Option<String>,
    stars: u64,
    forks: u64,
    pushed_at: Option<DateTime<Utc>>,
    language: Option<String>,
    keywords: BTreeSet<String>,
}

impl MergedCandidate {
    fn from_candidate(c: &Candidate) -> Self {
        let mut keywords = BTreeSet::new();
        keywords.insert(c.source_keyword.clone());
        Self {
            identifier: c.identifier.clone(),
            url: c.url.clone(),
            description: c.description.clone(),
            stars: c.stars,
            forks: c.forks,
            pushed_at: c.pushed_at,
            language: c.language.clone(),
            keywords,
        }
    }

    /// Merge another record for the same repository: keep the maximum star
    /// and fork counts, the most recent activity, and the union of source
    /// keywords. Descriptive fields follow the higher-starred record.
    fn absorb(&mut self, c: &Candidate) {
        if c.stars > self.stars {
            self.description = c.description.clone();
            self.language = c.language.clone();
            self.url = c.url.clone();
        }
        self.stars = self.stars.max(c.stars);
        self.forks = self.forks.max(c.forks);
        self.pushed_at = match (self.pushed_at, c.pushed_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.keywords.insert(c.source_keyword.clone());
    }
}

fn composite_score(m: &MergedCandidate, total_keywords: usize, now: DateTime<Utc>) -> f64 {
    POPULARITY_WEIGHT * popularity_score(m.stars, m.forks)
        + RECENCY_WEIGHT * recency_score(m.pushed_at, now)
        + COVERAGE_WEIGHT * coverage_score(m.keywords.len(), total_keywords)
}

fn popularity_score(stars: u64, forks: u64) -> f64 {
    let raw = STAR_SPLIT * (stars.saturating_add(1) as f64).ln()
        + FORK_SPLIT * (forks.saturating_add(1) as f64).ln();
    (raw / POPULARITY_SCALE).min(1.0)
}

fn recency_score(pushed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(pushed_at) = pushed_at else {
        return RECENCY_UNKNOWN;
    };
    let days = (now - pushed_at).num_days();
    for (horizon, score) in RECENCY_TIERS {
        if days <= *horizon {
            return *score;
        }
    }
    RECENCY_FLOOR
}

fn coverage_score(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (matched as f64 / total as f64).min(1.0)
}
