//! # awesome-search
//!
//! A Rust web service that turns a free-text technology domain into a ranked,
//! Markdown-formatted report of relevant GitHub repositories.
//!
//! ## Architecture
//!
//! Each request runs one strictly linear pipeline:
//!
//! ```text
//!   ┌──────────────┐
//!   │ Domain text  │  + mode (standard | logic)
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐   standard: deterministic heuristic (aliases, stopwords)
//!   │   Expander   │   logic:    LLM completion, strict JSON contract,
//!   └──────┬───────┘            one stricter-prompt retry, no fallback
//!          │ 3-5 keywords
//!    ┌─────┼─────┐
//!    ▼     ▼     ▼            one GitHub search per keyword, concurrent,
//!   kw1   kw2   kw3           first page only, bounded rate-limit retries
//!    └─────┼─────┘
//!          ▼ join
//!   ┌──────────────┐   merge by owner/name, score by log-scaled popularity
//!   │    Ranker    │   + tiered recency + keyword coverage, top 20
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐
//!   │   Renderer   │   plain Markdown report
//!   └──────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server, GitHub, and LLM
//! - [`models`] - Shared data types: `SearchRequest`, `Candidate`, `RankedEntry`, `Report`
//! - [`error`] - The pipeline error taxonomy
//! - [`expand`] - Query expansion (heuristic and LLM implementations)
//! - [`llm`] - OpenAI-compatible chat-completion client
//! - [`github`] - GitHub repository search client
//! - [`rank`] - Candidate deduplication, scoring, and ordering
//! - [`report`] - Markdown report rendering
//! - [`pipeline`] - The orchestrator composing the stages
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state wiring clients into the pipeline

pub mod api;
pub mod config;
pub mod error;
pub mod expand;
pub mod github;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod rank;
pub mod report;
pub mod state;
