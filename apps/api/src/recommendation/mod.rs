//! Content-based recommendation engine.
//!
//! Pipeline, leaf-first:
//! 1. [`profile::synthesize_query`] — profile → one weighted query document
//! 2. [`corpus::build_corpus`] — listings → normalized documents (skips empty / duplicate ids)
//! 3. [`vectorizer::vectorize`] — shared vocabulary, smoothed TF-IDF, L2-normalized vectors
//! 4. [`ranker::rank`] — cosine similarity, `min_score` filter, stable sort, `top_k`
//! 5. [`engine::recommend`] — sequences the above and owns configuration
//!
//! The engine is pure and synchronous: no I/O, no caching, no shared state.
//! Fetching and caching listings is the job of `crate::jobs`.

pub mod corpus;
pub mod engine;
pub mod handlers;
pub mod pagination;
pub mod profile;
pub mod ranker;
pub mod text;
pub mod vectorizer;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecommendError {
    #[error("profile has no usable skills, education, or experience text")]
    EmptyProfile,

    #[error("no usable job listings after normalization ({skipped} skipped)")]
    EmptyCorpus { skipped: usize },

    /// A document with vocabulary terms produced a zero vector. Indicates a
    /// normalization/vocabulary bug; never retried.
    #[error("{document} produced a zero term vector")]
    Vectorization { document: String },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}
