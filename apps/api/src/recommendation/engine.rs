//! Orchestrates profile synthesis, corpus building, vectorization, and
//! ranking into one call. Pure: same inputs, same output, no I/O.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::listing::JobListing;
use crate::models::profile::UserProfile;
use crate::recommendation::corpus::{build_corpus, SkippedListing};
use crate::recommendation::profile::synthesize_query;
use crate::recommendation::ranker::{rank, RankingConfig};
use crate::recommendation::text::StopwordSet;
use crate::recommendation::vectorizer::{vectorize, TermVector};
use crate::recommendation::RecommendError;

pub const DEFAULT_SKILL_REPETITION: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How many times each skill is written into the query. ≥ 1.
    pub skill_repetition_factor: usize,
    /// `None` = unbounded.
    pub top_k: Option<usize>,
    /// In [0, 1].
    pub min_score: f64,
    pub stopwords: StopwordSet,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            skill_repetition_factor: DEFAULT_SKILL_REPETITION,
            top_k: None,
            min_score: 0.0,
            stopwords: StopwordSet::english(),
        }
    }
}

impl EngineConfig {
    pub fn with_top_k(mut self, top_k: Option<usize>) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_skill_repetition(mut self, factor: usize) -> Self {
        self.skill_repetition_factor = factor;
        self
    }

    pub fn validate(&self) -> Result<(), RecommendError> {
        if self.skill_repetition_factor == 0 {
            return Err(RecommendError::InvalidConfig(
                "skill_repetition_factor must be at least 1".to_string(),
            ));
        }
        if self.top_k == Some(0) {
            return Err(RecommendError::InvalidConfig(
                "top_k must be positive when set".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(RecommendError::InvalidConfig(format!(
                "min_score must be within [0, 1], got {}",
                self.min_score
            )));
        }
        Ok(())
    }

    fn ranking(&self) -> RankingConfig {
        RankingConfig {
            top_k: self.top_k,
            min_score: self.min_score,
        }
    }
}

/// A listing paired with its similarity to the profile, in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub listing: JobListing,
    pub score: f64,
}

/// Ranked output of one engine call: descending by score, ties in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub recommendations: Vec<Recommendation>,
    /// Listings left out of scoring, with the reason.
    pub skipped: Vec<SkippedListing>,
}

#[cfg(test)]
impl RecommendationResult {
    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|r| r.listing.id.as_str()).collect()
    }
}

/// Ranks `listings` by textual relevance to `profile`.
///
/// Returns either a complete result or exactly one error. `EmptyProfile` and
/// `EmptyCorpus` are terminal for the call; individual unusable listings are
/// skipped and reported in [`RecommendationResult::skipped`].
pub fn recommend(
    profile: &UserProfile,
    listings: &[JobListing],
    config: &EngineConfig,
) -> Result<RecommendationResult, RecommendError> {
    config.validate()?;

    let query = synthesize_query(profile, config.skill_repetition_factor, &config.stopwords)?;
    let corpus = build_corpus(listings, &config.stopwords)?;
    let space = vectorize(&query, &corpus.entries)?;

    debug!(
        "Vector space ready: {} term(s), {} job vector(s)",
        space.vocabulary.len(),
        space.listings.len()
    );

    let job_vectors: Vec<TermVector> = space.listings.into_iter().map(|(_, v)| v).collect();
    let ranked = rank(&space.query, &job_vectors, &config.ranking());

    let recommendations: Vec<Recommendation> = ranked
        .into_iter()
        .map(|c| Recommendation {
            listing: listings[corpus.entries[c.index].position].clone(),
            score: c.score,
        })
        .collect();

    info!(
        "Ranked {} listing(s): returning {}, skipped {}",
        corpus.len(),
        recommendations.len(),
        corpus.skipped.len()
    );

    Ok(RecommendationResult {
        recommendations,
        skipped: corpus.skipped,
    })
}
