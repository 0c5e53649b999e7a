//! Scores job vectors against the query vector and orders them.

use serde::{Deserialize, Serialize};

use crate::recommendation::vectorizer::TermVector;

/// Filtering and truncation applied after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// `None` keeps every listing that passes `min_score`.
    pub top_k: Option<usize>,
    /// Listings scoring strictly below this are dropped. In [0, 1].
    pub min_score: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: None,
            min_score: 0.0,
        }
    }
}

/// A candidate's index into the slice given to [`rank`] and its similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub index: usize,
    pub score: f64,
}

/// Cosine similarity of two unit vectors. Clamped into [0, 1] to absorb
/// floating-point drift just above 1.
pub fn similarity(query: &TermVector, job: &TermVector) -> f64 {
    query.dot(job).clamp(0.0, 1.0)
}

/// Scores every candidate, drops those under `min_score`, sorts descending
/// (stable, so ties keep input order), and truncates to `top_k`.
/// An empty return is a valid outcome, not an error.
pub fn rank(
    query: &TermVector,
    candidates: &[TermVector],
    config: &RankingConfig,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .enumerate()
        .map(|(index, job)| ScoredCandidate {
            index,
            score: similarity(query, job),
        })
        .filter(|c| c.score >= config.min_score)
        .collect();

    // `sort_by` is stable.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(k) = config.top_k {
        scored.truncate(k);
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::corpus::CorpusEntry;
    use crate::recommendation::text::{Document, DocumentId};
    use crate::recommendation::vectorizer::vectorize;

    /// Vectorizes `query` against `jobs` and returns (query, job vectors).
    fn space(query: &str, jobs: &[&str]) -> (TermVector, Vec<TermVector>) {
        let corpus: Vec<CorpusEntry> = jobs
            .iter()
            .enumerate()
            .map(|(i, text)| CorpusEntry {
                position: i,
                document: Document::new(DocumentId::Listing(i.to_string()), text.to_string()),
            })
            .collect();
        let space = vectorize(
            &Document::new(DocumentId::Query, query.to_string()),
            &corpus,
        )
        .unwrap();
        (space.query, space.listings.into_iter().map(|(_, v)| v).collect())
    }

    #[test]
    fn test_orders_by_descending_score() {
        let (q, jobs) = space("rust tokio", &["java spring", "rust tokio", "rust"]);
        let ranked = rank(&q, &jobs, &RankingConfig::default());
        let order: Vec<usize> = ranked.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert!((ranked[0].score - 1.0).abs() < 1e-9);
        assert_eq!(ranked[2].score, 0.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let (q, jobs) = space("rust", &["java", "rust go", "python", "rust go"]);
        let ranked = rank(&q, &jobs, &RankingConfig::default());
        let order: Vec<usize> = ranked.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert_eq!(ranked[0].score, ranked[1].score);
    }

    #[test]
    fn test_min_score_filters() {
        let (q, jobs) = space("rust", &["rust", "java"]);
        let ranked = rank(
            &q,
            &jobs,
            &RankingConfig {
                top_k: None,
                min_score: 0.1,
            },
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].index, 0);
    }

    #[test]
    fn test_everything_below_min_score_is_empty_not_error() {
        let (q, jobs) = space("rust", &["java", "python"]);
        let ranked = rank(
            &q,
            &jobs,
            &RankingConfig {
                top_k: Some(5),
                min_score: 0.5,
            },
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_top_k_truncates() {
        let (q, jobs) = space("rust", &["rust a", "rust b", "rust c"]);
        let ranked = rank(
            &q,
            &jobs,
            &RankingConfig {
                top_k: Some(2),
                min_score: 0.0,
            },
        );
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let (q, jobs) = space(
            "python python sql sql analytics",
            &["python sql", "sql analytics reporting", "graphic design", "python"],
        );
        for c in rank(&q, &jobs, &RankingConfig::default()) {
            assert!((0.0..=1.0).contains(&c.score), "score {} out of range", c.score);
        }
    }
}
