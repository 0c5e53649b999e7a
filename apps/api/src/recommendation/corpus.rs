//! Normalizes a listing batch into job documents.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::listing::JobListing;
use crate::recommendation::text::{normalize, Document, DocumentId, StopwordSet};
use crate::recommendation::RecommendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Title and description were both empty after normalization.
    EmptyContent,
    /// Same id as an earlier listing in the batch.
    DuplicateId,
}

/// A listing that was left out of scoring. Never an error for the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedListing {
    pub listing_id: String,
    pub reason: SkipReason,
}

/// One usable document plus the position of its listing in the input batch.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusEntry {
    pub position: usize,
    pub document: Document,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// In input order.
    pub entries: Vec<CorpusEntry>,
    pub skipped: Vec<SkippedListing>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds one document per usable listing, preserving input order.
///
/// Document text is title + description + requirements. A listing is skipped
/// when title and description both normalize to nothing, or when its id was
/// already seen in this batch (first occurrence wins). Fails only when no
/// listing survives.
pub fn build_corpus(
    listings: &[JobListing],
    stopwords: &StopwordSet,
) -> Result<Corpus, RecommendError> {
    let mut corpus = Corpus::default();
    let mut seen: HashSet<&str> = HashSet::with_capacity(listings.len());

    for (position, listing) in listings.iter().enumerate() {
        if !seen.insert(listing.id.as_str()) {
            warn!("Skipping duplicate listing id {}", listing.id);
            corpus.skipped.push(SkippedListing {
                listing_id: listing.id.clone(),
                reason: SkipReason::DuplicateId,
            });
            continue;
        }

        let title = normalize(&listing.title, stopwords);
        let description = normalize(&listing.description, stopwords);

        if title.is_empty() && description.is_empty() {
            debug!("Skipping listing {} with no usable content", listing.id);
            corpus.skipped.push(SkippedListing {
                listing_id: listing.id.clone(),
                reason: SkipReason::EmptyContent,
            });
            continue;
        }

        let requirements = listing
            .requirements
            .as_deref()
            .map(|r| normalize(r, stopwords))
            .unwrap_or_default();

        let text = [title, description, requirements]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        corpus.entries.push(CorpusEntry {
            position,
            document: Document::new(DocumentId::Listing(listing.id.clone()), text),
        });
    }

    if corpus.is_empty() {
        return Err(RecommendError::EmptyCorpus {
            skipped: corpus.skipped.len(),
        });
    }

    debug!(
        "Built corpus: {} document(s), {} skipped",
        corpus.len(),
        corpus.skipped.len()
    );
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> StopwordSet {
        StopwordSet::english()
    }

    #[test]
    fn test_preserves_order_and_identity() {
        let listings = vec![
            JobListing::new("b", "Rust Engineer", "Tokio services"),
            JobListing::new("a", "Data Analyst", "SQL dashboards"),
        ];
        let corpus = build_corpus(&listings, &english()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.entries[0].position, 0);
        assert_eq!(
            corpus.entries[0].document.id,
            DocumentId::Listing("b".to_string())
        );
        assert_eq!(corpus.entries[0].document.text, "rust engineer tokio services");
        assert_eq!(corpus.entries[1].position, 1);
    }

    #[test]
    fn test_requirements_are_appended() {
        let listings = vec![JobListing::new("1", "Engineer", "").with_requirements("Kubernetes, Helm")];
        let corpus = build_corpus(&listings, &english()).unwrap();
        assert_eq!(corpus.entries[0].document.text, "engineer kubernetes helm");
    }

    #[test]
    fn test_empty_listing_is_skipped_not_fatal() {
        let listings = vec![
            JobListing::new("empty", "  ", "<br/> ..."),
            JobListing::new("ok", "Python Developer", ""),
        ];
        let corpus = build_corpus(&listings, &english()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.entries[0].position, 1);
        assert_eq!(
            corpus.skipped,
            vec![SkippedListing {
                listing_id: "empty".to_string(),
                reason: SkipReason::EmptyContent,
            }]
        );
    }

    #[test]
    fn test_requirements_alone_do_not_rescue_listing() {
        let listings = vec![JobListing::new("r", "", "").with_requirements("Rust")];
        let err = build_corpus(&listings, &english()).unwrap_err();
        assert_eq!(err, RecommendError::EmptyCorpus { skipped: 1 });
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let listings = vec![
            JobListing::new("dup", "Rust Engineer", "first"),
            JobListing::new("dup", "Go Engineer", "second"),
        ];
        let corpus = build_corpus(&listings, &english()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert!(corpus.entries[0].document.text.contains("rust"));
        assert_eq!(corpus.skipped[0].reason, SkipReason::DuplicateId);
    }

    #[test]
    fn test_empty_batch_fails() {
        let err = build_corpus(&[], &english()).unwrap_err();
        assert_eq!(err, RecommendError::EmptyCorpus { skipped: 0 });
    }

    #[test]
    fn test_skip_reason_serializes_snake_case() {
        let json = serde_json::to_string(&SkipReason::EmptyContent).unwrap();
        assert_eq!(json, r#""empty_content""#);
    }
}
