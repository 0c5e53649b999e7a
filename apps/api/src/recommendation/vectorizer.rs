#![allow(dead_code)]

//! Smoothed TF-IDF over a vocabulary shared by the query and the corpus.
//!
//! - tf(t, d)  = raw count of t in d
//! - idf(t)    = ln((N + 1) / (df(t) + 1)) + 1, N counts the query too
//! - w(t, d)   = tf × idf, then L2-normalized per document
//!
//! idf is strictly positive, so any document with at least one term has a
//! non-zero vector. Vectors from different `vectorize` calls live in
//! different spaces and must never be compared.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::recommendation::corpus::CorpusEntry;
use crate::recommendation::text::{Document, DocumentId};
use crate::recommendation::RecommendError;

/// Sorted term list; a term's index is its dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    fn from_documents<'a>(docs: impl IntoIterator<Item = &'a Document>) -> Self {
        let unique: BTreeSet<&str> = docs.into_iter().flat_map(|d| d.terms()).collect();
        let terms: Vec<String> = unique.into_iter().map(str::to_string).collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }
}

/// Sparse, non-negative, unit-length term vector. Entries sorted by dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    pub fn get(&self, dim: usize) -> f64 {
        self.entries
            .binary_search_by_key(&dim, |&(d, _)| d)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of non-zero dimensions.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Sparse dot product via a merge over sorted dimensions.
    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (da, wa) = self.entries[i];
            let (db, wb) = other.entries[j];
            match da.cmp(&db) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// All vectors of one ranking operation, in one vocabulary.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    pub vocabulary: Vocabulary,
    pub idf: Vec<f64>,
    pub query: TermVector,
    /// Aligned with the corpus entries passed to [`vectorize`].
    pub listings: Vec<(DocumentId, TermVector)>,
}

impl VectorSpace {
    pub fn vector(&self, id: &DocumentId) -> Option<&TermVector> {
        match id {
            DocumentId::Query => Some(&self.query),
            DocumentId::Listing(_) => self
                .listings
                .iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(_, v)| v),
        }
    }
}

/// Fits the vocabulary and IDF on query ∪ corpus and emits one unit vector
/// per document.
pub fn vectorize(query: &Document, corpus: &[CorpusEntry]) -> Result<VectorSpace, RecommendError> {
    let documents: Vec<&Document> = std::iter::once(query)
        .chain(corpus.iter().map(|e| &e.document))
        .collect();

    let vocabulary = Vocabulary::from_documents(documents.iter().copied());
    let term_counts: Vec<BTreeMap<usize, u32>> = documents
        .iter()
        .map(|d| count_terms(d, &vocabulary))
        .collect();

    let idf = compute_idf(&term_counts, vocabulary.len());

    let mut vectors = documents
        .iter()
        .zip(&term_counts)
        .map(|(doc, counts)| weigh(doc, counts, &idf));

    let query_vector = vectors.next().unwrap_or_else(|| {
        Err(RecommendError::Vectorization {
            document: DocumentId::Query.to_string(),
        })
    })?;

    let listings = corpus
        .iter()
        .zip(vectors)
        .map(|(entry, vector)| vector.map(|v| (entry.document.id.clone(), v)))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Vectorized {} document(s) over {} term(s)",
        documents.len(),
        vocabulary.len()
    );

    Ok(VectorSpace {
        vocabulary,
        idf,
        query: query_vector,
        listings,
    })
}

fn count_terms(doc: &Document, vocabulary: &Vocabulary) -> BTreeMap<usize, u32> {
    let mut counts = BTreeMap::new();
    for dim in doc.terms().filter_map(|t| vocabulary.index_of(t)) {
        *counts.entry(dim).or_insert(0) += 1;
    }
    counts
}

fn compute_idf(term_counts: &[BTreeMap<usize, u32>], dims: usize) -> Vec<f64> {
    let n = term_counts.len() as f64;
    let mut df = vec![0u32; dims];
    for counts in term_counts {
        for &dim in counts.keys() {
            df[dim] += 1;
        }
    }
    df.into_iter()
        .map(|df| ((n + 1.0) / (df as f64 + 1.0)).ln() + 1.0)
        .collect()
}

fn weigh(
    doc: &Document,
    counts: &BTreeMap<usize, u32>,
    idf: &[f64],
) -> Result<TermVector, RecommendError> {
    let raw: Vec<(usize, f64)> = counts
        .iter()
        .map(|(&dim, &tf)| (dim, tf as f64 * idf[dim]))
        .collect();

    let norm = raw.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return Err(RecommendError::Vectorization {
            document: doc.id.to_string(),
        });
    }

    Ok(TermVector {
        entries: raw.into_iter().map(|(dim, w)| (dim, w / norm)).collect(),
    })
}
