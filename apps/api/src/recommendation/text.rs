#![allow(dead_code)]

//! Text normalization shared by the query and every job document.
//!
//! Both sides of a comparison MUST go through [`normalize`] with the same
//! [`StopwordSet`]; otherwise terms will not line up in the vector space.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default English stopwords. Covers function words plus the filler that
/// shows up in almost every job ad ("we", "you", "our", ...).
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "either",
    "etc", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
    "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "may", "me", "might", "more", "most", "must", "my", "myself", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "same", "shall", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "us", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "within",
    "would", "you", "your", "yours", "yourself", "yourselves",
];

/// Words removed during normalization. Stored lowercased.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn english() -> Self {
        Self::from_words(ENGLISH_STOPWORDS.iter().copied())
    }

    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for StopwordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopwordSet")
            .field("len", &self.words.len())
            .finish()
    }
}

impl From<Vec<String>> for StopwordSet {
    fn from(words: Vec<String>) -> Self {
        Self::from_words(words)
    }
}

impl From<StopwordSet> for Vec<String> {
    fn from(set: StopwordSet) -> Self {
        let mut words: Vec<String> = set.words.into_iter().collect();
        words.sort();
        words
    }
}

/// Identity of a document inside one ranking operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentId {
    Query,
    Listing(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Query => f.write_str("query"),
            DocumentId::Listing(id) => write!(f, "listing {id}"),
        }
    }
}

/// Normalized text tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
}

impl Document {
    pub fn new(id: DocumentId, text: String) -> Self {
        Self { id, text }
    }

    /// Whitespace-separated terms. Only meaningful on normalized text.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Lowercases, strips markup and punctuation, removes stopwords, and
/// collapses whitespace. Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str, stopwords: &StopwordSet) -> String {
    let stripped = strip_markup(text).to_lowercase();

    let cleaned: String = stripped
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut out = String::with_capacity(cleaned.len());
    for term in cleaned
        .split_whitespace()
        .filter(|term| !stopwords.contains(term))
    {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(term);
    }
    out
}

/// Replaces `<tag ...>` runs and `&entity;` references with a space.
/// An unmatched `<` or `&` is left in place and handled as punctuation.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(&['<', '&'][..]) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let skip = if tail.starts_with('<') {
            tail.find('>').map(|end| end + 1)
        } else {
            entity_len(tail)
        };

        match skip {
            Some(len) => {
                out.push(' ');
                rest = &tail[len..];
            }
            None => {
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Length of a `&name;` / `&#123;` reference at the start of `s`, if any.
fn entity_len(s: &str) -> Option<usize> {
    const MAX_ENTITY: usize = 10;
    let body = s.strip_prefix('&')?;
    let end = body
        .char_indices()
        .take(MAX_ENTITY)
        .find(|&(_, c)| c == ';')
        .map(|(i, _)| i)?;
    let name = &body[..end];
    let valid = !name.is_empty()
        && name
            .chars()
            .enumerate()
            .all(|(i, c)| c.is_ascii_alphanumeric() || (i == 0 && c == '#'));
    valid.then_some(end + 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(text: &str) -> String {
        normalize(text, &StopwordSet::english())
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(norm("Python, SQL; and C++!"), "python sql c");
    }

    #[test]
    fn test_removes_stopwords() {
        assert_eq!(
            norm("Looking for a Python and SQL developer"),
            "looking python sql developer"
        );
    }

    #[test]
    fn test_strips_html_tags_and_entities() {
        assert_eq!(
            norm("<p>Senior&nbsp;<b>Rust</b> engineer &amp; mentor</p>"),
            "senior rust engineer mentor"
        );
    }

    #[test]
    fn test_unmatched_angle_bracket_is_punctuation() {
        assert_eq!(norm("latency < 5ms"), "latency 5ms");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(norm("  rust \n\t  tokio   axum "), "rust tokio axum");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "Seeking a graphic designer with Photoshop skills",
            "<div>Data &amp; ML — PyTorch/TensorFlow</div>",
            "ÉCOLE Polytechnique, Génie Logiciel",
            "",
        ];
        for input in inputs {
            let once = norm(input);
            assert_eq!(norm(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_custom_stopwords_are_lowercased() {
        let stopwords = StopwordSet::from_words(["Developer", " "]);
        assert_eq!(stopwords.len(), 1);
        assert_eq!(normalize("Rust Developer", &stopwords), "rust");
    }

    #[test]
    fn test_empty_stopword_set_keeps_everything() {
        assert_eq!(normalize("The Rust", &StopwordSet::empty()), "the rust");
    }

    #[test]
    fn test_stopword_set_serde_as_list() {
        let set: StopwordSet = serde_json::from_str(r#"["a", "The"]"#).unwrap();
        assert!(set.contains("the"));
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["a","the"]"#);
    }

    #[test]
    fn test_document_terms() {
        let doc = Document::new(DocumentId::Query, "rust rust sql".to_string());
        assert_eq!(doc.terms().collect::<Vec<_>>(), vec!["rust", "rust", "sql"]);
        assert_eq!(DocumentId::Listing("7".to_string()).to_string(), "listing 7");
    }
}
