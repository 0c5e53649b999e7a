//! Builds the query document from a structured profile.

use tracing::debug;

use crate::models::profile::UserProfile;
use crate::recommendation::text::{normalize, Document, DocumentId, StopwordSet};
use crate::recommendation::RecommendError;

/// Concatenates skills, education, and experience into one normalized query.
///
/// Each skill is written `skill_repetition` times so raw term frequency
/// favors explicit skills over narrative text.
pub fn synthesize_query(
    profile: &UserProfile,
    skill_repetition: usize,
    stopwords: &StopwordSet,
) -> Result<Document, RecommendError> {
    let mut parts: Vec<String> = Vec::new();

    for skill in profile.clean_skills() {
        parts.extend(std::iter::repeat(skill.to_string()).take(skill_repetition));
    }
    parts.extend(
        profile
            .education
            .iter()
            .map(|e| e.text())
            .filter(|t| !t.is_empty()),
    );
    parts.extend(
        profile
            .experience
            .iter()
            .map(|e| e.text())
            .filter(|t| !t.is_empty()),
    );

    if parts.is_empty() {
        return Err(RecommendError::EmptyProfile);
    }

    let text = normalize(&parts.join(" "), stopwords);
    if text.is_empty() {
        // Everything was punctuation or stopwords.
        return Err(RecommendError::EmptyProfile);
    }

    debug!(
        "Synthesized query from {} part(s), {} chars",
        parts.len(),
        text.len()
    );
    Ok(Document::new(DocumentId::Query, text))
}
