//! Derives provider search keywords from a profile.

use crate::models::profile::UserProfile;

const MAX_KEYWORDS: usize = 5;
const MAX_SKILL_KEYWORDS: usize = 3;
const TITLE_WORDS: usize = 3;
const FALLBACK_KEYWORDS: &[&str] = &["entry", "level", "job"];

/// Search keywords for the job source.
///
/// With skills or experience: the first experience title (first three words)
/// followed by the first three skills, deduplicated in order, at most five.
/// Otherwise: the first word of each education entry, or a generic
/// entry-level query when there is nothing at all.
pub fn extract_search_keywords(profile: &UserProfile) -> Vec<String> {
    let has_experience = profile.experience.iter().any(|e| !e.text().is_empty());
    let has_skills = profile.clean_skills().next().is_some();

    if !has_skills && !has_experience {
        return education_fallback(profile);
    }

    let mut keywords: Vec<String> = Vec::new();

    if let Some(title) = profile
        .experience
        .iter()
        .map(|e| e.text())
        .find(|t| !t.is_empty())
        .map(|t| first_words(&t, TITLE_WORDS))
    {
        keywords.push(title);
    }
    keywords.extend(
        profile
            .clean_skills()
            .take(MAX_SKILL_KEYWORDS)
            .map(str::to_string),
    );

    dedup_in_order(keywords)
        .into_iter()
        .take(MAX_KEYWORDS)
        .collect()
}

fn education_fallback(profile: &UserProfile) -> Vec<String> {
    let keywords: Vec<String> = profile
        .education
        .iter()
        .filter_map(|e| e.text().split_whitespace().next().map(str::to_string))
        .collect();

    if keywords.is_empty() {
        FALLBACK_KEYWORDS.iter().map(|k| k.to_string()).collect()
    } else {
        keywords
    }
}

fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
