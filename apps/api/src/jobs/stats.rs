//! Aggregate statistics over a fetched listing batch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::listing::JobListing;

/// Ordered: the first matching type wins. Phrases match whole words only.
const JOB_TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("Full-time", &["full time", "permanent"]),
    ("Part-time", &["part time"]),
    ("Contract", &["contract", "contractor", "freelance", "freelancer"]),
    ("Internship", &["intern", "interns", "internship", "trainee"]),
    ("Remote", &["remote", "work from home"]),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStats {
    pub total_matching_jobs: usize,
    pub locations: BTreeMap<String, usize>,
    pub salary_range: SalaryRange,
    pub job_types: BTreeMap<String, usize>,
}

pub fn compute_job_stats(listings: &[JobListing]) -> JobStats {
    let mut stats = JobStats {
        total_matching_jobs: listings.len(),
        ..Default::default()
    };

    for listing in listings {
        let location = listing
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("Unknown");
        *stats.locations.entry(location.to_string()).or_insert(0) += 1;

        if let Some(job_type) = detect_job_type(listing) {
            *stats.job_types.entry(job_type.to_string()).or_insert(0) += 1;
        }
    }

    let salaries: Vec<f64> = listings
        .iter()
        .filter_map(|l| l.salary.as_deref())
        .filter_map(parse_salary)
        .collect();

    if !salaries.is_empty() {
        let min = salaries.iter().copied().fold(f64::INFINITY, f64::min);
        let max = salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = (salaries.iter().sum::<f64>() / salaries.len() as f64).round();
        stats.salary_range = SalaryRange { min, max, avg };
    }

    stats
}

fn detect_job_type(listing: &JobListing) -> Option<&'static str> {
    let content = format!("{} {}", listing.title, listing.description).to_lowercase();
    let words: Vec<&str> = content
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    JOB_TYPE_KEYWORDS
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| contains_phrase(&words, p)))
        .map(|(job_type, _)| *job_type)
}

fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let phrase: Vec<&str> = phrase.split(' ').collect();
    words.windows(phrase.len()).any(|window| window == phrase.as_slice())
}

/// First number in the string, thousands separators removed.
/// "$85,000 - $95,000" → 85000. A trailing "k" multiplies by 1000.
fn parse_salary(raw: &str) -> Option<f64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(rest.len());
    let number = rest[..end].trim_end_matches(&['.', ','][..]).replace(',', "");
    let value: f64 = number.parse().ok()?;

    let multiplier = match rest[end..].chars().next() {
        Some('k') | Some('K') => 1000.0,
        _ => 1.0,
    };
    Some(value * multiplier)
}
