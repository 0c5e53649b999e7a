//! Job listing collaborators: where listings come from and how they are cached.
//!
//! Nothing here is part of the recommendation engine. Handlers fetch a batch
//! (through the cache) and hand it to `recommendation::engine::recommend`.

pub mod cache;
pub mod handlers;
pub mod jooble;
pub mod keywords;
pub mod stats;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::listing::JobListing;

#[derive(Debug, Error)]
pub enum JobSourceError {
    #[error("job source is not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Malformed(String),
}

/// A search against a job source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobQuery {
    pub keywords: Vec<String>,
    pub location: Option<String>,
    /// Page size requested from the provider.
    pub limit: usize,
    /// 1-based.
    pub page: usize,
}

impl JobQuery {
    /// Stable cache key: keywords, location, page size, and page.
    pub fn cache_key(&self) -> String {
        let keywords = self
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .collect::<Vec<_>>()
            .join(",");
        let location = self
            .location
            .as_deref()
            .map(|l| l.trim().to_lowercase())
            .unwrap_or_default();
        format!("{keywords}|{location}|{}|{}", self.limit, self.page.max(1))
    }
}

/// Fetches raw listings for a query. Implementations own transport,
/// timeouts, and response mapping.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobListing>, JobSourceError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}
