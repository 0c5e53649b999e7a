//! Jooble job search API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::jobs::{JobQuery, JobSource, JobSourceError};
use crate::models::listing::JobListing;

pub const DEFAULT_API_URL: &str = "https://jooble.org/api/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_RETRIES: u32 = 2;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    keywords: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    page_size: usize,
    page: usize,
}

/// POSTs searches to `{api_url}{api_key}`. Without an API key every fetch
/// fails with `NotConfigured`.
#[derive(Clone)]
pub struct JoobleClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl JoobleClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Result<Self, JobSourceError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_url: api_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!("{}{}", self.api_url, api_key)
    }
}

#[async_trait]
impl JobSource for JoobleClient {
    async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobListing>, JobSourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| JobSourceError::NotConfigured("JOOBLE_API_KEY is not set".to_string()))?;

        let body = SearchRequest {
            keywords: query.keywords.join(" "),
            location: query.location.as_deref(),
            page_size: query.limit.max(1),
            page: query.page.max(1),
        };

        info!(
            "Jooble search: keywords={:?}, location={:?}, page={}, size={}",
            body.keywords, body.location, body.page, body.page_size
        );

        let mut last_error: Option<JobSourceError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                // 500ms, 1s
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Jooble attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(self.endpoint(api_key)).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(JobSourceError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                last_error = Some(JobSourceError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(JobSourceError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let payload: Value = response.json().await?;
            let listings = parse_jobs(&payload)?;
            debug!("Jooble returned {} listing(s)", listings.len());
            return Ok(listings);
        }

        Err(last_error.unwrap_or_else(|| JobSourceError::Malformed("no response".to_string())))
    }

    fn name(&self) -> &'static str {
        "jooble"
    }
}

/// Maps a Jooble response body (`{"jobs": [...]}`) to listings.
/// Non-object items are skipped; a missing or non-array `jobs` is an error.
pub fn parse_jobs(payload: &Value) -> Result<Vec<JobListing>, JobSourceError> {
    let jobs = payload
        .get("jobs")
        .and_then(Value::as_array)
        .ok_or_else(|| JobSourceError::Malformed("'jobs' is missing or not a list".to_string()))?;

    let mut listings = Vec::with_capacity(jobs.len());
    for (index, job) in jobs.iter().enumerate() {
        let Some(fields) = job.as_object() else {
            warn!("Skipping non-object Jooble job at index {index}");
            continue;
        };
        let text = |key: &str| fields.get(key).and_then(value_to_string);

        let url = text("link");
        let id = text("id")
            .or_else(|| url.clone())
            .unwrap_or_else(|| format!("jooble-{index}"));

        listings.push(JobListing {
            id,
            title: text("title").unwrap_or_default(),
            description: text("snippet").unwrap_or_default(),
            requirements: None,
            company: text("company"),
            location: text("location"),
            url,
            date_posted: text("updated"),
            salary: text("salary"),
        });
    }
    Ok(listings)
}

/// Strings and numbers become non-empty strings; everything else is absent.
fn value_to_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}
