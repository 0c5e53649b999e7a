use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::jobs::jooble::DEFAULT_API_URL;
use crate::recommendation::engine::{EngineConfig, DEFAULT_SKILL_REPETITION};

/// Application configuration loaded from environment variables.
/// Every variable has a default; a malformed value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Missing key: the service still starts and `/rank` works, fetches fail.
    pub jooble_api_key: Option<String>,
    pub jooble_api_url: String,
    /// `None` selects the in-memory listing cache.
    pub redis_url: Option<String>,
    pub listing_cache_ttl: Duration,
    pub default_recommendations_count: usize,
    pub default_job_location: Option<String>,
    /// Upper bound on listings fetched per request; bounds ranking latency.
    pub max_fetch_listings: usize,
    pub skill_repetition_factor: usize,
    pub min_score: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            jooble_api_key: optional_env("JOOBLE_API_KEY"),
            jooble_api_url: optional_env("JOOBLE_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            redis_url: optional_env("REDIS_URL"),
            listing_cache_ttl: Duration::from_secs(parse_env("LISTING_CACHE_TTL_SECS", 900)?),
            default_recommendations_count: parse_env("DEFAULT_RECOMMENDATIONS_COUNT", 10)?,
            default_job_location: optional_env("DEFAULT_JOB_LOCATION")
                .or_else(|| Some("Remote".to_string())),
            max_fetch_listings: parse_env("MAX_FETCH_LISTINGS", 50)?,
            skill_repetition_factor: parse_env("SKILL_REPETITION_FACTOR", DEFAULT_SKILL_REPETITION)?,
            min_score: parse_env("MIN_SCORE", 0.0)?,
        })
    }

    /// Engine settings derived from config. `top_k` is left to each request.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_skill_repetition(self.skill_repetition_factor)
            .with_min_score(self.min_score)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
