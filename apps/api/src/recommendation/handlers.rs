//! Axum route handlers for the Recommendation API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::handlers::fetch_listings;
use crate::jobs::keywords::extract_search_keywords;
use crate::jobs::JobQuery;
use crate::models::listing::JobListing;
use crate::models::profile::UserProfile;
use crate::recommendation::corpus::SkippedListing;
use crate::recommendation::engine::{recommend, Recommendation};
use crate::recommendation::pagination::{paginate, Page, MAX_PAGE_SIZE};
use crate::recommendation::RecommendError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub profile: UserProfile,
    pub listings: Vec<JobListing>,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub profile: UserProfile,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default)]
    pub size: Option<usize>,
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Bypass the listing cache and fetch fresh listings.
    #[serde(default)]
    pub force_refresh: bool,
}

fn first_page() -> usize {
    1
}

/// A ranked listing as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationItem {
    #[serde(flatten)]
    pub listing: JobListing,
    /// Cosine similarity, 0 – 1.
    pub score: f64,
    /// `score` as a percentage rounded to one decimal.
    pub match_score: f64,
}

impl From<Recommendation> for RecommendationItem {
    fn from(rec: Recommendation) -> Self {
        Self {
            match_score: to_match_score(rec.score),
            score: rec.score,
            listing: rec.listing,
        }
    }
}

fn to_match_score(score: f64) -> f64 {
    ((score * 1000.0).round() / 10.0).min(100.0)
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub recommendations: Vec<RecommendationItem>,
    pub skipped: Vec<SkippedListing>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub source: &'static str,
    pub from_cache: bool,
    pub keywords: Vec<String>,
    pub recommendations: Page<RecommendationItem>,
    pub skipped: Vec<SkippedListing>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommendations/rank
///
/// Ranks caller-supplied listings against the profile. No fetching, no caching.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let mut config = state.engine.clone().with_top_k(request.top_k);
    if let Some(min_score) = request.min_score {
        config = config.with_min_score(min_score);
    }

    let result = recommend(&request.profile, &request.listings, &config)?;

    Ok(Json(RankResponse {
        request_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        recommendations: result.recommendations.into_iter().map(Into::into).collect(),
        skipped: result.skipped,
    }))
}

/// POST /api/v1/recommendations
///
/// Derives search keywords from the profile, fetches listings from the job
/// source (through the listing cache), ranks them, and returns one page.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    if request.page == 0 {
        return Err(AppError::Validation("page must be at least 1".to_string()));
    }
    let size = request
        .size
        .unwrap_or(state.config.default_recommendations_count);
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(AppError::Validation(format!(
            "size must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    // No point spending a provider call on a profile that cannot form a query.
    if request.profile.is_blank() {
        return Err(RecommendError::EmptyProfile.into());
    }

    let keywords = extract_search_keywords(&request.profile);
    let query = JobQuery {
        keywords: keywords.clone(),
        location: request
            .location
            .clone()
            .or_else(|| state.config.default_job_location.clone()),
        limit: state.config.max_fetch_listings,
        page: 1,
    };

    let (listings, from_cache) = fetch_listings(&state, &query, request.force_refresh).await?;

    let mut config = state.engine.clone();
    if let Some(min_score) = request.min_score {
        config = config.with_min_score(min_score);
    }
    let result = recommend(&request.profile, &listings, &config)?;

    let items: Vec<RecommendationItem> =
        result.recommendations.into_iter().map(Into::into).collect();
    let page = paginate(&items, request.page, size);

    info!(
        "Recommendations: {} ranked, serving page {}/{} ({} item(s))",
        page.total,
        page.page,
        page.pages,
        page.items.len()
    );

    Ok(Json(RecommendResponse {
        request_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        source: state.job_source.name(),
        from_cache,
        keywords,
        recommendations: page,
        skipped: result.skipped,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_score_rounds_to_one_decimal() {
        assert_eq!(to_match_score(0.60543), 60.5);
        assert_eq!(to_match_score(0.0), 0.0);
        assert_eq!(to_match_score(1.0), 100.0);
    }

    #[test]
    fn test_item_flattens_listing_fields() {
        let item = RecommendationItem::from(Recommendation {
            listing: JobListing::new("a", "Rust Engineer", "Tokio"),
            score: 0.5,
        });
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["title"], "Rust Engineer");
        assert_eq!(json["match_score"], 50.0);
    }

    #[test]
    fn test_recommend_request_defaults() {
        let req: RecommendRequest =
            serde_json::from_str(r#"{"profile": {"skills": ["rust"]}}"#).unwrap();
        assert_eq!(req.page, 1);
        assert!(req.size.is_none());
        assert!(!req.force_refresh);
    }
}
