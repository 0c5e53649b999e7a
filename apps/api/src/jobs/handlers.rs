//! Axum route handlers for job statistics and cache control, plus the
//! cached fetch shared with the recommendation handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::jobs::keywords::extract_search_keywords;
use crate::jobs::stats::{compute_job_stats, JobStats};
use crate::jobs::JobQuery;
use crate::models::listing::JobListing;
use crate::models::profile::UserProfile;
use crate::state::AppState;

/// Larger sample for statistics than for ranking.
const STATS_FETCH_LIMIT: usize = 100;

/// Returns listings for `query` and whether they came from the cache.
///
/// Cache failures are logged and treated as a miss; they never fail the
/// request. Job source failures do.
pub async fn fetch_listings(
    state: &AppState,
    query: &JobQuery,
    force_refresh: bool,
) -> Result<(Vec<JobListing>, bool), AppError> {
    let key = query.cache_key();

    if !force_refresh {
        match state.listing_cache.get(&key).await {
            Ok(Some(listings)) => {
                debug!("Listing cache hit: {key}");
                return Ok((listings, true));
            }
            Ok(None) => debug!("Listing cache miss: {key}"),
            Err(e) => warn!("Listing cache read failed, fetching fresh: {e}"),
        }
    }

    let listings = state.job_source.fetch(query).await?;
    info!(
        "Fetched {} listing(s) from {}",
        listings.len(),
        state.job_source.name()
    );

    if !listings.is_empty() {
        if let Err(e) = state.listing_cache.put(&key, &listings).await {
            warn!("Listing cache write failed: {e}");
        }
    }

    Ok((listings, false))
}

#[derive(Debug, Deserialize)]
pub struct JobStatsRequest {
    pub profile: UserProfile,
    #[serde(default)]
    pub location: Option<String>,
}

/// POST /api/v1/jobs/stats
pub async fn handle_job_stats(
    State(state): State<AppState>,
    Json(request): Json<JobStatsRequest>,
) -> Result<Json<JobStats>, AppError> {
    let query = JobQuery {
        keywords: extract_search_keywords(&request.profile),
        location: request
            .location
            .or_else(|| state.config.default_job_location.clone()),
        limit: STATS_FETCH_LIMIT,
        page: 1,
    };
    let (listings, _) = fetch_listings(&state, &query, false).await?;
    Ok(Json(compute_job_stats(&listings)))
}

#[derive(Debug, Deserialize)]
pub struct CacheKeyQuery {
    pub key: Option<String>,
}

/// DELETE /api/v1/cache
///
/// Clears one cache key (`?key=`) or the whole listing cache.
pub async fn handle_clear_cache(
    State(state): State<AppState>,
    Query(params): Query<CacheKeyQuery>,
) -> Result<StatusCode, AppError> {
    let removed = state.listing_cache.invalidate(params.key.as_deref()).await?;
    info!(
        "Listing cache cleared ({}): {removed} entr(ies) removed",
        params.key.as_deref().unwrap_or("all")
    );
    Ok(StatusCode::NO_CONTENT)
}
