pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::jobs;
use crate::recommendation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendation API
        .route(
            "/api/v1/recommendations",
            post(recommendation::handlers::handle_recommend),
        )
        .route(
            "/api/v1/recommendations/rank",
            post(recommendation::handlers::handle_rank),
        )
        // Job market API
        .route("/api/v1/jobs/stats", post(jobs::handlers::handle_job_stats))
        .route("/api/v1/cache", delete(jobs::handlers::handle_clear_cache))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::jobs::cache::{InMemoryListingCache, ListingCache};
    use crate::jobs::{JobQuery, JobSource, JobSourceError};
    use crate::models::listing::JobListing;

    /// Serves a fixed batch and counts fetches.
    struct StaticJobSource {
        listings: Vec<JobListing>,
        calls: AtomicUsize,
        queries: Mutex<Vec<JobQuery>>,
    }

    #[async_trait]
    impl JobSource for StaticJobSource {
        async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobListing>, JobSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            Ok(self.listings.clone())
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    fn test_config() -> Config {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            jooble_api_key: None,
            jooble_api_url: String::new(),
            redis_url: None,
            listing_cache_ttl: Duration::from_secs(60),
            default_recommendations_count: 10,
            default_job_location: Some("Remote".to_string()),
            max_fetch_listings: 50,
            skill_repetition_factor: 2,
            min_score: 0.0,
        }
    }

    fn sample_listings() -> Vec<JobListing> {
        vec![
            JobListing::new("B", "Graphic Designer", "Seeking a graphic designer with Photoshop skills"),
            JobListing::new("A", "Developer", "Looking for a Python and SQL developer"),
            JobListing::new("C", "Data Analyst", "SQL reporting and dashboards"),
        ]
    }

    fn app_with(listings: Vec<JobListing>) -> (Router, Arc<StaticJobSource>, Arc<InMemoryListingCache>) {
        let config = test_config();
        let source = Arc::new(StaticJobSource {
            listings,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        });
        let cache = Arc::new(InMemoryListingCache::new(config.listing_cache_ttl));
        let state = AppState {
            engine: config.engine_config(),
            config,
            job_source: source.clone(),
            listing_cache: cache.clone(),
        };
        (build_router(state), source, cache)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _) = app_with(vec![]);
        let (status, body) = send(app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_rank_orders_supplied_listings() {
        let (app, source, _) = app_with(vec![]);
        let body = json!({
            "profile": {"skills": ["python", "sql"]},
            "listings": sample_listings()
        });
        let (status, body) = send(app, "POST", "/api/v1/recommendations/rank", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids[0], "A");
        assert_eq!(*ids.last().unwrap(), "B");
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rank_with_min_score_and_top_k() {
        let (app, _, _) = app_with(vec![]);
        let body = json!({
            "profile": {"skills": ["python", "sql"]},
            "listings": sample_listings(),
            "min_score": 0.1,
            "top_k": 1
        });
        let (status, body) = send(app, "POST", "/api/v1/recommendations/rank", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0]["id"], "A");
    }

    #[tokio::test]
    async fn test_rank_empty_profile_is_422() {
        let (app, _, _) = app_with(vec![]);
        let body = json!({"profile": {}, "listings": sample_listings()});
        let (status, body) = send(app, "POST", "/api/v1/recommendations/rank", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EMPTY_PROFILE");
    }

    #[tokio::test]
    async fn test_rank_empty_listings_is_422() {
        let (app, _, _) = app_with(vec![]);
        let body = json!({"profile": {"skills": ["python"]}, "listings": []});
        let (status, body) = send(app, "POST", "/api/v1/recommendations/rank", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EMPTY_CORPUS");
    }

    #[tokio::test]
    async fn test_rank_invalid_top_k_is_400() {
        let (app, _, _) = app_with(vec![]);
        let body = json!({
            "profile": {"skills": ["python"]},
            "listings": sample_listings(),
            "top_k": 0
        });
        let (status, _) = send(app, "POST", "/api/v1/recommendations/rank", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommend_fetches_then_serves_from_cache() {
        let (app, source, _) = app_with(sample_listings());
        let body = json!({"profile": {"skills": ["python", "sql"]}, "size": 2});

        let (status, first) = send(app.clone(), "POST", "/api/v1/recommendations", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["from_cache"], false);
        assert_eq!(first["source"], "static");
        assert_eq!(first["recommendations"]["total"], 3);
        assert_eq!(first["recommendations"]["items"].as_array().unwrap().len(), 2);
        assert_eq!(first["recommendations"]["items"][0]["id"], "A");
        assert_eq!(first["keywords"], json!(["python", "sql"]));

        let (_, second) = send(app, "POST", "/api/v1/recommendations", Some(body)).await;
        assert_eq!(second["from_cache"], true);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recommend_force_refresh_bypasses_cache() {
        let (app, source, _) = app_with(sample_listings());
        let body = json!({"profile": {"skills": ["python"]}, "force_refresh": true});
        send(app.clone(), "POST", "/api/v1/recommendations", Some(body.clone())).await;
        send(app, "POST", "/api/v1/recommendations", Some(body)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_recommend_second_page() {
        let (app, _, _) = app_with(sample_listings());
        let body = json!({"profile": {"skills": ["python", "sql"]}, "page": 2, "size": 2});
        let (status, body) = send(app, "POST", "/api/v1/recommendations", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommendations"]["page"], 2);
        assert_eq!(body["recommendations"]["has_prev"], true);
        assert_eq!(body["recommendations"]["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recommend_rejects_page_zero() {
        let (app, _, _) = app_with(sample_listings());
        let body = json!({"profile": {"skills": ["python"]}, "page": 0});
        let (status, body) = send(app, "POST", "/api/v1/recommendations", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_recommend_with_no_listings_is_empty_corpus() {
        let (app, _, cache) = app_with(vec![]);
        let body = json!({"profile": {"skills": ["python"]}});
        let (status, _) = send(app, "POST", "/api/v1/recommendations", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        // Empty batches are not cached.
        assert_eq!(cache.invalidate(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_recommend_blank_profile_skips_fetch() {
        let (app, source, _) = app_with(sample_listings());
        let body = json!({"profile": {"skills": ["  "]}});
        let (status, body) = send(app, "POST", "/api/v1/recommendations", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EMPTY_PROFILE");
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_job_stats() {
        let mut listings = sample_listings();
        listings[0].location = Some("Berlin".to_string());
        let (app, _, _) = app_with(listings);
        let body = json!({"profile": {"skills": ["sql"]}});
        let (status, body) = send(app, "POST", "/api/v1/jobs/stats", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_matching_jobs"], 3);
        assert_eq!(body["locations"]["Berlin"], 1);
        assert_eq!(body["locations"]["Unknown"], 2);
    }

    #[tokio::test]
    async fn test_job_stats_shares_default_location_and_cache() {
        let (app, source, _) = app_with(sample_listings());
        let body = json!({"profile": {"skills": ["sql"]}});
        send(app.clone(), "POST", "/api/v1/recommendations", Some(body.clone())).await;
        let (status, _) = send(app, "POST", "/api/v1/jobs/stats", Some(body)).await;
        assert_eq!(status, StatusCode::OK);

        let queries = source.queries.lock().unwrap();
        assert!(queries
            .iter()
            .all(|q| q.location.as_deref() == Some("Remote")));
    }

    #[tokio::test]
    async fn test_job_stats_explicit_location_wins() {
        let (app, source, _) = app_with(sample_listings());
        let body = json!({"profile": {"skills": ["sql"]}, "location": "Berlin"});
        send(app, "POST", "/api/v1/jobs/stats", Some(body)).await;
        let queries = source.queries.lock().unwrap();
        assert_eq!(queries[0].location.as_deref(), Some("Berlin"));
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let (app, source, _) = app_with(sample_listings());
        let body = json!({"profile": {"skills": ["python"]}});
        send(app.clone(), "POST", "/api/v1/recommendations", Some(body.clone())).await;

        let (status, _) = send(app.clone(), "DELETE", "/api/v1/cache", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        send(app, "POST", "/api/v1/recommendations", Some(body)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
