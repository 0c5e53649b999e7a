mod config;
mod errors;
mod jobs;
mod models;
mod recommendation;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::cache::{InMemoryListingCache, ListingCache, RedisListingCache};
use crate::jobs::jooble::JoobleClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Validate engine defaults up front rather than on the first request
    let engine = config.engine_config();
    engine.validate()?;
    info!(
        "Engine: skill_repetition_factor={}, min_score={}",
        engine.skill_repetition_factor, engine.min_score
    );

    // Initialize job source
    if config.jooble_api_key.is_none() {
        tracing::warn!("JOOBLE_API_KEY not set; /api/v1/recommendations will be unavailable");
    }
    let job_source = Arc::new(JoobleClient::new(
        config.jooble_api_url.clone(),
        config.jooble_api_key.clone(),
    )?);

    // Initialize listing cache (Redis when configured, otherwise in-process)
    let listing_cache: Arc<dyn ListingCache> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Listing cache: Redis");
            Arc::new(RedisListingCache::new(client, config.listing_cache_ttl))
        }
        None => {
            info!("Listing cache: in-memory");
            Arc::new(InMemoryListingCache::new(config.listing_cache_ttl))
        }
    };
    info!("Listing cache TTL: {:?}", listing_cache.ttl());

    // Build app state
    let state = AppState {
        config: config.clone(),
        engine,
        job_source,
        listing_cache,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
