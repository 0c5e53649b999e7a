use std::sync::Arc;

use crate::config::Config;
use crate::jobs::cache::ListingCache;
use crate::jobs::JobSource;
use crate::recommendation::engine::EngineConfig;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds collaborators only; the recommendation engine itself is stateless.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Defaults applied to every engine call; requests may override top_k / min_score.
    pub engine: EngineConfig,
    pub job_source: Arc<dyn JobSource>,
    pub listing_cache: Arc<dyn ListingCache>,
}
