//! Listing cache collaborator.
//!
//! Caches raw listing batches per search (see `JobQuery::cache_key`), never
//! ranked results. Every entry expires after the cache's TTL and can be
//! invalidated explicitly, one key or all of them.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

use crate::models::listing::JobListing;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache payload error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("cache lock poisoned")]
    Poisoned,
}

#[async_trait]
pub trait ListingCache: Send + Sync {
    /// Listings stored under `key`, unless absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<JobListing>>, CacheError>;

    async fn put(&self, key: &str, listings: &[JobListing]) -> Result<(), CacheError>;

    /// Drops `key`, or everything when `None`. Returns the number of entries removed.
    async fn invalidate(&self, key: Option<&str>) -> Result<usize, CacheError>;

    fn ttl(&self) -> Duration;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

struct CachedBatch {
    stored_at: Instant,
    listings: Vec<JobListing>,
}

/// Process-local cache. Expired entries are evicted on read and swept on every write.
pub struct InMemoryListingCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedBatch>>,
}

impl InMemoryListingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ListingCache for InMemoryListingCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<JobListing>>, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let fresh = match entries.get(key) {
            None => return Ok(None),
            Some(batch) => batch.stored_at.elapsed() < self.ttl,
        };
        if fresh {
            return Ok(entries.get(key).map(|batch| batch.listings.clone()));
        }
        debug!("Listing cache entry expired: {key}");
        entries.remove(key);
        Ok(None)
    }

    async fn put(&self, key: &str, listings: &[JobListing]) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let before = entries.len();
        entries.retain(|_, batch| batch.stored_at.elapsed() < self.ttl);
        let swept = before - entries.len();
        if swept > 0 {
            debug!("Swept {swept} expired listing cache entries");
        }
        entries.insert(
            key.to_string(),
            CachedBatch {
                stored_at: Instant::now(),
                listings: listings.to_vec(),
            },
        );
        Ok(())
    }

    async fn invalidate(&self, key: Option<&str>) -> Result<usize, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let removed = match key {
            Some(key) => usize::from(entries.remove(key).is_some()),
            None => {
                let n = entries.len();
                entries.clear();
                n
            }
        };
        Ok(removed)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

const REDIS_KEY_PREFIX: &str = "jobmatch:listings:";
const SCAN_COUNT: usize = 200;

/// Shared cache backed by Redis. Entries are JSON with a server-side `EX`.
pub struct RedisListingCache {
    client: redis::Client,
    ttl: Duration,
}

impl RedisListingCache {
    pub fn new(client: redis::Client, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    fn redis_key(key: &str) -> String {
        format!("{REDIS_KEY_PREFIX}{key}")
    }

    fn scan_cmd(cursor: u64, pattern: &str) -> redis::Cmd {
        let mut cmd = redis::cmd("SCAN");
        cmd.arg(cursor).arg("MATCH").arg(pattern).arg("COUNT").arg(SCAN_COUNT);
        cmd
    }
}

#[async_trait]
impl ListingCache for RedisListingCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<JobListing>>, CacheError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(Self::redis_key(key))
            .query_async(&mut con)
            .await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, listings: &[JobListing]) -> Result<(), CacheError> {
        let payload = serde_json::to_string(listings)?;
        let mut con = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(Self::redis_key(key))
            .arg(payload)
            .arg("EX")
            .arg(self.ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut con)
            .await?;
        Ok(())
    }

    async fn invalidate(&self, key: Option<&str>) -> Result<usize, CacheError> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let keys: Vec<String> = match key {
            Some(key) => vec![Self::redis_key(key)],
            None => {
                let pattern = format!("{REDIS_KEY_PREFIX}*");
                let mut cursor: u64 = 0;
                let mut found = Vec::new();
                loop {
                    let (next, batch): (u64, Vec<String>) =
                        Self::scan_cmd(cursor, &pattern).query_async(&mut con).await?;
                    found.extend(batch);
                    if next == 0 {
                        break;
                    }
                    cursor = next;
                }
                found.sort();
                found.dedup();
                found
            }
        };
        if keys.is_empty() {
            return Ok(0);
        }
        let removed: usize = redis::cmd("DEL").arg(keys).query_async(&mut con).await?;
        Ok(removed)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}
