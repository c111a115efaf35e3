//! Caching layer for single-leg route results.
//!
//! Toggling between the drive, walk and transit tabs for the same start and
//! end must not refetch a mode that was already loaded. Entries are keyed by
//! the quantised endpoints plus the mode, so two requests for points that
//! agree to five decimals share an entry.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Coordinate, CoordinateKey, RouteMode, RouteResult};

/// Cache key for route results: (start, end, mode).
pub type RouteKey = (CoordinateKey, CoordinateKey, RouteMode);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Cache for route provider responses.
pub struct RouteCache {
    routes: MokaCache<RouteKey, Arc<RouteResult>>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    pub fn key(start: Coordinate, end: Coordinate, mode: RouteMode) -> RouteKey {
        (start.key(), end.key(), mode)
    }

    /// Get a cached route result.
    pub async fn get(&self, key: &RouteKey) -> Option<Arc<RouteResult>> {
        self.routes.get(key).await
    }

    /// Insert a route result into the cache.
    pub async fn insert(&self, key: RouteKey, entry: Arc<RouteResult>) {
        self.routes.insert(key, entry).await;
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}
