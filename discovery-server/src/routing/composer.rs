//! Single-leg and multi-stop route composition.
//!
//! Single-leg queries go through the route cache so that toggling between
//! modes for the same endpoints only hits the provider once per mode.
//! Courses fetch every stop pair independently; a pair that fails or times
//! out becomes a gap instead of failing the whole course.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::cache::{CacheConfig, RouteCache};
use crate::domain::{Coordinate, Course, RouteLeg, RouteMode, RouteResult, Stop};
use crate::providers::{ProviderError, RouteProvider};

use super::config::RouteConfig;
use super::rank::rank_itineraries;

/// Error from a single-leg route query.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The provider has no route for this mode
    #[error("no {mode} route found from {start} to {end}")]
    RouteUnavailable {
        start: Coordinate,
        end: Coordinate,
        mode: RouteMode,
    },

    /// The provider could not be reached or answered badly
    #[error("route provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl RouteError {
    /// Returns true if retrying the same query may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            RouteError::RouteUnavailable { .. } => false,
            RouteError::Provider(e) => e.is_transient(),
        }
    }
}

/// Composes single-leg alternatives and multi-stop courses.
pub struct MultiModalRouteComposer<P> {
    provider: P,
    cache: RouteCache,
    config: RouteConfig,
}

impl<P: RouteProvider> MultiModalRouteComposer<P> {
    /// Create a new composer.
    pub fn new(provider: P, config: RouteConfig, cache_config: &CacheConfig) -> Self {
        Self {
            provider,
            cache: RouteCache::new(cache_config),
            config,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Route alternatives from `start` to `end` in one mode.
    ///
    /// Transit itineraries come back ranked fastest first. Results are
    /// cached per (start, end, mode); empty results are not.
    pub async fn fetch_leg_alternatives(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: RouteMode,
    ) -> Result<Arc<RouteResult>, RouteError> {
        let key = RouteCache::key(start, end, mode);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(%start, %end, %mode, "route cache hit");
            return Ok(cached);
        }

        let result = match self.provider.route_detail(start, end, mode).await {
            Ok(result) => result,
            Err(ProviderError::NotFound) => {
                return Err(RouteError::RouteUnavailable { start, end, mode });
            }
            Err(e) => return Err(e.into()),
        };

        let result = match result {
            RouteResult::Transit(itineraries) => {
                RouteResult::Transit(rank_itineraries(itineraries))
            }
            direct => direct,
        };

        if result.is_empty() {
            return Err(RouteError::RouteUnavailable { start, end, mode });
        }

        let result = Arc::new(result);
        self.cache.insert(key, Arc::clone(&result)).await;

        Ok(result)
    }

    /// Compose a course through the given stops.
    ///
    /// Produces one entry per consecutive pair, in stop order. At most
    /// `max_concurrent_legs` pairs are in flight; the next pair starts as
    /// soon as any earlier one finishes.
    pub async fn compose_course(&self, stops: &[Stop]) -> Course {
        let legs: Vec<Option<RouteLeg>> = stream::iter(0..stops.len().saturating_sub(1))
            .map(|index| self.fetch_course_leg(index, &stops[index], &stops[index + 1]))
            .buffered(self.config.max_concurrent_legs.max(1))
            .collect()
            .await;

        let course = Course {
            stops: stops.to_vec(),
            legs,
        };

        debug!(
            stops = course.stops.len(),
            gaps = course.gaps().len(),
            "composed course"
        );

        course
    }

    /// One course leg, or `None` on failure or timeout.
    async fn fetch_course_leg(&self, index: usize, from: &Stop, to: &Stop) -> Option<RouteLeg> {
        let fetch = self.provider.course_leg(from, to);

        match tokio::time::timeout(self.config.leg_timeout, fetch).await {
            Ok(Ok(leg)) => Some(leg),
            Ok(Err(e)) => {
                warn!(
                    leg = index,
                    from = %from.name,
                    to = %to.name,
                    error = %e,
                    "course leg unavailable"
                );
                None
            }
            Err(_) => {
                warn!(
                    leg = index,
                    from = %from.name,
                    to = %to.name,
                    timeout_ms = self.config.leg_timeout.as_millis() as u64,
                    "course leg timed out"
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "composer_tests.rs"]
mod tests;
