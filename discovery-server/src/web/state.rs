//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CacheConfig;
use crate::discovery::{DiscoveryConfig, NearbyMerchantAggregator, SessionRegistry};
use crate::providers::Backend;
use crate::routing::{MultiModalRouteComposer, RouteConfig};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Backend used for place details and geocoding
    pub backend: Arc<Backend>,

    /// Nearby merchant search
    pub discovery: Arc<NearbyMerchantAggregator<Backend>>,

    /// Route fetching with the per-mode cache
    pub composer: Arc<MultiModalRouteComposer<Backend>>,

    /// Per-client stay tracking and last-good results
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        backend: Backend,
        discovery_config: DiscoveryConfig,
        route_config: RouteConfig,
        cache_config: &CacheConfig,
        sessions: SessionRegistry,
    ) -> Self {
        Self {
            discovery: Arc::new(NearbyMerchantAggregator::new(
                backend.clone(),
                discovery_config,
            )),
            composer: Arc::new(MultiModalRouteComposer::new(
                backend.clone(),
                route_config,
                cache_config,
            )),
            backend: Arc::new(backend),
            sessions: Arc::new(sessions),
        }
    }
}
