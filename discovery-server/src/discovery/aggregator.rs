//! Nearby merchant aggregation.
//!
//! The provider does the spatial query and benefit scoring. The aggregator
//! assembles the request from a search context and the user's cards, caps
//! the list, and tiers the scores of what is left.
//!
//! Searches are triggered by camera movement, so several can be in flight
//! for one session. Each search takes a ticket from a [`SearchGeneration`];
//! a result whose ticket is no longer the newest is discarded, whatever
//! order responses arrive in.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::domain::{NearbyResult, SearchContext};
use crate::providers::{MerchantProvider, MerchantSearchRequest, ProviderError};

use super::config::DiscoveryConfig;
use super::tier::assign_tiers;

/// Error from a nearby-merchant search.
///
/// Every variant is recoverable: the caller keeps showing its previous
/// results.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The merchant provider failed
    #[error("merchant provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A newer search was issued while this one was in flight
    #[error("search {ticket} superseded by search {latest}")]
    Superseded { ticket: u64, latest: u64 },

    /// The search context cannot be sent
    #[error("invalid search: {0}")]
    InvalidRequest(String),
}

/// Monotonic sequence of search tickets for one session.
#[derive(Debug, Default)]
pub struct SearchGeneration {
    latest: AtomicU64,
}

impl SearchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding all earlier ones.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// The most recently issued ticket (0 before any search).
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest() == ticket
    }
}

/// Finds merchants around a search context.
pub struct NearbyMerchantAggregator<P> {
    provider: P,
    config: DiscoveryConfig,
}

impl<P: MerchantProvider> NearbyMerchantAggregator<P> {
    pub fn new(provider: P, config: DiscoveryConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Build the provider request for a search.
    pub fn build_request(
        &self,
        ctx: &SearchContext,
        card_names: &BTreeSet<String>,
    ) -> Result<MerchantSearchRequest, DiscoveryError> {
        if ctx.radius_meters == 0 {
            return Err(DiscoveryError::InvalidRequest(
                "search radius must be positive".to_string(),
            ));
        }

        Ok(MerchantSearchRequest {
            center: ctx.query_center,
            radius_meters: ctx.radius_meters,
            user_location: ctx.origin(),
            card_names: card_names.iter().cloned().collect(),
            gps_accuracy_meters: ctx.gps_accuracy_meters,
            staying_duration_seconds: Some(ctx.staying_duration_seconds),
        })
    }

    /// Search for merchants, keeping at most `max_results` in provider order.
    ///
    /// Tiers are computed over the scores of the kept merchants only.
    pub async fn find_nearby(
        &self,
        ctx: &SearchContext,
        card_names: &BTreeSet<String>,
    ) -> Result<NearbyResult, DiscoveryError> {
        let request = self.build_request(ctx, card_names)?;
        let response = self.provider.search(&request).await?;

        let total = response.candidates.len();
        let mut candidates = response.candidates;
        candidates.truncate(self.config.max_results);

        debug!(
            center = %ctx.query_center,
            radius = ctx.radius_meters,
            returned = total,
            kept = candidates.len(),
            is_indoor = response.is_indoor,
            "nearby search complete"
        );

        Ok(NearbyResult {
            merchants: assign_tiers(candidates),
            is_indoor: response.is_indoor,
            building_name: response.building_name,
            generation: 0,
        })
    }

    /// Search as the newest request of a session.
    ///
    /// Takes a ticket before calling the provider. If another search began
    /// before this one finished, the result is dropped and
    /// [`DiscoveryError::Superseded`] is returned instead.
    pub async fn find_nearby_latest(
        &self,
        ctx: &SearchContext,
        card_names: &BTreeSet<String>,
        generation: &SearchGeneration,
    ) -> Result<NearbyResult, DiscoveryError> {
        let ticket = generation.begin();
        let mut result = self.find_nearby(ctx, card_names).await?;

        let latest = generation.latest();
        if latest != ticket {
            debug!(ticket, latest, "dropping superseded search");
            return Err(DiscoveryError::Superseded { ticket, latest });
        }

        result.generation = ticket;
        Ok(result)
    }
}
