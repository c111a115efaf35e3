//! External providers consumed by the engine.
//!
//! Each provider is a trait so the engine can be driven by the HTTP backend
//! client, the file-backed mock, or an in-test fake. Every call is an
//! awaitable I/O boundary; timeouts belong to the transport.

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{BackendClient, BackendConfig};
pub use convert::ConversionError;
pub use error::ProviderError;
pub use mock::MockBackend;

use crate::domain::{
    Coordinate, MerchantCandidate, PlaceDetails, RouteLeg, RouteMode, RouteResult, Stop,
};

/// A merchant search as sent to the merchant/benefit provider.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantSearchRequest {
    pub center: Coordinate,
    pub radius_meters: u32,
    pub user_location: Coordinate,
    pub card_names: Vec<String>,
    pub gps_accuracy_meters: Option<f64>,
    pub staying_duration_seconds: Option<u64>,
}

/// Provider response to a merchant search.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantSearchResponse {
    /// Candidates in provider order.
    pub candidates: Vec<MerchantCandidate>,
    pub is_indoor: bool,
    pub building_name: Option<String>,
}

/// Spatial merchant search with benefit scoring.
pub trait MerchantProvider {
    async fn search(
        &self,
        request: &MerchantSearchRequest,
    ) -> Result<MerchantSearchResponse, ProviderError>;
}

/// Display details for a single place.
pub trait PlaceDetailsProvider {
    async fn details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError>;
}

/// Route alternatives between points.
pub trait RouteProvider {
    /// Alternatives for one start/end pair in the given mode.
    ///
    /// Drive and walk return [`RouteResult::Direct`]; transit returns
    /// [`RouteResult::Transit`].
    async fn route_detail(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: RouteMode,
    ) -> Result<RouteResult, ProviderError>;

    /// One leg between consecutive course stops, mode chosen by the provider.
    async fn course_leg(&self, from: &Stop, to: &Stop) -> Result<RouteLeg, ProviderError>;
}

/// Address to coordinate resolution.
pub trait Geocoder {
    /// Returns `None` when the address does not resolve.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError>;
}

/// The backend the server runs against.
#[derive(Clone)]
pub enum Backend {
    Http(BackendClient),
    Mock(MockBackend),
}

impl MerchantProvider for Backend {
    async fn search(
        &self,
        request: &MerchantSearchRequest,
    ) -> Result<MerchantSearchResponse, ProviderError> {
        match self {
            Backend::Http(client) => client.search(request).await,
            Backend::Mock(mock) => mock.search(request).await,
        }
    }
}

impl PlaceDetailsProvider for Backend {
    async fn details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError> {
        match self {
            Backend::Http(client) => client.details(place_id).await,
            Backend::Mock(mock) => mock.details(place_id).await,
        }
    }
}

impl RouteProvider for Backend {
    async fn route_detail(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: RouteMode,
    ) -> Result<RouteResult, ProviderError> {
        match self {
            Backend::Http(client) => client.route_detail(start, end, mode).await,
            Backend::Mock(mock) => mock.route_detail(start, end, mode).await,
        }
    }

    async fn course_leg(&self, from: &Stop, to: &Stop) -> Result<RouteLeg, ProviderError> {
        match self {
            Backend::Http(client) => client.course_leg(from, to).await,
            Backend::Mock(mock) => mock.course_leg(from, to).await,
        }
    }
}

impl Geocoder for Backend {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        match self {
            Backend::Http(client) => client.geocode(address).await,
            Backend::Mock(mock) => mock.geocode(address).await,
        }
    }
}
