//! Address lookup.
//!
//! Resolves a free-text address to a coordinate. An address that does not
//! resolve is an error; there is no fallback guess.

use tracing::debug;

use crate::domain::Coordinate;
use crate::providers::{Geocoder, ProviderError};

/// Error from an address lookup.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// Blank address
    #[error("address is empty")]
    EmptyAddress,

    /// The provider knows no such address
    #[error("address not found: {0}")]
    NotFound(String),

    /// The geocoding provider failed
    #[error("geocoding provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Resolve an address through the given geocoder.
pub async fn resolve_address<G: Geocoder>(
    geocoder: &G,
    address: &str,
) -> Result<Coordinate, GeocodeError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(GeocodeError::EmptyAddress);
    }

    match geocoder.geocode(address).await {
        Ok(Some(coordinate)) => {
            debug!(address, %coordinate, "geocoded address");
            Ok(coordinate)
        }
        Ok(None) | Err(ProviderError::NotFound) => Err(GeocodeError::NotFound(address.to_string())),
        Err(e) => Err(e.into()),
    }
}
