//! Domain types for location-aware discovery and routing.
//!
//! These are plain values built and consumed within a single discovery or
//! routing request. Coordinates enforce their range invariant at
//! construction time.

mod coordinate;
mod merchant;
mod route;
mod search;

pub use coordinate::{Coordinate, CoordinateKey, EARTH_RADIUS_M, InvalidCoordinate};
pub use merchant::{
    BenefitSummary, BenefitTier, MerchantCandidate, NearbyResult, PlaceDetails, TieredMerchant,
};
pub use route::{
    Course, DirectRoute, InvalidRouteMode, Itinerary, RouteLeg, RouteMode, RouteResult,
    RouteSummary, Stop, TravelMode, saturating_total,
};
pub use search::{CameraState, SearchContext, SensorReadings, StaySample};
