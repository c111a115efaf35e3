//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    BenefitSummary, BenefitTier, CameraState, Coordinate, Course, DirectRoute, InvalidCoordinate,
    NearbyResult, RouteLeg, TieredMerchant, TravelMode,
};
use crate::routing::ItinerarySelection;

/// A location fix from the client.
#[derive(Debug, Deserialize)]
pub struct LocationUpdateRequest {
    /// Client session identifier
    pub session_id: String,

    pub latitude: f64,
    pub longitude: f64,

    /// Reported GPS accuracy radius in meters
    pub gps_accuracy: Option<f64>,

    /// Fix time in milliseconds since the epoch (defaults to now)
    pub timestamp_millis: Option<i64>,
}

/// Sensor state after a location fix.
#[derive(Debug, Serialize)]
pub struct LocationUpdateResponse {
    pub staying_duration_seconds: u64,
    pub gps_accuracy: Option<f64>,

    /// Local preview of the indoor rule; the search result is authoritative
    pub likely_indoor: bool,
}

/// Map viewport.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CameraRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl CameraRequest {
    pub fn to_camera(self) -> Result<CameraState, InvalidCoordinate> {
        Ok(CameraState {
            center: Coordinate::new(self.latitude, self.longitude)?,
            zoom: self.zoom,
        })
    }
}

/// Request for merchants around the viewport.
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    /// Client session identifier
    pub session_id: String,

    pub camera: CameraRequest,

    /// Cards the user owns
    #[serde(default)]
    pub card_names: Vec<String>,

    /// Overrides the session's last location fix
    pub user_latitude: Option<f64>,
    pub user_longitude: Option<f64>,

    /// Pretend the user is indoors (only when enabled on the server)
    #[serde(default)]
    pub force_indoor: bool,
}

/// A merchant in nearby results.
#[derive(Debug, Serialize)]
pub struct MerchantResult {
    pub place_id: Option<String>,
    pub name: String,
    pub category: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
    pub tier: BenefitTier,
    pub benefit: Option<BenefitSummary>,
}

impl MerchantResult {
    pub fn from_tiered(merchant: &TieredMerchant) -> Self {
        let c = &merchant.candidate;
        Self {
            place_id: c.place_id.clone(),
            name: c.name.clone(),
            category: c.category.clone(),
            address: c.address.clone(),
            latitude: c.location.latitude,
            longitude: c.location.longitude,
            distance_meters: c.distance_meters,
            tier: merchant.tier,
            benefit: c.top_benefit.clone(),
        }
    }
}

/// Merchants around the viewport.
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    /// Radius searched, in meters
    pub radius_meters: u32,

    pub is_indoor: bool,
    pub building_name: Option<String>,

    /// Search ticket the merchants came from
    pub generation: u64,

    pub merchants: Vec<MerchantResult>,

    /// True when the merchants are from an earlier search because this
    /// one failed
    pub stale: bool,

    /// Why this search failed, when `stale`
    pub error: Option<String>,
}

impl NearbyResponse {
    /// Response for a search that succeeded.
    pub fn fresh(radius_meters: u32, result: &NearbyResult) -> Self {
        Self::build(radius_meters, result, None)
    }

    /// Response that keeps showing earlier results after a failure.
    pub fn stale(radius_meters: u32, last_good: Option<&NearbyResult>, error: String) -> Self {
        match last_good {
            Some(result) => Self::build(radius_meters, result, Some(error)),
            None => Self {
                radius_meters,
                is_indoor: false,
                building_name: None,
                generation: 0,
                merchants: Vec::new(),
                stale: true,
                error: Some(error),
            },
        }
    }

    fn build(radius_meters: u32, result: &NearbyResult, error: Option<String>) -> Self {
        Self {
            radius_meters,
            is_indoor: result.is_indoor,
            building_name: result.building_name.clone(),
            generation: result.generation,
            merchants: result.merchants.iter().map(MerchantResult::from_tiered).collect(),
            stale: error.is_some(),
            error,
        }
    }
}

/// Query for route alternatives between two points.
#[derive(Debug, Deserialize)]
pub struct RouteLegQuery {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,

    /// "drive", "walk" or "transit"
    pub mode: String,

    /// Transit itinerary to select (defaults to the fastest)
    pub selected: Option<usize>,
}

/// A point on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointResult {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for PointResult {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// One leg with its decoded path.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub mode: TravelMode,
    pub distance_meters: f64,
    pub duration_seconds: u32,
    pub fare: Option<u32>,
    pub from: PointResult,
    pub to: PointResult,
    pub polyline: String,

    /// Decoded polyline; `None` when it is malformed
    pub path: Option<Vec<PointResult>>,

    /// Why `path` could not be decoded
    pub path_error: Option<String>,
}

impl LegResult {
    pub fn from_leg(leg: &RouteLeg) -> Self {
        let (path, path_error) = match leg.path() {
            Ok(points) => (Some(points.into_iter().map(PointResult::from).collect()), None),
            Err(e) => {
                warn!(error = %e, "leg has malformed polyline");
                (None, Some(e.to_string()))
            }
        };

        Self {
            mode: leg.mode,
            distance_meters: leg.distance_meters,
            duration_seconds: leg.duration_seconds,
            fare: leg.fare,
            from: leg.from.into(),
            to: leg.to.into(),
            polyline: leg.polyline.clone(),
            path,
            path_error,
        }
    }
}

/// A driving or walking route.
#[derive(Debug, Serialize)]
pub struct DirectRouteResult {
    pub distance_meters: f64,
    pub duration_seconds: u32,
    pub fare: Option<u32>,
    pub legs: Vec<LegResult>,
}

impl DirectRouteResult {
    pub fn from_route(route: &DirectRoute) -> Self {
        Self {
            distance_meters: route.summary.distance_meters,
            duration_seconds: route.summary.duration_seconds,
            fare: route.summary.fare,
            legs: route.legs.iter().map(LegResult::from_leg).collect(),
        }
    }
}

/// A transit itinerary.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    pub total_duration_seconds: u32,
    pub total_fare_won: u32,
    pub transfer_count: u32,
    pub legs: Vec<LegResult>,
}

/// Route alternatives for one mode.
///
/// Driving and walking fill `route`; transit fills `itineraries` and
/// `selected`.
#[derive(Debug, Serialize)]
pub struct RouteLegResponse {
    pub mode: String,
    pub route: Option<DirectRouteResult>,
    pub itineraries: Option<Vec<ItineraryResult>>,
    pub selected: Option<usize>,
}

impl RouteLegResponse {
    pub fn direct(mode: String, route: &DirectRoute) -> Self {
        Self {
            mode,
            route: Some(DirectRouteResult::from_route(route)),
            itineraries: None,
            selected: None,
        }
    }

    pub fn transit(mode: String, selection: &ItinerarySelection) -> Self {
        let itineraries = selection
            .itineraries()
            .iter()
            .map(|it| ItineraryResult {
                total_duration_seconds: it.total_duration_seconds,
                total_fare_won: it.total_fare_won,
                transfer_count: it.transfer_count,
                legs: it.legs.iter().map(LegResult::from_leg).collect(),
            })
            .collect();

        Self {
            mode,
            route: None,
            itineraries: Some(itineraries),
            selected: Some(selection.selected_index()),
        }
    }
}

/// A stop in a course request.
#[derive(Debug, Deserialize)]
pub struct StopRequest {
    #[serde(default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Request to compose a multi-stop course.
#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    pub stops: Vec<StopRequest>,
}

/// A composed course.
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    /// One entry per consecutive stop pair; null marks a gap
    pub legs: Vec<Option<LegResult>>,

    /// Indices of pairs without a leg
    pub gaps: Vec<usize>,

    pub complete: bool,

    /// Duration of the resolved legs
    pub resolved_duration_seconds: u32,
}

impl CourseResponse {
    pub fn from_course(course: &Course) -> Self {
        Self {
            legs: course
                .legs
                .iter()
                .map(|leg| leg.as_ref().map(LegResult::from_leg))
                .collect(),
            gaps: course.gaps(),
            complete: course.is_complete(),
            resolved_duration_seconds: course.resolved_duration_seconds(),
        }
    }
}

/// Query for an address lookup.
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub address: String,
}

/// Resolved address.
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub address: String,
    pub location: PointResult,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
