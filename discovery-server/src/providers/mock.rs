//! Mock backend for running without provider access.
//!
//! Loads merchants and geocoding entries from JSON files and answers
//! merchant searches locally. Routes are synthesised as straight lines with
//! fixed speeds, so every response is deterministic.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::discovery::{INDOOR_ACCURACY_THRESHOLD_M, INDOOR_STAY_THRESHOLD_SECS};
use crate::domain::{
    BenefitSummary, Coordinate, DirectRoute, Itinerary, MerchantCandidate, PlaceDetails,
    RouteLeg, RouteMode, RouteResult, RouteSummary, Stop, TravelMode,
};
use crate::polyline;

use super::error::ProviderError;
use super::types::{BenefitDto, PointDto};
use super::{
    Geocoder, MerchantProvider, MerchantSearchRequest, MerchantSearchResponse,
    PlaceDetailsProvider, RouteProvider,
};

const MERCHANTS_FILE: &str = "merchants.json";
const GEOCODE_FILE: &str = "geocode.json";

/// Street distance is longer than the straight line.
const DETOUR_FACTOR: f64 = 1.25;

const WALK_SPEED_MPS: f64 = 1.25;
const DRIVE_SPEED_MPS: f64 = 8.0;
const BUS_SPEED_MPS: f64 = 5.0;
const SUBWAY_SPEED_MPS: f64 = 9.0;

const BUS_FARE_WON: u32 = 1_500;
const SUBWAY_FARE_WON: u32 = 1_400;

/// Below this distance only walking is offered for course legs and
/// transit has no itineraries.
const WALK_ONLY_M: f64 = 1_000.0;

/// Beyond this distance no route exists.
const MAX_ROUTE_M: f64 = 200_000.0;

/// Radius in which a merchant's building names the user's building.
const BUILDING_MATCH_M: f64 = 50.0;

/// A merchant record in `merchants.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MockMerchant {
    place_id: String,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    address: String,
    latitude: f64,
    longitude: f64,
    building_name: Option<String>,
    #[serde(default)]
    benefits: Vec<BenefitDto>,
    phone: Option<String>,
    website: Option<String>,
    rating: Option<f64>,
    #[serde(default)]
    opening_hours: Vec<String>,
    #[serde(default)]
    photos: Vec<String>,
}

#[derive(Debug, Clone)]
struct MockData {
    merchants: Vec<(MockMerchant, Coordinate)>,
    geocode: HashMap<String, Coordinate>,
}

/// Mock backend that serves data from JSON files.
#[derive(Clone)]
pub struct MockBackend {
    data: Arc<MockData>,
}

impl MockBackend {
    /// Load mock data from a directory.
    ///
    /// Expects `merchants.json`; `geocode.json` is optional.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let data = load(data_dir.as_ref())?;
        Ok(Self {
            data: Arc::new(data),
        })
    }

    /// Number of loaded merchants.
    pub fn merchant_count(&self) -> usize {
        self.data.merchants.len()
    }
}

fn load(data_dir: &Path) -> Result<MockData, ProviderError> {
    let merchants_path = data_dir.join(MERCHANTS_FILE);
    let json = std::fs::read_to_string(&merchants_path).map_err(|e| {
        ProviderError::MockData(format!("failed to read {}: {e}", merchants_path.display()))
    })?;
    let records: Vec<MockMerchant> = serde_json::from_str(&json).map_err(|e| {
        ProviderError::MockData(format!("failed to parse {}: {e}", merchants_path.display()))
    })?;

    let mut merchants = Vec::with_capacity(records.len());
    for record in records {
        let location = Coordinate::new(record.latitude, record.longitude).map_err(|e| {
            ProviderError::MockData(format!("merchant {}: {e}", record.place_id))
        })?;
        merchants.push((record, location));
    }

    let geocode_path = data_dir.join(GEOCODE_FILE);
    let geocode = if geocode_path.is_file() {
        let json = std::fs::read_to_string(&geocode_path).map_err(|e| {
            ProviderError::MockData(format!("failed to read {}: {e}", geocode_path.display()))
        })?;
        let raw: HashMap<String, PointDto> = serde_json::from_str(&json).map_err(|e| {
            ProviderError::MockData(format!("failed to parse {}: {e}", geocode_path.display()))
        })?;

        let mut geocode = HashMap::with_capacity(raw.len());
        for (address, point) in raw {
            let coordinate = Coordinate::new(point.lat, point.lng)
                .map_err(|e| ProviderError::MockData(format!("geocode {address}: {e}")))?;
            geocode.insert(normalize_address(&address), coordinate);
        }
        geocode
    } else {
        HashMap::new()
    };

    Ok(MockData { merchants, geocode })
}

fn normalize_address(address: &str) -> String {
    address.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Best benefit among the user's cards.
fn top_benefit(merchant: &MockMerchant, card_names: &[String]) -> Option<BenefitSummary> {
    merchant
        .benefits
        .iter()
        .filter(|b| card_names.iter().any(|c| c == &b.card_name))
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|b| BenefitSummary {
            card_name: b.card_name.clone(),
            score: b.score,
            benefit_text: b.benefit_text.clone(),
        })
}

fn lerp(a: Coordinate, b: Coordinate, t: f64) -> Coordinate {
    Coordinate {
        latitude: a.latitude + (b.latitude - a.latitude) * t,
        longitude: a.longitude + (b.longitude - a.longitude) * t,
    }
}

fn street_distance(from: Coordinate, to: Coordinate) -> f64 {
    from.haversine_distance(&to) * DETOUR_FACTOR
}

/// A straight-line leg with a three-point polyline.
fn straight_leg(
    mode: TravelMode,
    from: Coordinate,
    to: Coordinate,
    speed_mps: f64,
    fare: Option<u32>,
) -> RouteLeg {
    let distance_meters = street_distance(from, to);
    RouteLeg {
        mode,
        distance_meters,
        duration_seconds: (distance_meters / speed_mps).round() as u32,
        fare,
        polyline: polyline::encode(&[from, lerp(from, to, 0.5), to]),
        from,
        to,
    }
}

fn transit_itineraries(start: Coordinate, end: Coordinate) -> Vec<Itinerary> {
    if street_distance(start, end) < WALK_ONLY_M {
        return Vec::new();
    }

    let bus_board = lerp(start, end, 0.05);
    let bus_alight = lerp(start, end, 0.95);
    let bus = Itinerary::from_legs(vec![
        straight_leg(TravelMode::Walk, start, bus_board, WALK_SPEED_MPS, None),
        straight_leg(TravelMode::Bus, bus_board, bus_alight, BUS_SPEED_MPS, Some(BUS_FARE_WON)),
        straight_leg(TravelMode::Walk, bus_alight, end, WALK_SPEED_MPS, None),
    ]);

    let station = lerp(start, end, 0.1);
    let transfer = lerp(start, end, 0.8);
    let subway = Itinerary::from_legs(vec![
        straight_leg(TravelMode::Walk, start, station, WALK_SPEED_MPS, None),
        straight_leg(
            TravelMode::Subway,
            station,
            transfer,
            SUBWAY_SPEED_MPS,
            Some(SUBWAY_FARE_WON),
        ),
        straight_leg(TravelMode::Bus, transfer, end, BUS_SPEED_MPS, Some(0)),
    ]);

    vec![bus, subway]
}

impl MerchantProvider for MockBackend {
    async fn search(
        &self,
        request: &MerchantSearchRequest,
    ) -> Result<MerchantSearchResponse, ProviderError> {
        let data = &self.data;
        let radius = f64::from(request.radius_meters);

        let mut candidates: Vec<MerchantCandidate> = data
            .merchants
            .iter()
            .filter(|(_, location)| request.center.haversine_distance(location) <= radius)
            .map(|(merchant, location)| MerchantCandidate {
                place_id: Some(merchant.place_id.clone()),
                name: merchant.name.clone(),
                category: merchant.category.clone(),
                address: merchant.address.clone(),
                location: *location,
                distance_meters: request.user_location.haversine_distance(location),
                top_benefit: top_benefit(merchant, &request.card_names),
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.benefit_score()
                .total_cmp(&a.benefit_score())
                .then(a.distance_meters.total_cmp(&b.distance_meters))
        });

        let is_indoor = request
            .gps_accuracy_meters
            .is_some_and(|acc| acc >= INDOOR_ACCURACY_THRESHOLD_M)
            && request
                .staying_duration_seconds
                .is_some_and(|secs| secs >= INDOOR_STAY_THRESHOLD_SECS);

        let building_name = if is_indoor {
            data.merchants
                .iter()
                .filter(|(m, _)| m.building_name.is_some())
                .map(|(m, loc)| (m, request.user_location.haversine_distance(loc)))
                .filter(|(_, d)| *d <= BUILDING_MATCH_M)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .and_then(|(m, _)| m.building_name.clone())
        } else {
            None
        };

        Ok(MerchantSearchResponse {
            candidates,
            is_indoor,
            building_name,
        })
    }
}

impl PlaceDetailsProvider for MockBackend {
    async fn details(&self, place_id: &str) -> Result<PlaceDetails, ProviderError> {
        let data = &self.data;
        let (merchant, _) = data
            .merchants
            .iter()
            .find(|(m, _)| m.place_id == place_id)
            .ok_or(ProviderError::NotFound)?;

        Ok(PlaceDetails {
            name: merchant.name.clone(),
            address: merchant.address.clone(),
            phone: merchant.phone.clone(),
            website: merchant.website.clone(),
            rating: merchant.rating,
            opening_hours: merchant.opening_hours.clone(),
            photos: merchant.photos.clone(),
        })
    }
}

impl RouteProvider for MockBackend {
    async fn route_detail(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: RouteMode,
    ) -> Result<RouteResult, ProviderError> {
        if start.key() == end.key() || street_distance(start, end) > MAX_ROUTE_M {
            return Err(ProviderError::NotFound);
        }

        let result = match mode {
            RouteMode::Transit => RouteResult::Transit(transit_itineraries(start, end)),
            RouteMode::Walk | RouteMode::Drive => {
                let (travel_mode, speed) = if mode == RouteMode::Walk {
                    (TravelMode::Walk, WALK_SPEED_MPS)
                } else {
                    (TravelMode::Drive, DRIVE_SPEED_MPS)
                };
                let leg = straight_leg(travel_mode, start, end, speed, None);
                let summary = RouteSummary {
                    distance_meters: leg.distance_meters,
                    duration_seconds: leg.duration_seconds,
                    fare: None,
                };
                RouteResult::Direct(DirectRoute {
                    legs: vec![leg],
                    summary,
                })
            }
        };

        Ok(result)
    }

    async fn course_leg(&self, from: &Stop, to: &Stop) -> Result<RouteLeg, ProviderError> {
        let distance = street_distance(from.location, to.location);
        if distance > MAX_ROUTE_M {
            return Err(ProviderError::NotFound);
        }

        Ok(if distance < WALK_ONLY_M {
            straight_leg(TravelMode::Walk, from.location, to.location, WALK_SPEED_MPS, None)
        } else {
            straight_leg(
                TravelMode::Subway,
                from.location,
                to.location,
                SUBWAY_SPEED_MPS,
                Some(SUBWAY_FARE_WON),
            )
        })
    }
}

impl Geocoder for MockBackend {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        let data = &self.data;
        Ok(data.geocode.get(&normalize_address(address)).copied())
    }
}
