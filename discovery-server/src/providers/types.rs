//! Backend API request and response DTOs.
//!
//! These map directly to the backend's JSON. Optional fields use `Option`
//! because the backend omits them rather than sending null.

use serde::{Deserialize, Serialize};

use crate::domain::PlaceDetails;

/// Body of `POST /merchants/search`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSearchBody {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in meters.
    pub radius: u32,
    pub user_lat: f64,
    pub user_lng: f64,
    pub card_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staying_duration: Option<u64>,
}

/// Response of `POST /merchants/search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSearchDto {
    #[serde(default)]
    pub candidates: Vec<MerchantDto>,
    #[serde(default)]
    pub is_indoor: bool,
    pub building_name: Option<String>,
}

/// A merchant in search results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDto {
    pub place_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Distance from the user in meters.
    pub distance: Option<f64>,
    pub top_benefit: Option<BenefitDto>,
}

/// Best benefit for a merchant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitDto {
    pub card_name: String,
    pub score: f64,
    #[serde(default)]
    pub benefit_text: String,
}

/// Response of `GET /places/{id}`.
pub type PlaceDetailsDto = PlaceDetails;

/// A latitude/longitude pair on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointDto {
    pub lat: f64,
    pub lng: f64,
}

/// One leg in a route response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    /// "WALK", "CAR", "BUS" or "SUBWAY".
    pub mode: String,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: u32,
    pub fare: Option<u32>,
    #[serde(default)]
    pub polyline: String,
    pub start: PointDto,
    pub end: PointDto,
}

/// Totals of a driving or walking route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub distance: f64,
    pub duration: u32,
    pub fare: Option<u32>,
}

/// One transit alternative.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDto {
    pub legs: Vec<LegDto>,
    pub total_time: Option<u32>,
    pub total_fare: Option<u32>,
    pub transfer_count: Option<u32>,
}

/// Response of `GET /routes`.
///
/// Driving and walking fill `legs`/`summary`; transit fills `itineraries`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDetailDto {
    pub legs: Option<Vec<LegDto>>,
    pub summary: Option<SummaryDto>,
    pub itineraries: Option<Vec<ItineraryDto>>,
}

/// A stop in a course request.
#[derive(Debug, Clone, Serialize)]
pub struct CourseStopDto {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Body of `POST /routes/course`.
#[derive(Debug, Clone, Serialize)]
pub struct CourseBody {
    pub stops: Vec<CourseStopDto>,
}

/// Response of `POST /routes/course`: one entry per stop pair.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseDto {
    #[serde(default)]
    pub legs: Vec<Option<LegDto>>,
}

/// Response of `GET /geocode`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeDto {
    #[serde(default)]
    pub results: Vec<PointDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_body_omits_missing_sensors() {
        let body = MerchantSearchBody {
            latitude: 37.5,
            longitude: 127.0,
            radius: 480,
            user_lat: 37.5,
            user_lng: 127.0,
            card_names: vec!["Travel".into()],
            gps_accuracy: None,
            staying_duration: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["radius"], 480);
        assert_eq!(json["cardNames"][0], "Travel");
        assert!(json.get("gpsAccuracy").is_none());
        assert!(json.get("stayingDuration").is_none());
    }

    #[test]
    fn route_detail_accepts_transit_shape() {
        let json = r#"{
            "itineraries": [{
                "legs": [{
                    "mode": "BUS", "distance": 1200.0, "duration": 420, "fare": 1500,
                    "polyline": "??", "start": {"lat": 37.5, "lng": 127.0},
                    "end": {"lat": 37.51, "lng": 127.0}
                }],
                "totalTime": 420, "totalFare": 1500, "transferCount": 0
            }]
        }"#;
        let dto: RouteDetailDto = serde_json::from_str(json).unwrap();
        assert!(dto.legs.is_none());
        assert_eq!(dto.itineraries.unwrap()[0].legs[0].mode, "BUS");
    }

    #[test]
    fn course_accepts_null_legs() {
        let json = r#"{"legs": [null]}"#;
        let dto: CourseDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.legs.len(), 1);
        assert!(dto.legs[0].is_none());
    }
}
