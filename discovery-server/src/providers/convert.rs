//! Conversion from backend DTOs to domain types.

use tracing::warn;

use crate::domain::{
    BenefitSummary, Coordinate, DirectRoute, Itinerary, MerchantCandidate, RouteLeg, RouteMode,
    RouteResult, RouteSummary, TravelMode, saturating_total,
};

use super::types::{
    BenefitDto, ItineraryDto, LegDto, MerchantDto, MerchantSearchDto, PointDto, RouteDetailDto,
};
use super::MerchantSearchResponse;

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Coordinate out of range
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Unknown leg mode string
    #[error("unknown travel mode: {0}")]
    UnknownMode(String),

    /// Benefit score below zero or not a number
    #[error("invalid benefit score: {0}")]
    InvalidScore(f64),

    /// Response lacked the part required for the requested mode
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Convert a merchant search response.
///
/// Candidates that fail validation are dropped with a warning rather than
/// failing the whole response.
pub fn convert_merchant_search(dto: MerchantSearchDto) -> MerchantSearchResponse {
    let mut candidates = Vec::with_capacity(dto.candidates.len());

    for merchant in dto.candidates {
        let name = merchant.name.clone();
        match convert_merchant(merchant) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => warn!(merchant = %name, error = %e, "skipping invalid merchant"),
        }
    }

    MerchantSearchResponse {
        candidates,
        is_indoor: dto.is_indoor,
        building_name: dto.building_name,
    }
}

fn convert_merchant(dto: MerchantDto) -> Result<MerchantCandidate, ConversionError> {
    let location = convert_point(PointDto {
        lat: dto.latitude,
        lng: dto.longitude,
    })?;
    let top_benefit = dto.top_benefit.map(convert_benefit).transpose()?;

    Ok(MerchantCandidate {
        place_id: dto.place_id,
        name: dto.name,
        category: dto.category,
        address: dto.address,
        location,
        distance_meters: dto.distance.unwrap_or(0.0),
        top_benefit,
    })
}

fn convert_benefit(dto: BenefitDto) -> Result<BenefitSummary, ConversionError> {
    if !dto.score.is_finite() || dto.score < 0.0 {
        return Err(ConversionError::InvalidScore(dto.score));
    }
    Ok(BenefitSummary {
        card_name: dto.card_name,
        score: dto.score,
        benefit_text: dto.benefit_text,
    })
}

pub fn convert_point(dto: PointDto) -> Result<Coordinate, ConversionError> {
    Coordinate::new(dto.lat, dto.lng).map_err(|e| ConversionError::InvalidCoordinate(e.to_string()))
}

/// Parse a backend mode string.
pub fn parse_travel_mode(mode: &str) -> Result<TravelMode, ConversionError> {
    match mode.to_ascii_uppercase().as_str() {
        "WALK" | "WALKING" => Ok(TravelMode::Walk),
        "CAR" | "DRIVE" | "DRIVING" => Ok(TravelMode::Drive),
        "BUS" => Ok(TravelMode::Bus),
        "SUBWAY" | "METRO" => Ok(TravelMode::Subway),
        _ => Err(ConversionError::UnknownMode(mode.to_string())),
    }
}

pub fn convert_leg(dto: LegDto) -> Result<RouteLeg, ConversionError> {
    Ok(RouteLeg {
        mode: parse_travel_mode(&dto.mode)?,
        distance_meters: dto.distance,
        duration_seconds: dto.duration,
        fare: dto.fare,
        polyline: dto.polyline,
        from: convert_point(dto.start)?,
        to: convert_point(dto.end)?,
    })
}

fn convert_itinerary(dto: ItineraryDto) -> Result<Itinerary, ConversionError> {
    let legs = dto
        .legs
        .into_iter()
        .map(convert_leg)
        .collect::<Result<Vec<_>, _>>()?;

    // Fill any totals the backend left out from the legs themselves.
    let derived = Itinerary::from_legs(legs);
    Ok(Itinerary {
        total_duration_seconds: dto.total_time.unwrap_or(derived.total_duration_seconds),
        total_fare_won: dto.total_fare.unwrap_or(derived.total_fare_won),
        transfer_count: dto.transfer_count.unwrap_or(derived.transfer_count),
        legs: derived.legs,
    })
}

/// Convert a route detail response for the requested mode.
pub fn convert_route_detail(
    dto: RouteDetailDto,
    mode: RouteMode,
) -> Result<RouteResult, ConversionError> {
    match mode {
        RouteMode::Transit => {
            let itineraries = dto
                .itineraries
                .ok_or(ConversionError::MissingField("itineraries"))?
                .into_iter()
                .map(convert_itinerary)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RouteResult::Transit(itineraries))
        }
        RouteMode::Drive | RouteMode::Walk => {
            let legs = dto
                .legs
                .ok_or(ConversionError::MissingField("legs"))?
                .into_iter()
                .map(convert_leg)
                .collect::<Result<Vec<_>, _>>()?;

            let summary = match dto.summary {
                Some(s) => RouteSummary {
                    distance_meters: s.distance,
                    duration_seconds: s.duration,
                    fare: s.fare,
                },
                None => RouteSummary {
                    distance_meters: legs.iter().map(|l| l.distance_meters).sum(),
                    duration_seconds: saturating_total(legs.iter().map(|l| l.duration_seconds)),
                    fare: None,
                },
            };

            Ok(RouteResult::Direct(DirectRoute { legs, summary }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::SummaryDto;

    fn leg_dto(mode: &str, duration: u32, fare: Option<u32>) -> LegDto {
        LegDto {
            mode: mode.to_string(),
            distance: 500.0,
            duration,
            fare,
            polyline: String::new(),
            start: PointDto {
                lat: 37.5,
                lng: 127.0,
            },
            end: PointDto {
                lat: 37.505,
                lng: 127.0,
            },
        }
    }

    fn merchant_dto(name: &str, lat: f64, score: Option<f64>) -> MerchantDto {
        MerchantDto {
            place_id: Some(format!("p-{name}")),
            name: name.to_string(),
            category: "cafe".to_string(),
            address: "addr".to_string(),
            latitude: lat,
            longitude: 127.0,
            distance: Some(42.0),
            top_benefit: score.map(|s| BenefitDto {
                card_name: "Card".to_string(),
                score: s,
                benefit_text: "10% off".to_string(),
            }),
        }
    }

    #[test]
    fn merchant_search_skips_invalid_candidates() {
        let dto = MerchantSearchDto {
            candidates: vec![
                merchant_dto("ok", 37.5, Some(3.0)),
                merchant_dto("bad-lat", 95.0, None),
                merchant_dto("bad-score", 37.5, Some(-1.0)),
                merchant_dto("no-benefit", 37.5, None),
            ],
            is_indoor: true,
            building_name: Some("Tower".to_string()),
        };

        let response = convert_merchant_search(dto);
        let names: Vec<_> = response.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ok", "no-benefit"]);
        assert!(response.is_indoor);
        assert_eq!(response.building_name.as_deref(), Some("Tower"));
        assert_eq!(response.candidates[0].distance_meters, 42.0);
    }

    #[test]
    fn parse_modes() {
        assert_eq!(parse_travel_mode("WALK").unwrap(), TravelMode::Walk);
        assert_eq!(parse_travel_mode("car").unwrap(), TravelMode::Drive);
        assert_eq!(parse_travel_mode("Bus").unwrap(), TravelMode::Bus);
        assert_eq!(parse_travel_mode("METRO").unwrap(), TravelMode::Subway);
        assert!(parse_travel_mode("FERRY").is_err());
    }

    #[test]
    fn transit_totals_are_derived_when_missing() {
        let dto = RouteDetailDto {
            legs: None,
            summary: None,
            itineraries: Some(vec![ItineraryDto {
                legs: vec![
                    leg_dto("WALK", 60, None),
                    leg_dto("BUS", 600, Some(1500)),
                    leg_dto("SUBWAY", 300, Some(200)),
                ],
                total_time: None,
                total_fare: Some(1600),
                transfer_count: None,
            }]),
        };

        let RouteResult::Transit(itineraries) =
            convert_route_detail(dto, RouteMode::Transit).unwrap()
        else {
            panic!("expected transit result");
        };
        assert_eq!(itineraries[0].total_duration_seconds, 960);
        assert_eq!(itineraries[0].total_fare_won, 1600);
        assert_eq!(itineraries[0].transfer_count, 1);
    }

    #[test]
    fn direct_route_uses_summary() {
        let dto = RouteDetailDto {
            legs: Some(vec![leg_dto("CAR", 900, None)]),
            summary: Some(SummaryDto {
                distance: 7000.0,
                duration: 900,
                fare: Some(1100),
            }),
            itineraries: None,
        };

        let RouteResult::Direct(route) = convert_route_detail(dto, RouteMode::Drive).unwrap()
        else {
            panic!("expected direct result");
        };
        assert_eq!(route.legs.len(), 1);
        assert_eq!(route.summary.fare, Some(1100));
    }

    #[test]
    fn derived_totals_do_not_wrap() {
        let dto = RouteDetailDto {
            legs: Some(vec![leg_dto("WALK", u32::MAX, None), leg_dto("WALK", 10, None)]),
            summary: None,
            itineraries: Some(vec![ItineraryDto {
                legs: vec![leg_dto("BUS", u32::MAX, Some(1500)), leg_dto("BUS", 10, None)],
                total_time: None,
                total_fare: None,
                transfer_count: None,
            }]),
        };

        let RouteResult::Direct(route) =
            convert_route_detail(dto.clone(), RouteMode::Walk).unwrap()
        else {
            panic!("expected direct result");
        };
        assert_eq!(route.summary.duration_seconds, u32::MAX);

        let RouteResult::Transit(itineraries) =
            convert_route_detail(dto, RouteMode::Transit).unwrap()
        else {
            panic!("expected transit result");
        };
        assert_eq!(itineraries[0].total_duration_seconds, u32::MAX);
    }

    #[test]
    fn missing_shape_for_mode_is_an_error() {
        let dto = RouteDetailDto {
            legs: Some(vec![]),
            summary: None,
            itineraries: None,
        };
        assert!(matches!(
            convert_route_detail(dto, RouteMode::Transit),
            Err(ConversionError::MissingField("itineraries"))
        ));
    }
}
