//! Handler tests against the bundled mock data.

use super::*;
use crate::cache::CacheConfig;
use crate::discovery::{DiscoveryConfig, SessionRegistry};
use crate::domain::{BenefitTier, NearbyResult, TravelMode};
use crate::providers::{Backend, BackendClient, BackendConfig, MockBackend};
use crate::routing::RouteConfig;
use std::time::Duration;

const MOCK_DIR: &str = "data/mock";

const CITY_HALL: (f64, f64) = (37.5665, 126.978);
const GANGNAM: (f64, f64) = (37.4979, 127.0276);
const BUSAN: (f64, f64) = (35.1796, 129.0756);

fn state_with(backend: Backend, allow_force_indoor: bool) -> AppState {
    AppState::new(
        backend,
        DiscoveryConfig::default().with_force_indoor(allow_force_indoor),
        RouteConfig::default(),
        &CacheConfig::default(),
        SessionRegistry::new(Duration::from_secs(60)),
    )
}

fn mock_state(allow_force_indoor: bool) -> AppState {
    let backend = MockBackend::new(MOCK_DIR).unwrap();
    state_with(Backend::Mock(backend), allow_force_indoor)
}

fn nearby_request(session_id: &str, cards: &[&str]) -> NearbyRequest {
    NearbyRequest {
        session_id: session_id.to_string(),
        camera: CameraRequest {
            latitude: CITY_HALL.0,
            longitude: CITY_HALL.1,
            zoom: 16.0,
        },
        card_names: cards.iter().map(|c| c.to_string()).collect(),
        user_latitude: None,
        user_longitude: None,
        force_indoor: false,
    }
}

fn location_request(session_id: &str, accuracy: f64, timestamp_millis: i64) -> LocationUpdateRequest {
    LocationUpdateRequest {
        session_id: session_id.to_string(),
        latitude: CITY_HALL.0,
        longitude: CITY_HALL.1,
        gps_accuracy: Some(accuracy),
        timestamp_millis: Some(timestamp_millis),
    }
}

fn leg_query(end: (f64, f64), mode: &str, selected: Option<usize>) -> RouteLegQuery {
    RouteLegQuery {
        start_lat: CITY_HALL.0,
        start_lng: CITY_HALL.1,
        end_lat: end.0,
        end_lng: end.1,
        mode: mode.to_string(),
        selected,
    }
}

fn stop(name: &str, at: (f64, f64)) -> StopRequest {
    StopRequest {
        name: name.to_string(),
        latitude: at.0,
        longitude: at.1,
    }
}

#[tokio::test]
async fn health_is_ok() {
    assert_eq!(health().await, "ok");
}

#[tokio::test]
async fn location_updates_accumulate_stay() {
    let state = mock_state(false);

    let first = update_location(State(state.clone()), Json(location_request("s1", 25.0, 0)))
        .await
        .unwrap();
    assert_eq!(first.0.staying_duration_seconds, 0);
    assert!(!first.0.likely_indoor);

    let second = update_location(
        State(state.clone()),
        Json(location_request("s1", 25.0, 200_000)),
    )
    .await
    .unwrap();
    assert_eq!(second.0.staying_duration_seconds, 200);
    assert!(second.0.likely_indoor);
}

#[tokio::test]
async fn location_update_rejects_bad_input() {
    let state = mock_state(false);

    let mut req = location_request("s1", 10.0, 0);
    req.latitude = 91.0;
    assert!(matches!(
        update_location(State(state.clone()), Json(req)).await,
        Err(AppError::BadRequest { .. })
    ));

    let req = location_request("", 10.0, 0);
    assert!(matches!(
        update_location(State(state.clone()), Json(req)).await,
        Err(AppError::BadRequest { .. })
    ));

    let req = location_request("s1", -3.0, 0);
    assert!(matches!(
        update_location(State(state), Json(req)).await,
        Err(AppError::BadRequest { .. })
    ));
}

#[tokio::test]
async fn nearby_returns_tiered_merchants() {
    let state = mock_state(false);

    let response = find_nearby(
        State(state),
        Json(nearby_request("s1", &["Dining Card", "Travel Card"])),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(response.radius_meters, 480);
    assert!(!response.stale);
    assert!(!response.is_indoor);
    assert_eq!(response.generation, 1);
    assert_eq!(response.merchants.len(), 7);

    let first = &response.merchants[0];
    assert_eq!(first.place_id.as_deref(), Some("sogong-hotel"));
    assert_eq!(first.tier, BenefitTier::High);

    // Merchants without an owned-card benefit sort last and tier low.
    let last = response.merchants.last().unwrap();
    assert!(last.benefit.is_none());
    assert_eq!(last.tier, BenefitTier::Low);
}

#[tokio::test]
async fn nearby_uses_session_sensors_for_indoor() {
    let state = mock_state(false);

    update_location(State(state.clone()), Json(location_request("s1", 30.0, 0)))
        .await
        .unwrap();
    update_location(
        State(state.clone()),
        Json(location_request("s1", 30.0, 240_000)),
    )
    .await
    .unwrap();

    let response = find_nearby(State(state), Json(nearby_request("s1", &[])))
        .await
        .unwrap()
        .0;

    assert!(response.is_indoor);
    assert_eq!(response.building_name.as_deref(), Some("Seoul Plaza Tower"));
}

#[tokio::test]
async fn force_indoor_requires_server_opt_in() {
    let mut req = nearby_request("s1", &[]);
    req.force_indoor = true;
    assert!(matches!(
        find_nearby(State(mock_state(false)), Json(req)).await,
        Err(AppError::BadRequest { .. })
    ));

    let mut req = nearby_request("s1", &[]);
    req.force_indoor = true;
    let response = find_nearby(State(mock_state(true)), Json(req))
        .await
        .unwrap()
        .0;
    assert!(response.is_indoor);
}

#[tokio::test]
async fn nearby_rejects_half_user_location() {
    let mut req = nearby_request("s1", &[]);
    req.user_latitude = Some(37.5);

    assert!(matches!(
        find_nearby(State(mock_state(false)), Json(req)).await,
        Err(AppError::BadRequest { .. })
    ));
}

#[tokio::test]
async fn nearby_failure_keeps_last_good_results() {
    // Nothing listens on the discard port, so every search fails.
    let config = BackendConfig::new("key")
        .with_base_url("http://127.0.0.1:9/api/v1")
        .with_timeout(2);
    let backend = Backend::Http(BackendClient::new(config).unwrap());
    let state = state_with(backend, false);

    let first = find_nearby(State(state.clone()), Json(nearby_request("s1", &[]))).await;
    assert!(matches!(first, Err(AppError::BadGateway { .. })));

    let session = state.sessions.get_or_create("s1").await;
    session
        .remember(NearbyResult {
            merchants: vec![],
            is_indoor: true,
            building_name: Some("Kept".to_string()),
            generation: 1,
        })
        .await;

    let response = find_nearby(State(state), Json(nearby_request("s1", &[])))
        .await
        .unwrap()
        .0;
    assert!(response.stale);
    assert!(response.error.is_some());
    assert_eq!(response.building_name.as_deref(), Some("Kept"));
}

#[tokio::test]
async fn place_details_lookup() {
    let state = mock_state(false);

    let details = place_details(State(state.clone()), Path("plaza-cafe".to_string()))
        .await
        .unwrap()
        .0;
    assert_eq!(details.name, "Plaza Cafe");
    assert_eq!(details.rating, Some(4.3));

    assert!(matches!(
        place_details(State(state), Path("nope".to_string())).await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn transit_leg_is_ranked_and_selectable() {
    let state = mock_state(false);

    let response = route_leg(State(state.clone()), Query(leg_query(GANGNAM, "transit", None)))
        .await
        .unwrap()
        .0;
    assert_eq!(response.selected, Some(0));
    let itineraries = response.itineraries.unwrap();
    assert_eq!(itineraries.len(), 2);
    assert!(itineraries[0].total_duration_seconds <= itineraries[1].total_duration_seconds);
    assert!(!itineraries[0].legs[0].path.as_ref().unwrap().is_empty());

    let response = route_leg(State(state.clone()), Query(leg_query(GANGNAM, "transit", Some(1))))
        .await
        .unwrap()
        .0;
    assert_eq!(response.selected, Some(1));

    assert!(matches!(
        route_leg(State(state), Query(leg_query(GANGNAM, "transit", Some(5)))).await,
        Err(AppError::BadRequest { .. })
    ));
}

#[tokio::test]
async fn direct_leg_and_errors() {
    let state = mock_state(false);

    let response = route_leg(State(state.clone()), Query(leg_query(GANGNAM, "drive", None)))
        .await
        .unwrap()
        .0;
    let route = response.route.unwrap();
    assert_eq!(route.legs[0].mode, TravelMode::Drive);
    assert!(response.itineraries.is_none());

    assert!(matches!(
        route_leg(State(state.clone()), Query(leg_query(GANGNAM, "boat", None))).await,
        Err(AppError::BadRequest { .. })
    ));

    assert!(matches!(
        route_leg(State(state), Query(leg_query(CITY_HALL, "walk", None))).await,
        Err(AppError::NotFound { .. })
    ));
}

#[tokio::test]
async fn course_with_unreachable_stop_has_gap() {
    let state = mock_state(false);
    let req = CourseRequest {
        stops: vec![
            stop("City Hall", CITY_HALL),
            stop("Plaza Cafe", (37.5666, 126.978)),
            stop("Gangnam", GANGNAM),
            stop("Busan", BUSAN),
        ],
    };

    let response = compose_course(State(state), Json(req)).await.unwrap().0;

    assert_eq!(response.legs.len(), 3);
    assert_eq!(response.legs[0].as_ref().unwrap().mode, TravelMode::Walk);
    assert_eq!(response.legs[1].as_ref().unwrap().mode, TravelMode::Subway);
    assert!(response.legs[2].is_none());
    assert_eq!(response.gaps, vec![2]);
    assert!(!response.complete);
}

#[tokio::test]
async fn course_needs_two_stops() {
    let req = CourseRequest {
        stops: vec![stop("City Hall", CITY_HALL)],
    };
    assert!(matches!(
        compose_course(State(mock_state(false)), Json(req)).await,
        Err(AppError::BadRequest { .. })
    ));
}

#[tokio::test]
async fn geocode_lookup() {
    let state = mock_state(false);

    let response = geocode(
        State(state.clone()),
        Query(GeocodeQuery {
            address: "seoul city hall".to_string(),
        }),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(response.location.latitude, CITY_HALL.0);

    assert!(matches!(
        geocode(
            State(state.clone()),
            Query(GeocodeQuery {
                address: "Atlantis".to_string(),
            }),
        )
        .await,
        Err(AppError::NotFound { .. })
    ));

    assert!(matches!(
        geocode(
            State(state),
            Query(GeocodeQuery {
                address: "  ".to_string(),
            }),
        )
        .await,
        Err(AppError::BadRequest { .. })
    ));
}
