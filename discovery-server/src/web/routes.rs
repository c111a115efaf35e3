//! HTTP route handlers.

use std::collections::BTreeSet;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::discovery::{DiscoveryError, IndoorClassifier, IndoorOverride, estimate_radius};
use crate::domain::{
    Coordinate, InvalidCoordinate, InvalidRouteMode, PlaceDetails, RouteMode, RouteResult, Stop,
};
use crate::geocode::{GeocodeError, resolve_address};
use crate::providers::{PlaceDetailsProvider, ProviderError};
use crate::routing::{ItinerarySelection, RouteError};

use super::dto::*;
use super::state::AppState;

/// Longest accepted session identifier.
const MAX_SESSION_ID_LEN: usize = 128;

/// Most stops accepted in one course.
const MAX_COURSE_STOPS: usize = 25;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/discovery/location", post(update_location))
        .route("/discovery/nearby", post(find_nearby))
        .route("/places/:place_id", get(place_details))
        .route("/route/leg", get(route_leg))
        .route("/route/course", post(compose_course))
        .route("/geocode", get(geocode))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn validate_session_id(session_id: &str) -> Result<(), AppError> {
    if session_id.is_empty() || session_id.len() > MAX_SESSION_ID_LEN {
        return Err(AppError::BadRequest {
            message: format!("session_id must be 1 to {MAX_SESSION_ID_LEN} characters"),
        });
    }
    Ok(())
}

/// Record a location fix for a session.
async fn update_location(
    State(state): State<AppState>,
    Json(req): Json<LocationUpdateRequest>,
) -> Result<Json<LocationUpdateResponse>, AppError> {
    validate_session_id(&req.session_id)?;
    let location = Coordinate::new(req.latitude, req.longitude)?;
    if req.gps_accuracy.is_some_and(|acc| !acc.is_finite() || acc < 0.0) {
        return Err(AppError::BadRequest {
            message: "gps_accuracy must be a non-negative number".to_string(),
        });
    }

    let now_millis = req
        .timestamp_millis
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    let session = state.sessions.get_or_create(&req.session_id).await;
    let readings = session
        .record_location(location, req.gps_accuracy, now_millis)
        .await;

    let preview =
        IndoorClassifier::build_context(location, 0, Some(location), readings, IndoorOverride::Off);

    Ok(Json(LocationUpdateResponse {
        staying_duration_seconds: readings.staying_duration_seconds,
        gps_accuracy: readings.gps_accuracy_meters,
        likely_indoor: IndoorClassifier::classify(&preview),
    }))
}

/// Search merchants around the map viewport.
///
/// When the search fails, the session's last successful results are
/// returned flagged as stale.
async fn find_nearby(
    State(state): State<AppState>,
    Json(req): Json<NearbyRequest>,
) -> Result<Json<NearbyResponse>, AppError> {
    validate_session_id(&req.session_id)?;

    if req.force_indoor && !state.discovery.config().allow_force_indoor {
        return Err(AppError::BadRequest {
            message: "force_indoor is disabled on this server".to_string(),
        });
    }

    let camera = req.camera.to_camera()?;
    let radius = estimate_radius(camera.zoom);

    let explicit_user = match (req.user_latitude, req.user_longitude) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)?),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest {
                message: "user_latitude and user_longitude must be given together".to_string(),
            });
        }
    };

    let session = state.sessions.get_or_create(&req.session_id).await;
    let user_location = match explicit_user {
        Some(location) => Some(location),
        None => session.user_location().await,
    };
    let readings = session.readings().await;

    let ctx = IndoorClassifier::build_context(
        camera.center,
        radius,
        user_location,
        readings,
        IndoorOverride::from(req.force_indoor),
    );
    let cards: BTreeSet<String> = req.card_names.into_iter().collect();

    match state
        .discovery
        .find_nearby_latest(&ctx, &cards, session.generation())
        .await
    {
        Ok(result) => {
            let response = NearbyResponse::fresh(radius, &result);
            session.remember(result).await;
            Ok(Json(response))
        }
        Err(DiscoveryError::InvalidRequest(message)) => Err(AppError::BadRequest { message }),
        Err(e) => {
            let last_good = session.last_good().await;
            let superseded = matches!(e, DiscoveryError::Superseded { .. });
            if last_good.is_none() && !superseded {
                return Err(e.into());
            }

            if superseded {
                debug!(session = %req.session_id, error = %e, "search superseded");
            } else {
                warn!(session = %req.session_id, error = %e, "search failed, keeping last results");
            }
            Ok(Json(NearbyResponse::stale(
                radius,
                last_good.as_ref(),
                e.to_string(),
            )))
        }
    }
}

/// Display details for one place.
async fn place_details(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<PlaceDetails>, AppError> {
    match state.backend.details(&place_id).await {
        Ok(details) => Ok(Json(details)),
        Err(ProviderError::NotFound) => Err(AppError::NotFound {
            message: format!("place not found: {place_id}"),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Route alternatives between two points for one mode.
async fn route_leg(
    State(state): State<AppState>,
    Query(query): Query<RouteLegQuery>,
) -> Result<Json<RouteLegResponse>, AppError> {
    let mode: RouteMode = query.mode.parse().map_err(|e: InvalidRouteMode| {
        AppError::BadRequest {
            message: e.to_string(),
        }
    })?;
    let start = Coordinate::new(query.start_lat, query.start_lng)?;
    let end = Coordinate::new(query.end_lat, query.end_lng)?;

    let result = state
        .composer
        .fetch_leg_alternatives(start, end, mode)
        .await?;

    let response = match result.as_ref() {
        RouteResult::Direct(route) => RouteLegResponse::direct(mode.to_string(), route),
        RouteResult::Transit(itineraries) => {
            let mut selection = ItinerarySelection::from_ranked(itineraries.clone());
            if let Some(index) = query.selected {
                selection.select(index).map_err(|e| AppError::BadRequest {
                    message: e.to_string(),
                })?;
            }
            RouteLegResponse::transit(mode.to_string(), &selection)
        }
    };

    Ok(Json(response))
}

/// Compose a course through the given stops.
async fn compose_course(
    State(state): State<AppState>,
    Json(req): Json<CourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    if req.stops.len() < 2 || req.stops.len() > MAX_COURSE_STOPS {
        return Err(AppError::BadRequest {
            message: format!("a course needs 2 to {MAX_COURSE_STOPS} stops"),
        });
    }

    let stops = req
        .stops
        .into_iter()
        .map(|s| -> Result<Stop, AppError> {
            Ok(Stop::new(s.name, Coordinate::new(s.latitude, s.longitude)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let course = state.composer.compose_course(&stops).await;

    Ok(Json(CourseResponse::from_course(&course)))
}

/// Resolve an address to a coordinate.
async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, AppError> {
    let location = resolve_address(state.backend.as_ref(), &query.address).await?;

    Ok(Json(GeocodeResponse {
        address: query.address.trim().to_string(),
        location: location.into(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<InvalidCoordinate> for AppError {
    fn from(e: InvalidCoordinate) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::NotFound => AppError::NotFound {
                message: e.to_string(),
            },
            ProviderError::Unauthorized | ProviderError::MockData(_) => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl From<DiscoveryError> for AppError {
    fn from(e: DiscoveryError) -> Self {
        match e {
            DiscoveryError::Provider(e) => e.into(),
            DiscoveryError::InvalidRequest(message) => AppError::BadRequest { message },
            DiscoveryError::Superseded { .. } => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::RouteUnavailable { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            RouteError::Provider(e) => e.into(),
        }
    }
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        match e {
            GeocodeError::EmptyAddress => AppError::BadRequest {
                message: e.to_string(),
            },
            GeocodeError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            GeocodeError::Provider(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
