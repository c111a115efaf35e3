//! Web layer for the discovery server.
//!
//! Provides HTTP endpoints for location updates, nearby merchant search,
//! place details, routing and geocoding.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
