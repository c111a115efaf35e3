//! Location-aware merchant discovery and multi-modal routing server.
//!
//! Finds card-benefit merchants around a map viewport, adapting the search
//! to zoom level and indoor signals, and composes drive, walk and transit
//! routes between the places a user picks.

pub mod cache;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod geocode;
pub mod polyline;
pub mod providers;
pub mod routing;
pub mod web;
