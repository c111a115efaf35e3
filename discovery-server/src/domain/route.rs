//! Route types.
//!
//! A `RouteLeg` is one mode-homogeneous segment of travel. Transit queries
//! return several `Itinerary` alternatives made of legs; driving and walking
//! queries return a single `DirectRoute`. A `Course` stitches legs between
//! consecutive user-selected stops and may contain gaps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::polyline::{self, DecodeError};

/// Mode of a single leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walk,
    Drive,
    Bus,
    Subway,
}

impl TravelMode {
    /// Returns true for modes that board a public transport vehicle.
    pub fn is_transit(&self) -> bool {
        matches!(self, TravelMode::Bus | TravelMode::Subway)
    }
}

/// Mode requested for a single start/end query (the drive/walk/transit tabs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    Drive,
    Walk,
    Transit,
}

impl RouteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMode::Drive => "drive",
            RouteMode::Walk => "walk",
            RouteMode::Transit => "transit",
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown route mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown route mode: {0}")]
pub struct InvalidRouteMode(pub String);

impl FromStr for RouteMode {
    type Err = InvalidRouteMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drive" | "car" => Ok(RouteMode::Drive),
            "walk" => Ok(RouteMode::Walk),
            "transit" | "public" => Ok(RouteMode::Transit),
            _ => Err(InvalidRouteMode(s.to_string())),
        }
    }
}

/// One mode-homogeneous segment of travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub mode: TravelMode,
    pub distance_meters: f64,
    pub duration_seconds: u32,
    /// Fare in won, for legs that charge one.
    pub fare: Option<u32>,
    /// Encoded polyline of the leg geometry.
    pub polyline: String,
    pub from: Coordinate,
    pub to: Coordinate,
}

impl RouteLeg {
    /// Decode the leg geometry for rendering.
    pub fn path(&self) -> Result<Vec<Coordinate>, DecodeError> {
        polyline::decode(&self.polyline)
    }
}

/// Totals for a driving or walking route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance_meters: f64,
    pub duration_seconds: u32,
    /// Tolls or fares in won, if any.
    pub fare: Option<u32>,
}

/// A single driving or walking route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectRoute {
    pub legs: Vec<RouteLeg>,
    pub summary: RouteSummary,
}

/// One complete transit alternative between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub legs: Vec<RouteLeg>,
    pub total_duration_seconds: u32,
    pub total_fare_won: u32,
    pub transfer_count: u32,
}

impl Itinerary {
    /// Build an itinerary whose totals are derived from its legs.
    ///
    /// Transfers count boardings after the first transit leg; walks
    /// never count. Totals saturate at `u32::MAX`.
    pub fn from_legs(legs: Vec<RouteLeg>) -> Self {
        let total_duration_seconds = saturating_total(legs.iter().map(|l| l.duration_seconds));
        let total_fare_won = saturating_total(legs.iter().filter_map(|l| l.fare));
        let boardings = legs.iter().filter(|l| l.mode.is_transit()).count() as u32;

        Self {
            legs,
            total_duration_seconds,
            total_fare_won,
            transfer_count: boardings.saturating_sub(1),
        }
    }
}

/// Result of a single start/end query.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    /// Driving or walking: exactly one route.
    Direct(DirectRoute),
    /// Transit: ranked alternatives.
    Transit(Vec<Itinerary>),
}

impl RouteResult {
    /// Returns true if the result holds no usable route.
    pub fn is_empty(&self) -> bool {
        match self {
            RouteResult::Direct(route) => route.legs.is_empty(),
            RouteResult::Transit(itineraries) => itineraries.is_empty(),
        }
    }
}

/// A named stop in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub location: Coordinate,
}

impl Stop {
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// An ordered multi-stop trip.
///
/// `legs[i]` connects `stops[i]` to `stops[i + 1]`; `None` marks a pair
/// for which no leg could be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub stops: Vec<Stop>,
    pub legs: Vec<Option<RouteLeg>>,
}

impl Course {
    /// Indices of stop pairs without a resolved leg.
    pub fn gaps(&self) -> Vec<usize> {
        self.legs
            .iter()
            .enumerate()
            .filter(|(_, leg)| leg.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns true if every pair has a leg.
    pub fn is_complete(&self) -> bool {
        self.legs.iter().all(Option::is_some)
    }

    /// Total duration of the resolved legs.
    pub fn resolved_duration_seconds(&self) -> u32 {
        saturating_total(self.legs.iter().flatten().map(|l| l.duration_seconds))
    }
}

/// Sum provider-reported quantities without wrapping.
pub fn saturating_total(values: impl IntoIterator<Item = u32>) -> u32 {
    values.into_iter().fold(0, u32::saturating_add)
}
