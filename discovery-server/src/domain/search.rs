//! Discovery request types.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// The map viewport after a pan or zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub center: Coordinate,
    pub zoom: f64,
}

/// Latest device readings used to describe the user's surroundings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReadings {
    /// Reported horizontal accuracy of the last GPS fix, if known.
    pub gps_accuracy_meters: Option<f64>,
    /// Seconds the user has stayed within the stay threshold.
    pub staying_duration_seconds: u64,
}

/// One location update, as consumed by the stay tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaySample {
    pub location: Coordinate,
    pub timestamp_millis: i64,
}

/// Everything needed to issue one nearby-merchant search.
///
/// Built fresh per search and never mutated afterwards; see
/// [`crate::discovery::IndoorClassifier::build_context`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    pub query_center: Coordinate,
    pub radius_meters: u32,
    /// Where the user actually is, when different from the viewport center.
    pub user_location: Option<Coordinate>,
    pub gps_accuracy_meters: Option<f64>,
    pub staying_duration_seconds: u64,
    pub force_indoor: bool,
}

impl SearchContext {
    /// The location distances are measured from: the user if known,
    /// otherwise the viewport center.
    pub fn origin(&self) -> Coordinate {
        self.user_location.unwrap_or(self.query_center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_prefers_user_location() {
        let center = Coordinate::new(37.5, 127.0).unwrap();
        let user = Coordinate::new(37.51, 127.01).unwrap();

        let mut ctx = SearchContext {
            query_center: center,
            radius_meters: 480,
            user_location: None,
            gps_accuracy_meters: None,
            staying_duration_seconds: 0,
            force_indoor: false,
        };
        assert_eq!(ctx.origin(), center);

        ctx.user_location = Some(user);
        assert_eq!(ctx.origin(), user);
    }
}
