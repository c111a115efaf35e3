//! Indoor/outdoor signals for nearby searches.
//!
//! The merchant provider makes the authoritative indoor decision. This
//! module assembles the signals it receives (GPS accuracy and stay
//! duration) and offers a local preview of the same rule.
//!
//! A force-indoor override replaces the real readings with synthetic values
//! that are guaranteed to classify as indoor. Turning the override off
//! builds contexts from the real readings again; nothing is retained.

use crate::domain::{Coordinate, SearchContext, SensorReadings};

/// GPS accuracy (meters) at or above which a fix is considered degraded.
pub const INDOOR_ACCURACY_THRESHOLD_M: f64 = 15.0;

/// Stay duration (seconds) at or above which the user is considered settled.
pub const INDOOR_STAY_THRESHOLD_SECS: u64 = 180;

/// Accuracy sent while the override is active.
pub const FORCED_GPS_ACCURACY_M: f64 = 50.0;

/// Stay duration sent while the override is active.
pub const FORCED_STAYING_SECS: u64 = 300;

/// Whether indoor mode is forced for a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndoorOverride {
    /// Use real sensor readings.
    #[default]
    Off,
    /// Send synthetic readings that force indoor behaviour downstream.
    ForceIndoor,
}

impl From<bool> for IndoorOverride {
    fn from(force: bool) -> Self {
        if force {
            IndoorOverride::ForceIndoor
        } else {
            IndoorOverride::Off
        }
    }
}

/// Builds search contexts and previews the indoor decision.
pub struct IndoorClassifier;

impl IndoorClassifier {
    /// Assemble an immutable search context.
    pub fn build_context(
        query_center: Coordinate,
        radius_meters: u32,
        user_location: Option<Coordinate>,
        readings: SensorReadings,
        indoor_override: IndoorOverride,
    ) -> SearchContext {
        let (gps_accuracy_meters, staying_duration_seconds, force_indoor) = match indoor_override
        {
            IndoorOverride::Off => (
                readings.gps_accuracy_meters,
                readings.staying_duration_seconds,
                false,
            ),
            IndoorOverride::ForceIndoor => (Some(FORCED_GPS_ACCURACY_M), FORCED_STAYING_SECS, true),
        };

        SearchContext {
            query_center,
            radius_meters,
            user_location,
            gps_accuracy_meters,
            staying_duration_seconds,
            force_indoor,
        }
    }

    /// Local preview of the indoor rule: a degraded fix held for a while.
    pub fn classify(ctx: &SearchContext) -> bool {
        if ctx.force_indoor {
            return true;
        }

        let degraded = ctx
            .gps_accuracy_meters
            .is_some_and(|acc| acc >= INDOOR_ACCURACY_THRESHOLD_M);

        degraded && ctx.staying_duration_seconds >= INDOOR_STAY_THRESHOLD_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> Coordinate {
        Coordinate::new(37.5665, 126.978).unwrap()
    }

    fn readings(acc: Option<f64>, stay: u64) -> SensorReadings {
        SensorReadings {
            gps_accuracy_meters: acc,
            staying_duration_seconds: stay,
        }
    }

    #[test]
    fn real_readings_pass_through() {
        let ctx = IndoorClassifier::build_context(
            center(),
            480,
            None,
            readings(Some(8.0), 20),
            IndoorOverride::Off,
        );

        assert_eq!(ctx.gps_accuracy_meters, Some(8.0));
        assert_eq!(ctx.staying_duration_seconds, 20);
        assert!(!ctx.force_indoor);
        assert!(!IndoorClassifier::classify(&ctx));
    }

    #[test]
    fn degraded_fix_and_long_stay_is_indoor() {
        let ctx = IndoorClassifier::build_context(
            center(),
            480,
            None,
            readings(Some(15.0), 180),
            IndoorOverride::Off,
        );
        assert!(IndoorClassifier::classify(&ctx));
    }

    #[test]
    fn either_signal_alone_is_outdoor() {
        let short_stay = IndoorClassifier::build_context(
            center(),
            480,
            None,
            readings(Some(40.0), 179),
            IndoorOverride::Off,
        );
        assert!(!IndoorClassifier::classify(&short_stay));

        let good_fix = IndoorClassifier::build_context(
            center(),
            480,
            None,
            readings(Some(14.9), 600),
            IndoorOverride::Off,
        );
        assert!(!IndoorClassifier::classify(&good_fix));

        let unknown_fix = IndoorClassifier::build_context(
            center(),
            480,
            None,
            readings(None, 600),
            IndoorOverride::Off,
        );
        assert!(!IndoorClassifier::classify(&unknown_fix));
    }

    #[test]
    fn override_replaces_readings() {
        let ctx = IndoorClassifier::build_context(
            center(),
            480,
            None,
            readings(Some(3.0), 0),
            IndoorOverride::ForceIndoor,
        );

        assert!(ctx.force_indoor);
        assert!(ctx.gps_accuracy_meters.unwrap() >= INDOOR_ACCURACY_THRESHOLD_M);
        assert!(ctx.staying_duration_seconds >= INDOOR_STAY_THRESHOLD_SECS);
        assert!(IndoorClassifier::classify(&ctx));
    }

    #[test]
    fn toggling_override_off_restores_real_readings() {
        let real = readings(Some(5.0), 12);

        let forced =
            IndoorClassifier::build_context(center(), 480, None, real, IndoorOverride::from(true));
        let restored =
            IndoorClassifier::build_context(center(), 480, None, real, IndoorOverride::from(false));

        assert!(forced.force_indoor);
        assert_eq!(restored.gps_accuracy_meters, Some(5.0));
        assert_eq!(restored.staying_duration_seconds, 12);
        assert!(!restored.force_indoor);
    }
}
