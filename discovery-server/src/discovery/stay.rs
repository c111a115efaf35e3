//! Stationary-user detection.
//!
//! The tracker keeps an anchor sample. While successive locations remain
//! within the stay threshold of the anchor, the stay duration grows with
//! the time elapsed since the anchor was recorded. Moving beyond the
//! threshold re-anchors at the new location and resets the duration.

use crate::domain::{Coordinate, StaySample};

/// Movement below this distance (meters) counts as staying put.
pub const STAY_THRESHOLD_M: f64 = 10.0;

/// Rolling stay state for one session.
///
/// Not thread-safe on its own; sessions keep it behind a mutex so updates
/// are applied one at a time in arrival order.
#[derive(Debug, Clone)]
pub struct StayStateTracker {
    anchor: Option<StaySample>,
    staying_duration_seconds: u64,
    threshold_m: f64,
}

impl Default for StayStateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StayStateTracker {
    pub fn new() -> Self {
        Self::with_threshold(STAY_THRESHOLD_M)
    }

    /// Create a tracker with a custom stay threshold in meters.
    pub fn with_threshold(threshold_m: f64) -> Self {
        Self {
            anchor: None,
            staying_duration_seconds: 0,
            threshold_m,
        }
    }

    /// Record a location update and return the stay duration in seconds.
    ///
    /// The first update only records the anchor and returns 0. A timestamp
    /// earlier than the anchor contributes no time.
    pub fn update(&mut self, current: Coordinate, now_millis: i64) -> u64 {
        let sample = StaySample {
            location: current,
            timestamp_millis: now_millis,
        };

        let Some(anchor) = self.anchor else {
            self.anchor = Some(sample);
            self.staying_duration_seconds = 0;
            return 0;
        };

        let moved = anchor.location.haversine_distance(&current);
        if moved < self.threshold_m {
            let elapsed_millis = now_millis.saturating_sub(anchor.timestamp_millis).max(0);
            self.staying_duration_seconds = (elapsed_millis / 1000) as u64;
        } else {
            self.anchor = Some(sample);
            self.staying_duration_seconds = 0;
        }

        self.staying_duration_seconds
    }

    /// Stay duration after the most recent update.
    pub fn staying_duration_seconds(&self) -> u64 {
        self.staying_duration_seconds
    }

    /// The sample the current stay is measured from.
    pub fn anchor(&self) -> Option<StaySample> {
        self.anchor
    }

    /// Forget all state, as if no update had been seen.
    pub fn reset(&mut self) {
        self.anchor = None;
        self.staying_duration_seconds = 0;
    }
}
