//! Per-session discovery state.
//!
//! A session owns the stay tracker, the latest sensor readings, the search
//! generation counter, and the last result set that was successfully shown.
//! Location updates take the session lock, so the tracker sees them one at
//! a time in arrival order.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{Coordinate, NearbyResult, SensorReadings};

use super::aggregator::SearchGeneration;
use super::stay::StayStateTracker;

/// Location-derived state, updated as one unit.
#[derive(Debug, Default)]
struct LocationState {
    stay: StayStateTracker,
    readings: SensorReadings,
    location: Option<Coordinate>,
}

/// Discovery state for one client session.
#[derive(Debug, Default)]
pub struct Session {
    location: Mutex<LocationState>,
    generation: SearchGeneration,
    last_good: RwLock<Option<NearbyResult>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a location fix and return the updated sensor readings.
    pub async fn record_location(
        &self,
        location: Coordinate,
        gps_accuracy_meters: Option<f64>,
        now_millis: i64,
    ) -> SensorReadings {
        let mut state = self.location.lock().await;

        let staying_duration_seconds = state.stay.update(location, now_millis);
        state.readings = SensorReadings {
            gps_accuracy_meters,
            staying_duration_seconds,
        };
        state.location = Some(location);

        state.readings
    }

    /// Latest sensor readings (defaults before the first fix).
    pub async fn readings(&self) -> SensorReadings {
        self.location.lock().await.readings
    }

    /// Last reported user location.
    pub async fn user_location(&self) -> Option<Coordinate> {
        self.location.lock().await.location
    }

    pub fn generation(&self) -> &SearchGeneration {
        &self.generation
    }

    /// Keep a successful result for display after later failures.
    ///
    /// A result from an older generation than the one already kept is
    /// ignored.
    pub async fn remember(&self, result: NearbyResult) {
        let mut last_good = self.last_good.write().await;
        let newer = last_good
            .as_ref()
            .is_none_or(|kept| result.generation >= kept.generation);
        if newer {
            *last_good = Some(result);
        }
    }

    /// The most recent successful result, if any.
    pub async fn last_good(&self) -> Option<NearbyResult> {
        self.last_good.read().await.clone()
    }
}

/// Most sessions kept at once; the least useful are evicted beyond this.
pub const DEFAULT_MAX_SESSIONS: u64 = 10_000;

/// Sessions keyed by client id, dropped after a period of inactivity.
pub struct SessionRegistry {
    sessions: MokaCache<String, Arc<Session>>,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self::with_max_sessions(idle_timeout, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_max_sessions(idle_timeout: Duration, max_sessions: u64) -> Self {
        let sessions = MokaCache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle_timeout)
            .build();
        Self { sessions }
    }

    /// Get a session, creating it on first use.
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Session> {
        self.sessions
            .get_with(session_id.to_string(), async { Arc::new(Session::new()) })
            .await
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions.get(session_id).await
    }

    pub async fn remove(&self, session_id: &str) {
        self.sessions.invalidate(session_id).await;
    }
}
