//! Location-aware merchant discovery.
//!
//! Turns a map camera and the user's sensors into a merchant search:
//! zoom becomes a search radius, location fixes become a stay duration,
//! accuracy and stay become indoor signals, and the provider's scores are
//! bucketed into relative tiers.

mod aggregator;
mod config;
mod indoor;
mod radius;
mod session;
mod stay;
mod tier;

pub use aggregator::{DiscoveryError, NearbyMerchantAggregator, SearchGeneration};
pub use config::DiscoveryConfig;
pub use indoor::{
    FORCED_GPS_ACCURACY_M, FORCED_STAYING_SECS, INDOOR_ACCURACY_THRESHOLD_M,
    INDOOR_STAY_THRESHOLD_SECS, IndoorClassifier, IndoorOverride,
};
pub use radius::{MAX_ZOOM, MIN_ZOOM, RADIUS_BUFFER, base_radius, estimate_radius};
pub use session::{DEFAULT_MAX_SESSIONS, Session, SessionRegistry};
pub use stay::{STAY_THRESHOLD_M, StayStateTracker};
pub use tier::{TierThresholds, assign_tiers, classify_tier};
