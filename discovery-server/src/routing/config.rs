//! Configuration for route composition.

use std::time::Duration;

/// Configuration parameters for route fetching.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Upper bound on a single course leg fetch.
    /// A leg that takes longer becomes a gap.
    pub leg_timeout: Duration,

    /// Maximum number of course legs fetched at once.
    pub max_concurrent_legs: usize,
}

impl RouteConfig {
    pub fn new(leg_timeout: Duration, max_concurrent_legs: usize) -> Self {
        Self {
            leg_timeout,
            max_concurrent_legs,
        }
    }

    /// Set the per-leg timeout.
    pub fn with_leg_timeout(mut self, timeout: Duration) -> Self {
        self.leg_timeout = timeout;
        self
    }

    /// Set how many legs may be in flight at once.
    pub fn with_max_concurrent_legs(mut self, n: usize) -> Self {
        self.max_concurrent_legs = n;
        self
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            leg_timeout: Duration::from_secs(10),
            max_concurrent_legs: 8,
        }
    }
}
