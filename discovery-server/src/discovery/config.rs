//! Discovery configuration.

/// Configuration parameters for nearby-merchant discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum number of merchants returned by one search.
    /// Keeps render cost bounded; the provider's order decides who is kept.
    pub max_results: usize,

    /// Whether clients may force indoor mode.
    /// Off in production; the override exists for demos and testing.
    pub allow_force_indoor: bool,
}

impl DiscoveryConfig {
    pub fn new(max_results: usize, allow_force_indoor: bool) -> Self {
        Self {
            max_results,
            allow_force_indoor,
        }
    }

    /// Allow or reject the force-indoor override.
    pub fn with_force_indoor(mut self, allow: bool) -> Self {
        self.allow_force_indoor = allow;
        self
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_results: 50,
            allow_force_indoor: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.max_results, 50);
        assert!(!config.allow_force_indoor);
        assert!(config.with_force_indoor(true).allow_force_indoor);
    }
}
