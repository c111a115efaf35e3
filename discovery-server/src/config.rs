//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::cache::CacheConfig;
use crate::discovery::{DEFAULT_MAX_SESSIONS, DiscoveryConfig};
use crate::providers::BackendConfig;
use crate::routing::RouteConfig;

pub const BIND_ADDR_VAR: &str = "DISCOVERY_BIND_ADDR";
pub const BACKEND_URL_VAR: &str = "DISCOVERY_BACKEND_URL";
pub const API_KEY_VAR: &str = "DISCOVERY_API_KEY";
pub const MOCK_DATA_VAR: &str = "DISCOVERY_MOCK_DATA";
pub const ALLOW_FORCE_INDOOR_VAR: &str = "DISCOVERY_ALLOW_FORCE_INDOOR";
pub const SESSION_IDLE_VAR: &str = "DISCOVERY_SESSION_IDLE_SECS";
pub const MAX_SESSIONS_VAR: &str = "DISCOVERY_MAX_SESSIONS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// Error reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Where provider data comes from.
#[derive(Debug, Clone)]
pub enum BackendSource {
    /// The HTTP backend
    Http(BackendConfig),
    /// JSON files in a directory
    Mock(PathBuf),
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend: BackendSource,
    pub discovery: DiscoveryConfig,
    pub route: RouteConfig,
    pub cache: CacheConfig,
    /// Sessions idle this long are dropped.
    pub session_idle: Duration,
    /// Most sessions kept at once.
    pub max_sessions: u64,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: BIND_ADDR_VAR,
            value: bind_raw.clone(),
        })?;

        let backend = match lookup(MOCK_DATA_VAR).filter(|dir| !dir.is_empty()) {
            Some(dir) => BackendSource::Mock(PathBuf::from(dir)),
            None => {
                let api_key = lookup(API_KEY_VAR).unwrap_or_else(|| {
                    warn!("{API_KEY_VAR} not set; backend calls will likely be rejected");
                    String::new()
                });
                let mut config = BackendConfig::new(api_key);
                if let Some(url) = lookup(BACKEND_URL_VAR) {
                    config = config.with_base_url(url);
                }
                BackendSource::Http(config)
            }
        };

        let allow_force_indoor = match lookup(ALLOW_FORCE_INDOOR_VAR) {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                name: ALLOW_FORCE_INDOOR_VAR,
                value: raw,
            })?,
        };

        let session_idle_secs = match lookup(SESSION_IDLE_VAR) {
            None => DEFAULT_SESSION_IDLE_SECS,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    name: SESSION_IDLE_VAR,
                    value: raw,
                })?,
        };

        let max_sessions = match lookup(MAX_SESSIONS_VAR) {
            None => DEFAULT_MAX_SESSIONS,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    name: MAX_SESSIONS_VAR,
                    value: raw,
                })?,
        };

        Ok(Self {
            bind_addr,
            backend,
            discovery: DiscoveryConfig::default().with_force_indoor(allow_force_indoor),
            route: RouteConfig::default(),
            cache: CacheConfig::default(),
            session_idle: Duration::from_secs(session_idle_secs),
            max_sessions,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
