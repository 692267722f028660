//! Application configuration.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables.
//!
//! # File
//! The path comes from `SEATMAP_CONFIG`; otherwise the first existing of
//! `seatmap.toml`, `backend/seatmap.toml` and `../seatmap.toml` is used. No
//! file at all is fine. A file that cannot be read or parsed is an error.
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [upstream]
//! base_url = "https://n8n.hantoush.space/webhook"
//! max_attempts = 3
//!
//! [simulation.region]
//! lat_min = 23.0
//! lat_max = 26.0
//! lon_min = 45.0
//! lon_max = 48.0
//!
//! [simulation.travel]
//! local_access_minutes = 5.0
//! saturation_fallback_minutes = 30.0
//! ```
//!
//! # Environment Variables
//! - `HOST`, `PORT`: bind address
//! - `SEATMAP_UPSTREAM_URL`: webhook base URL
//! - `SEATMAP_UPSTREAM_MAX_ATTEMPTS`, `SEATMAP_UPSTREAM_RETRY_DELAY_MS`: retry policy
//! - `SEATMAP_FIXTURES_DIR`: read feeds from `<dir>/<feed>.json` instead of the network

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ingest::Feed;
use crate::models::BoundingBox;
use crate::services::district::SeverityThresholds;
use crate::services::recalculator::TravelPolicy;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SEATMAP_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub simulation: SimulationConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound on concurrently tracked what-if sessions.
    pub max_sessions: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_sessions: 1024,
        }
    }
}

/// Webhook endpoint paths, relative to `base_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub capacity: String,
    pub candidate_sites: String,
    pub travel_times: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            capacity: "school-analysis".to_string(),
            candidate_sites: "find-optimal-locations".to_string(),
            travel_times: "travel-time-heatmap".to_string(),
        }
    }
}

/// Raw-data collaborator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Total attempts per feed, including the first.
    pub max_attempts: u32,
    /// Base delay; attempt `n` waits `n * retry_delay_ms` before retrying.
    pub retry_delay_ms: u64,
    pub fixtures_dir: Option<PathBuf>,
    pub endpoints: EndpointSettings,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: "https://n8n.hantoush.space/webhook".to_string(),
            timeout_secs: 30,
            max_attempts: 3,
            retry_delay_ms: 1000,
            fixtures_dir: None,
            endpoints: EndpointSettings::default(),
        }
    }
}

impl UpstreamSettings {
    pub fn endpoint(&self, feed: Feed) -> &str {
        match feed {
            Feed::Capacity => &self.endpoints.capacity,
            Feed::CandidateSites => &self.endpoints.candidate_sites,
            Feed::TravelTimes => &self.endpoints.travel_times,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(attempt as u64))
    }
}

/// Parameters of the simulation core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub region: BoundingBox,
    pub travel: TravelPolicy,
    pub severity: SeverityThresholds,
}

impl AppConfig {
    /// Parse configuration from TOML text. Missing sections keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Find the config file, if any.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(explicit) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(explicit));
        }
        [
            PathBuf::from("seatmap.toml"),
            PathBuf::from("backend/seatmap.toml"),
            PathBuf::from("../seatmap.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Full layered load: defaults, file, environment, validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::locate() {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides on top of the current values.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_env::<u16>("PORT")? {
            self.server.port = port;
        }
        if let Ok(url) = env::var("SEATMAP_UPSTREAM_URL") {
            self.upstream.base_url = url;
        }
        if let Some(attempts) = parse_env::<u32>("SEATMAP_UPSTREAM_MAX_ATTEMPTS")? {
            self.upstream.max_attempts = attempts;
        }
        if let Some(delay) = parse_env::<u64>("SEATMAP_UPSTREAM_RETRY_DELAY_MS")? {
            self.upstream.retry_delay_ms = delay;
        }
        if let Ok(dir) = env::var("SEATMAP_FIXTURES_DIR") {
            self.upstream.fixtures_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.simulation.region.is_valid() {
            return Err(ConfigError::Invalid(
                "simulation.region must have lat_min <= lat_max and lon_min <= lon_max".to_string(),
            ));
        }
        self.simulation.travel.validate().map_err(ConfigError::Invalid)?;
        self.simulation
            .severity
            .validate()
            .map_err(ConfigError::Invalid)?;
        if self.upstream.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "upstream.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.server.max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "server.max_sessions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    env::var(key)
        .ok()
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid(format!("{} has an invalid value: {}", key, v)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upstream.max_attempts, 3);
        assert_eq!(config.simulation.travel.local_access_minutes, 5.0);
        assert_eq!(config.simulation.travel.saturation_fallback_minutes, 30.0);
        assert_eq!(config.simulation.region, BoundingBox::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            port = 9000

            [simulation.travel]
            saturation_fallback_minutes = 45.0
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.simulation.travel.saturation_fallback_minutes, 45.0);
        assert_eq!(config.simulation.travel.local_access_minutes, 5.0);
        assert_eq!(config.upstream.endpoints.capacity, "school-analysis");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("[server\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::from_file("/definitely/not/here/seatmap.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validate_rejects_inverted_region() {
        let mut config = AppConfig::default();
        config.simulation.region.lon_min = 50.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_local_access_slower_than_distance_floor() {
        let config = AppConfig::from_toml_str(
            r#"
            [simulation.travel]
            local_access_minutes = 10.0
            minimum_minutes = 5.0
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = AppConfig::default();
        config.upstream.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_delay_is_linear() {
        let upstream = UpstreamSettings {
            retry_delay_ms: 250,
            ..UpstreamSettings::default()
        };
        assert_eq!(upstream.retry_delay(1), Duration::from_millis(250));
        assert_eq!(upstream.retry_delay(3), Duration::from_millis(750));
    }

    #[test]
    fn test_endpoint_lookup() {
        let upstream = UpstreamSettings::default();
        assert_eq!(upstream.endpoint(Feed::TravelTimes), "travel-time-heatmap");
        assert_eq!(upstream.endpoint(Feed::CandidateSites), "find-optimal-locations");
    }
}
