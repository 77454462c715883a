//! Connection configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via GHS_CONFIG)
//! 3. Environment variables

use crate::error::ConfigError;
use ghs_protocol::{CLIENT_API_VERSION, MAX_PAYLOAD_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default connect timeout (10 s).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default round-trip timeout (30 s).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Deadline for resolving and opening the TCP connection.
    #[serde(rename = "connect_timeout_ms", with = "duration_ms")]
    pub connect_timeout: Duration,
    /// Deadline for one full request/response round trip.
    #[serde(rename = "request_timeout_ms", with = "duration_ms")]
    pub request_timeout: Duration,
    /// Largest response payload accepted, in bytes.
    pub max_payload_size: u32,
    /// API version announced in `Connect`.
    pub client_api_version: u32,
    /// Disable Nagle's algorithm on the socket.
    pub nodelay: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_payload_size: MAX_PAYLOAD_SIZE,
            client_api_version: CLIENT_API_VERSION,
            nodelay: true,
        }
    }
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_payload_size(mut self, size: u32) -> Self {
        self.max_payload_size = size;
        self
    }

    pub fn with_client_api_version(mut self, version: u32) -> Self {
        self.client_api_version = version;
        self
    }

    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    /// Loads configuration from `GHS_CONFIG` if set, then applies
    /// environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("GHS_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: ConnectionConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Some(ms) = env_parse::<u64>("GHS_CONNECT_TIMEOUT_MS") {
            self.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("GHS_REQUEST_TIMEOUT_MS") {
            self.request_timeout = Duration::from_millis(ms);
        }
        if let Some(size) = env_parse("GHS_MAX_PAYLOAD_SIZE") {
            self.max_payload_size = size;
        }
        if let Some(version) = env_parse("GHS_CLIENT_API_VERSION") {
            self.client_api_version = version;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "connect_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "request_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.max_payload_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_payload_size must be greater than 0".into(),
            ));
        }
        if self.client_api_version == 0 {
            return Err(ConfigError::ValidationError(
                "client_api_version must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_payload_size, 16 * 1024 * 1024);
        assert_eq!(config.client_api_version, 4);
        assert!(config.nodelay);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ConnectionConfig::new()
            .with_connect_timeout(Duration::from_millis(250))
            .with_request_timeout(Duration::from_secs(2))
            .with_max_payload_size(4096)
            .with_client_api_version(5)
            .with_nodelay(false);

        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.max_payload_size, 4096);
        assert_eq!(config.client_api_version, 5);
        assert!(!config.nodelay);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connect_timeout_ms: 1500").unwrap();
        writeln!(file, "request_timeout_ms: 5000").unwrap();
        writeln!(file, "max_payload_size: 65536").unwrap();

        let config = ConnectionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.connect_timeout, Duration::from_millis(1500));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_payload_size, 65536);
        // Unspecified fields keep their defaults
        assert_eq!(config.client_api_version, CLIENT_API_VERSION);
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_ms: [not, a, number]").unwrap();

        let result = ConnectionConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(..))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_ms: 0").unwrap();

        let result = ConnectionConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_zero_api_version_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "client_api_version: 0").unwrap();

        let result = ConnectionConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
        assert!(ConnectionConfig::default()
            .with_client_api_version(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = ConnectionConfig::from_file("/nonexistent/ghs.yaml");
        assert!(matches!(result, Err(ConfigError::IoError(..))));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ConnectionConfig::new().with_request_timeout(Duration::from_millis(750));
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("request_timeout_ms: 750"));

        let parsed: ConnectionConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
