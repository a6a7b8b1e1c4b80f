//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `plantwatch.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::str::FromStr;
use std::time::Duration;

use plantwatch_adapter_firebase::FirebaseConfig;
use plantwatch_domain::path::StorePath;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Which remote store backs the daemon.
    pub store: StoreConfig,
    /// Firebase connection, used by the `firebase` backend.
    pub firebase: FirebaseConfig,
    /// Demo device, used by the `memory` backend.
    pub simulator: SimulatorConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Dashboard auto-reload interval.
    pub refresh_seconds: u32,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Store selection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

/// Available [`RemoteStore`](plantwatch_app::ports::RemoteStore) backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process tree, optionally fed by the simulated device.
    #[default]
    Memory,
    /// Firebase Realtime Database.
    Firebase,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "memory" => Ok(Self::Memory),
            "firebase" => Ok(Self::Firebase),
            other => Err(ConfigError::Validation(format!(
                "unknown store backend {other:?}, expected \"memory\" or \"firebase\""
            ))),
        }
    }
}

/// Simulated device configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Run the simulated device next to the memory store.
    pub enabled: bool,
    /// Seconds between two readings.
    pub interval_secs: u64,
}

impl SimulatorConfig {
    /// Tick interval as a [`Duration`].
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Config {
    /// Load configuration from `plantwatch.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("plantwatch.toml")?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("PLANTWATCH_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PLANTWATCH_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("PLANTWATCH_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("PLANTWATCH_STORE") {
            self.store.backend = val.parse()?;
        }
        if let Ok(val) = std::env::var("PLANTWATCH_FIREBASE_URL") {
            self.firebase.database_url = val;
        }
        if let Ok(val) = std::env::var("PLANTWATCH_FIREBASE_AUTH") {
            self.firebase.auth = Some(val);
        }
        if let Ok(val) = std::env::var("PLANTWATCH_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.server.refresh_seconds == 0 {
            return Err(ConfigError::Validation(
                "refresh_seconds must be non-zero".to_string(),
            ));
        }
        if self.store.backend == StoreBackend::Firebase {
            if let Err(err) = url::Url::parse(&self.firebase.database_url) {
                return Err(ConfigError::Validation(format!(
                    "firebase.database_url {:?} is not a valid URL: {err}",
                    self.firebase.database_url
                )));
            }
            if let Err(err) = StorePath::parse(&self.firebase.root) {
                return Err(ConfigError::Validation(format!(
                    "firebase.root is not a valid path: {err}"
                )));
            }
        }
        if self.simulator.enabled && self.simulator.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "simulator.interval_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            refresh_seconds: plantwatch_adapter_http_axum::state::DEFAULT_REFRESH_SECONDS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "plantwatchd=info,plantwatch=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 5,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.refresh_seconds, 5);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.simulator.enabled);
        assert_eq!(config.simulator.interval(), Duration::from_secs(5));
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090
            refresh_seconds = 2

            [logging]
            filter = 'debug'

            [store]
            backend = 'firebase'

            [firebase]
            database_url = 'https://plant.firebaseio.com'
            auth = 'secret'
            root = 'plants/basil'

            [firebase.reconnect]
            initial_delay_ms = 500

            [simulator]
            enabled = false
            interval_secs = 1
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.refresh_seconds, 2);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.store.backend, StoreBackend::Firebase);
        assert_eq!(config.firebase.database_url, "https://plant.firebaseio.com");
        assert_eq!(config.firebase.auth.as_deref(), Some("secret"));
        assert_eq!(config.firebase.root, "plants/basil");
        assert_eq!(config.firebase.reconnect.initial_delay_ms, 500);
        assert_eq!(config.firebase.reconnect.max_delay_ms, 30_000);
        assert!(!config.simulator.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_reject_firebase_backend_without_url() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Firebase;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("firebase.database_url"));
    }

    #[test]
    fn should_reject_invalid_firebase_root() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Firebase;
        config.firebase.database_url = "https://plant.firebaseio.com".to_string();
        config.firebase.root = "plants/bad.name".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_ignore_firebase_settings_for_memory_backend() {
        let mut config = Config::default();
        config.firebase.database_url = "not a url".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_reject_zero_simulator_interval_when_enabled() {
        let mut config = Config::default();
        config.simulator.interval_secs = 0;
        assert!(config.validate().is_err());

        config.simulator.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_store_backend_names() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("firebase".parse::<StoreBackend>().unwrap(), StoreBackend::Firebase);
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
