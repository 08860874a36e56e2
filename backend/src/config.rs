//! Configuration management for the FieldSense server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FSI_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use crate::services::SessionLimits;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Forecast provider configuration
    pub weather: WeatherConfig,

    /// Session store bounds
    pub sessions: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Forecast API base URL
    pub api_endpoint: String,

    /// Forecast API key; forecasts are unavailable without it
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Idle seconds before a session is dropped
    pub ttl_seconds: u64,

    /// Most sessions kept in memory
    pub max_sessions: usize,
}

impl SessionConfig {
    pub fn limits(&self) -> SessionLimits {
        SessionLimits {
            ttl: Duration::from_secs(self.ttl_seconds),
            max_sessions: self.max_sessions,
        }
    }
}

impl WeatherConfig {
    /// The configured key, ignoring blank values
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("FSI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/3.0")?
            .set_default("weather.timeout_seconds", 10)?
            .set_default("sessions.ttl_seconds", 3600)?
            .set_default("sessions.max_sessions", 10_000)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FSI_ prefix)
            .add_source(
                Environment::with_prefix("FSI")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            max_sessions: 10_000,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(api_key: Option<&str>) -> WeatherConfig {
        WeatherConfig {
            api_endpoint: "http://localhost".to_string(),
            api_key: api_key.map(str::to_string),
            timeout_seconds: 10,
        }
    }

    #[test]
    fn test_credential_present() {
        assert_eq!(weather(Some("abc123")).credential(), Some("abc123"));
    }

    #[test]
    fn test_session_limits() {
        let limits = SessionConfig {
            ttl_seconds: 90,
            max_sessions: 5,
        }
        .limits();
        assert_eq!(limits.ttl, Duration::from_secs(90));
        assert_eq!(limits.max_sessions, 5);
        assert_eq!(SessionConfig::default().limits(), SessionLimits::default());
    }

    #[test]
    fn test_blank_credential_is_missing() {
        assert_eq!(weather(Some("   ")).credential(), None);
        assert_eq!(weather(None).credential(), None);
    }
}
