//! Web application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run a local development server.
//!
//! - `GROCER_DATABASE_URL` - `SQLite` connection string (falls back to `DATABASE_URL`,
//!   then `sqlite://grocer.db`)
//! - `GROCER_HOST` - Bind address (default: 127.0.0.1)
//! - `GROCER_PORT` - Listen port (default: 3000)
//! - `GROCER_BASE_URL` - Public URL (default: `http://localhost:3000`). An
//!   `https://` URL marks the session cookie as `Secure`.
//! - `GROCER_LOG_JSON` - Emit JSON logs instead of text when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://grocer.db";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let database_url = vars
            .get("GROCER_DATABASE_URL")
            .or_else(|| vars.get("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let host = vars.parse_or("GROCER_HOST", "127.0.0.1".parse::<IpAddr>())?;
        let port = vars.parse_or("GROCER_PORT", Ok::<u16, std::num::ParseIntError>(3000))?;
        let base_url = vars
            .get("GROCER_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("GROCER_BASE_URL".to_string(), e.to_string())
        })?;
        let log_json = vars.get("GROCER_LOG_JSON").is_some_and(|v| is_truthy(&v));

        let sentry_dsn = vars.get("SENTRY_DSN").filter(|dsn| !dsn.is_empty());
        let sentry_environment = vars.get("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = vars
            .get("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = vars
            .get("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            base_url,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the app is served over HTTPS (controls `Secure` cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a variable, treating unset and empty the same.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T, E>(&self, key: &str, default: Result<T, E>) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
        E: std::fmt::Display,
    {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => default.map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WebConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "sqlite://grocer.db");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(!config.log_json);
        assert!(config.sentry_dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "sqlite://fallback.db")]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "sqlite://fallback.db");

        let config = load(&[
            ("DATABASE_URL", "sqlite://fallback.db"),
            ("GROCER_DATABASE_URL", "sqlite://primary.db"),
        ])
        .unwrap();
        assert_eq!(config.database_url.expose_secret(), "sqlite://primary.db");
    }

    #[test]
    fn test_custom_host_and_port() {
        let config = load(&[("GROCER_HOST", "0.0.0.0"), ("GROCER_PORT", "8080")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("GROCER_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "GROCER_PORT"));
    }

    #[test]
    fn test_invalid_host() {
        let err = load(&[("GROCER_HOST", "localhost:80")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "GROCER_HOST"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&[("GROCER_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "GROCER_BASE_URL"));
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = load(&[("GROCER_BASE_URL", "https://grocer.example.com")]).unwrap();
        assert!(config.is_secure());
    }

    #[test]
    fn test_sentry_settings() {
        let config = load(&[
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
            ("SENTRY_ENVIRONMENT", "staging"),
            ("SENTRY_SAMPLE_RATE", "0.5"),
            ("SENTRY_TRACES_SAMPLE_RATE", "garbage"),
        ])
        .unwrap();
        assert_eq!(
            config.sentry_dsn.as_deref(),
            Some("https://key@sentry.example.com/1")
        );
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
        assert!((config.sentry_sample_rate - 0.5).abs() < f32::EPSILON);
        assert!(config.sentry_traces_sample_rate.abs() < f32::EPSILON);
    }

    #[test]
    fn test_log_json_flag() {
        assert!(load(&[("GROCER_LOG_JSON", "true")]).unwrap().log_json);
        assert!(load(&[("GROCER_LOG_JSON", "1")]).unwrap().log_json);
        assert!(!load(&[("GROCER_LOG_JSON", "no")]).unwrap().log_json);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("GROCER_DATABASE_URL", "sqlite://very-private.db")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("very-private"));
    }
}
