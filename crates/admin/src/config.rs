//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel (default: <http://localhost:3001>)
//! - `ADMIN_DATA_SOURCE` - `mock` or `remote` (default: mock)
//! - `ADMIN_LOG_JSON` - Emit JSON logs when set
//! - `APP_ENV` - `development`, `staging` or `production` (default: development)
//! - `MARKETPLACE_API_BASE_URL` - REST backend (default: <http://localhost:3000/api>)
//! - `MARKETPLACE_API_TIMEOUT_MS` - Request timeout (default: 30000)
//! - `MARKETPLACE_API_TOKEN` - Initial bearer token for the backend
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl AppEnvironment {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Whether verbose request/response logging is enabled.
    #[must_use]
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for AppEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// Where record stores load their data from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataSourceKind {
    /// Built-in demo data.
    #[default]
    Mock,
    /// The marketplace REST backend.
    Remote,
}

impl FromStr for DataSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mock" => Ok(Self::Mock),
            "remote" => Ok(Self::Remote),
            other => Err(format!("expected mock or remote, got {other}")),
        }
    }
}

/// Marketplace REST backend configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct MarketplaceApiConfig {
    /// Base URL; endpoint paths are appended to it.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Bearer token to start with, if any.
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for MarketplaceApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl MarketplaceApiConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw = get_or_default(lookup, "MARKETPLACE_API_BASE_URL", DEFAULT_API_BASE_URL);
        let base_url = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("MARKETPLACE_API_BASE_URL".to_string(), e.to_string())
        })?;

        // Unparseable or zero values fall back to the default.
        let timeout_ms = lookup("MARKETPLACE_API_TIMEOUT_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_API_TIMEOUT_MS);

        let token = lookup("MARKETPLACE_API_TOKEN")
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        Ok(Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
            token,
        })
    }
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Deployment environment
    pub environment: AppEnvironment,
    /// Record source
    pub data_source: DataSourceKind,
    /// REST backend
    pub api: MarketplaceApiConfig,
    /// Emit JSON logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default(&lookup, "ADMIN_HOST", "127.0.0.1")?;
        let port = parse_or_default(&lookup, "ADMIN_PORT", "3001")?;
        let base_url = get_or_default(&lookup, "ADMIN_BASE_URL", "http://localhost:3001");
        let environment = parse_or_default(&lookup, "APP_ENV", "development")?;
        let data_source = parse_or_default(&lookup, "ADMIN_DATA_SOURCE", "mock")?;
        let api = MarketplaceApiConfig::from_lookup(&lookup)?;
        let log_json = lookup("ADMIN_LOG_JSON").is_some_and(|v| !v.is_empty() && v != "0");

        let sentry_dsn = lookup("SENTRY_DSN").filter(|s| !s.is_empty());
        let sentry_environment = lookup("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = lookup("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = lookup("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            environment,
            data_source,
            api,
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

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_or_default(lookup, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AdminConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.base_url, "http://localhost:3001");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.data_source, DataSourceKind::Mock);
        assert_eq!(config.api.base_url.as_str(), "http://localhost:3000/api");
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert!(config.api.token.is_none());
        assert!(!config.log_json);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ADMIN_HOST", "0.0.0.0"),
            ("ADMIN_PORT", "8080"),
            ("ADMIN_BASE_URL", "https://admin.nearu.com"),
            ("APP_ENV", "production"),
            ("ADMIN_DATA_SOURCE", "remote"),
            ("MARKETPLACE_API_BASE_URL", "https://api.nearu.com/v1"),
            ("MARKETPLACE_API_TIMEOUT_MS", "5000"),
            ("MARKETPLACE_API_TOKEN", "tok"),
            ("ADMIN_LOG_JSON", "1"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.is_secure());
        assert_eq!(config.environment, AppEnvironment::Production);
        assert!(!config.environment.is_development());
        assert_eq!(config.data_source, DataSourceKind::Remote);
        assert_eq!(config.api.timeout, Duration::from_millis(5000));
        assert_eq!(config.api.token.as_ref().unwrap().expose_secret(), "tok");
        assert!(config.log_json);
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        for raw in ["abc", "0", "-5", ""] {
            let config = load(&[("MARKETPLACE_API_TIMEOUT_MS", raw)]).unwrap();
            assert_eq!(config.api.timeout, Duration::from_millis(30_000), "{raw}");
        }
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("ADMIN_PORT", "not-a-port")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "ADMIN_PORT"
        ));
        assert!(matches!(
            load(&[("ADMIN_DATA_SOURCE", "postgres")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "ADMIN_DATA_SOURCE"
        ));
        assert!(matches!(
            load(&[("APP_ENV", "qa")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "APP_ENV"
        ));
        assert!(load(&[("MARKETPLACE_API_BASE_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_api_config_debug_redacts_token() {
        let config = load(&[("MARKETPLACE_API_TOKEN", "super_secret_bearer")]).unwrap();
        let debug_output = format!("{:?}", config.api);

        assert!(debug_output.contains("localhost:3000"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_bearer"));
    }
}
