//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! ## Server
//! - `SHOPZONE_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPZONE_PORT` - Listen port (default: 3000)
//! - `SHOPZONE_BASE_URL` - Public URL for the storefront (default: `http://{host}:{port}`)
//! - `SHOPZONE_SESSION_IDLE_SECS` - Drop a shopper's session after this much
//!   inactivity (default: 1800)
//!
//! ## Product source
//! - `SHOPZONE_USE_MOCK_DATA` - Serve the built-in catalog instead of calling
//!   the backend (default: true)
//! - `SHOPZONE_API_BASE_URL` - Backend REST root (default: `http://localhost:8080/api`)
//! - `SHOPZONE_API_TOKEN` - Bearer token sent to the backend
//! - `SHOPZONE_FALLBACK_ON_ERROR` - Substitute the built-in catalog and a
//!   synthesized receipt when the backend fails (default: true)
//! - `SHOPZONE_CATALOG_DELAY_MS` - Mock catalog latency (default: 500)
//! - `SHOPZONE_ORDER_DELAY_MS` - Mock order latency (default: 1000)
//!
//! ## Display
//! - `SHOPZONE_CURRENCY` - ISO 4217 code prices are shown in (default: INR)
//! - `SHOPZONE_CONFIRMATION_MS` - How long "order placed" stays up (default: 2000)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use shopzone_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const MIN_TOKEN_LENGTH: usize = 16;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Idle time after which a shopper's session state is dropped
    pub session_idle: Duration,
    /// Where products come from and orders go
    pub source: SourceConfig,
    /// Currency prices are displayed in
    pub currency: CurrencyCode,
    /// How long the order confirmation stays visible
    pub confirmation_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Product source configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct SourceConfig {
    /// Serve the built-in catalog instead of calling the backend
    pub use_mock_data: bool,
    /// Backend REST root
    pub api_base_url: Url,
    /// Bearer token for the backend
    pub api_token: Option<SecretString>,
    /// Swallow backend failures and substitute fallback data
    pub fallback_on_error: bool,
    /// Mock catalog latency
    pub catalog_delay: Duration,
    /// Mock order latency
    pub order_delay: Duration,
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("use_mock_data", &self.use_mock_data)
            .field("api_base_url", &self.api_base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("fallback_on_error", &self.fallback_on_error)
            .field("catalog_delay", &self.catalog_delay)
            .field("order_delay", &self.order_delay)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the API token
    /// looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let host: IpAddr = vars.parse_or("SHOPZONE_HOST", "127.0.0.1".parse().ok())?;
        let port: u16 = vars.parse_or("SHOPZONE_PORT", Some(3000))?;
        let base_url = vars
            .get("SHOPZONE_BASE_URL")
            .unwrap_or_else(|| format!("http://{}", SocketAddr::new(host, port)));
        let session_idle = vars.secs("SHOPZONE_SESSION_IDLE_SECS", 1800)?;

        let source = SourceConfig::from_vars(&vars)?;
        let currency: CurrencyCode = vars.parse_or("SHOPZONE_CURRENCY", Some(CurrencyCode::INR))?;
        let confirmation_delay = vars.millis("SHOPZONE_CONFIRMATION_MS", 2000)?;

        Ok(Self {
            host,
            port,
            base_url,
            session_idle,
            source,
            currency,
            confirmation_delay,
            sentry_dsn: vars.get("SENTRY_DSN"),
            sentry_environment: vars.get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl SourceConfig {
    fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let api_token = match vars.get("SHOPZONE_API_TOKEN") {
            Some(token) => {
                validate_token(&token, "SHOPZONE_API_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        Ok(Self {
            use_mock_data: vars.flag("SHOPZONE_USE_MOCK_DATA", true)?,
            api_base_url: vars.parse_or(
                "SHOPZONE_API_BASE_URL",
                Url::parse("http://localhost:8080/api").ok(),
            )?,
            api_token,
            fallback_on_error: vars.flag("SHOPZONE_FALLBACK_ON_ERROR", true)?,
            catalog_delay: vars.millis("SHOPZONE_CATALOG_DELAY_MS", 500)?,
            order_delay: vars.millis("SHOPZONE_ORDER_DELAY_MS", 1000)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Typed accessors over a variable lookup.
struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Get a variable, treating empty values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: Option<T>) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => default.ok_or_else(|| {
                ConfigError::InvalidEnvVar(key.to_string(), "no default available".to_string())
            }),
        }
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key).map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(default),
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
            Some(v) => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got '{v}'"),
            )),
        }
    }

    fn millis(&self, key: &str, default: u64) -> Result<Duration, ConfigError> {
        self.parse_or(key, Some(default)).map(Duration::from_millis)
    }

    fn secs(&self, key: &str, default: u64) -> Result<Duration, ConfigError> {
        self.parse_or(key, Some(default)).map(Duration::from_secs)
    }
}

/// Reject tokens that are too short or look like a copied placeholder.
fn validate_token(token: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = token.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    if token.len() < MIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_TOKEN_LENGTH} characters (got {})",
                token.len()
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert!(config.source.use_mock_data);
        assert!(config.source.fallback_on_error);
        assert_eq!(config.source.api_base_url.as_str(), "http://localhost:8080/api");
        assert_eq!(config.source.catalog_delay, Duration::from_millis(500));
        assert_eq!(config.source.order_delay, Duration::from_millis(1000));
        assert_eq!(config.confirmation_delay, Duration::from_millis(2000));
        assert_eq!(config.currency, CurrencyCode::INR);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SHOPZONE_PORT", "8081"),
            ("SHOPZONE_BASE_URL", "https://shop.example.org"),
            ("SHOPZONE_USE_MOCK_DATA", "false"),
            ("SHOPZONE_API_BASE_URL", "http://backend:9000/v1"),
            ("SHOPZONE_CURRENCY", "usd"),
            ("SHOPZONE_CONFIRMATION_MS", "50"),
        ])
        .unwrap();
        assert_eq!(config.port, 8081);
        assert!(config.is_secure());
        assert!(!config.source.use_mock_data);
        assert_eq!(config.source.api_base_url.as_str(), "http://backend:9000/v1");
        assert_eq!(config.currency, CurrencyCode::USD);
        assert_eq!(config.confirmation_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = load(&[("SHOPZONE_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPZONE_PORT"));

        let err = load(&[("SHOPZONE_USE_MOCK_DATA", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = load(&[("SHOPZONE_API_TOKEN", "your-api-token-here")]).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));

        let err = load(&[("SHOPZONE_API_TOKEN", "short")]).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_source_config_debug_redacts_token() {
        let config = load(&[("SHOPZONE_API_TOKEN", "tok_9f8Qz2LmX4vB7nR1")]).unwrap();
        let debug_output = format!("{:?}", config.source);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("tok_9f8Qz2LmX4vB7nR1"));
    }
}
