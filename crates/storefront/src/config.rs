//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FRESHMARKET_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `FRESHMARKET_HOST` - Bind address (default: 127.0.0.1)
//! - `FRESHMARKET_PORT` - Listen port (default: 5000)
//! - `FRESHMARKET_BASE_URL` - Public URL; `https://` enables secure cookies
//!   (default: `http://localhost:5000`)
//! - `FRESHMARKET_DELIVERY_FEE` - Flat delivery fee (default: 5.99)
//! - `FRESHMARKET_FREE_DELIVERY_THRESHOLD` - Member subtotal for free delivery (default: 60)
//! - `FRESHMARKET_MEMBER_DISCOUNT_PERCENT` - Member discount (default: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use freshmarket_core::PricingPolicy;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Delivery fee and discount rules
    pub pricing: PricingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("pricing", &self.pricing)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = PricingPolicy::default();
        let pricing = PricingPolicy {
            delivery_fee: get_parsed_or("FRESHMARKET_DELIVERY_FEE", defaults.delivery_fee)?,
            free_delivery_threshold: get_parsed_or(
                "FRESHMARKET_FREE_DELIVERY_THRESHOLD",
                defaults.free_delivery_threshold,
            )?,
            member_discount_percent: get_parsed_or(
                "FRESHMARKET_MEMBER_DISCOUNT_PERCENT",
                defaults.member_discount_percent,
            )?,
            ..defaults
        };
        validate_pricing(&pricing)?;

        Ok(Self {
            database_url: get_database_url("FRESHMARKET_DATABASE_URL")?,
            host: get_parsed_or("FRESHMARKET_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: get_parsed_or("FRESHMARKET_PORT", 5000)?,
            base_url: get_env_or_default("FRESHMARKET_BASE_URL", "http://localhost:5000"),
            pricing,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed_or("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_parsed_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an optional environment variable, falling back to `default`.
fn get_parsed_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Reject pricing values that would produce nonsense totals.
fn validate_pricing(pricing: &PricingPolicy) -> Result<(), ConfigError> {
    if pricing.delivery_fee.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            "FRESHMARKET_DELIVERY_FEE".to_string(),
            "must not be negative".to_string(),
        ));
    }
    if pricing.free_delivery_threshold.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            "FRESHMARKET_FREE_DELIVERY_THRESHOLD".to_string(),
            "must not be negative".to_string(),
        ));
    }
    if pricing.member_discount_percent.is_sign_negative()
        || pricing.member_discount_percent > Decimal::ONE_HUNDRED
    {
        return Err(ConfigError::InvalidEnvVar(
            "FRESHMARKET_MEMBER_DISCOUNT_PERCENT".to_string(),
            "must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}
