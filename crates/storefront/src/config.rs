//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `FOOD_API_BASE_URL` - Base URL of the food API (e.g., `https://api.grabeat.example/api`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `FOOD_API_TIMEOUT_SECS` - Request timeout (default: 15)
//! - `MENU_CACHE_TTL_SECS` - Category and menu cache lifetime (default: 300)
//! - `PAYMENT_CHECKOUT_URL` - Hosted payment page, with a `{session_id}`
//!   placeholder (default: Stripe Checkout)
//! - `DELIVERY_FEE_CENTS` - Delivery fee in cents (default: 0)
//! - `FREE_DELIVERY_THRESHOLD_CENTS` - Subtotals above this ship free (default: 2000)
//! - `ORDER_REDIRECT_SECONDS` - Confirmation page countdown (default: 30)
//! - `PLACEHOLDER_IMAGE_URL` - Image shown for items without one
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use grab_eat_core::{DeliveryPolicy, Money};
use thiserror::Error;
use url::Url;

use crate::services::checkout::PaymentRedirect;

/// Default hosted payment page.
pub const DEFAULT_PAYMENT_CHECKOUT_URL: &str = "https://checkout.stripe.com/c/pay/{session_id}";

/// Default image for menu items without one.
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1568901346375-23c9450c58cd?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=80";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
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
    /// Food API connection settings
    pub food_api: FoodApiConfig,
    /// Where browsers are sent to pay
    pub payment: PaymentRedirect,
    /// Delivery fee rule
    pub delivery: DeliveryPolicy,
    /// Seconds before the confirmation page navigates home
    pub order_redirect_seconds: u64,
    /// Image shown for menu items without one
    pub placeholder_image_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Food API connection settings.
#[derive(Debug, Clone)]
pub struct FoodApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Lifetime of cached categories and menu items
    pub cache_ttl: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let payment_template =
            env.get_or_default("PAYMENT_CHECKOUT_URL", DEFAULT_PAYMENT_CHECKOUT_URL);
        let payment = PaymentRedirect::new(payment_template).map_err(|e| {
            ConfigError::InvalidEnvVar("PAYMENT_CHECKOUT_URL".to_string(), e.to_string())
        })?;

        let delivery = DeliveryPolicy {
            fee: Money::from_cents(env.parse_or("DELIVERY_FEE_CENTS", 0)?),
            free_threshold: Money::from_cents(
                env.parse_or("FREE_DELIVERY_THRESHOLD_CENTS", 2000)?,
            ),
        };
        if delivery.fee.cents() < 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DELIVERY_FEE_CENTS".to_string(),
                "must not be negative".to_string(),
            ));
        }

        Ok(Self {
            host: env.parse_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: env.parse_or("STOREFRONT_PORT", 3000)?,
            base_url: env.required("STOREFRONT_BASE_URL")?,
            food_api: FoodApiConfig::from_env(&env)?,
            payment,
            delivery,
            order_redirect_seconds: env.parse_or("ORDER_REDIRECT_SECONDS", 30)?,
            placeholder_image_url: env
                .get_or_default("PLACEHOLDER_IMAGE_URL", DEFAULT_PLACEHOLDER_IMAGE_URL),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
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

impl FoodApiConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let raw = env.required("FOOD_API_BASE_URL")?;
        let base_url = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("FOOD_API_BASE_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(env.parse_or("FOOD_API_TIMEOUT_SECS", 15)?),
            cache_ttl: Duration::from_secs(env.parse_or("MENU_CACHE_TTL_SECS", 300)?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source with the lookup helpers used by `from_lookup`.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a required variable. Blank values count as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
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
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("STOREFRONT_BASE_URL", "http://localhost:3000"),
        ("FOOD_API_BASE_URL", "http://localhost:5000/api"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(REQUIRED).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.food_api.timeout, Duration::from_secs(15));
        assert_eq!(config.food_api.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.delivery, DeliveryPolicy::default());
        assert_eq!(config.order_redirect_seconds, 30);
        assert_eq!(config.placeholder_image_url, DEFAULT_PLACEHOLDER_IMAGE_URL);
        assert!(config.sentry_dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_missing_required() {
        let err = load(&[("STOREFRONT_BASE_URL", "http://localhost:3000")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "FOOD_API_BASE_URL"));
    }

    #[test]
    fn test_blank_required_counts_as_missing() {
        let err = load(&[
            ("STOREFRONT_BASE_URL", "   "),
            ("FOOD_API_BASE_URL", "http://localhost:5000/api"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("STOREFRONT_PORT", "eighty"));
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_payment_template_must_have_placeholder() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PAYMENT_CHECKOUT_URL", "https://pay.example.com/checkout"));
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "PAYMENT_CHECKOUT_URL"));
    }

    #[test]
    fn test_delivery_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DELIVERY_FEE_CENTS", "250"));
        vars.push(("FREE_DELIVERY_THRESHOLD_CENTS", "3000"));
        let config = load(&vars).unwrap();
        assert_eq!(config.delivery.fee, Money::from_cents(250));
        assert_eq!(config.delivery.free_threshold, Money::from_cents(3000));

        let mut vars = REQUIRED.to_vec();
        vars.push(("DELIVERY_FEE_CENTS", "-1"));
        assert!(load(&vars).is_err());
    }
}
