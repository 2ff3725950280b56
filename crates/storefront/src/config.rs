//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOPCART_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPCART_PORT` - Listen port (default: 3000)
//! - `SHOPCART_CATALOG_PATH` - JSON product catalog (default: built-in demo catalog)
//! - `SHOPCART_SHIPPING_FLAT_RATE` - Shipping charged on non-empty carts (default: 10)
//! - `SHOPCART_MAX_ADD_QUANTITY` - Largest quantity a single add accepts (default: 10)
//! - `SHOPCART_SECURE_COOKIES` - Mark the session cookie `Secure` (default: false)
//! - `SHOPCART_SESSION_EXPIRY_SECONDS` - Idle time after which a session and its cart are
//!   dropped (default: 604800, seven days)
//! - `SHOPCART_CART_SWEEP_SECONDS` - How often idle carts are swept (default: 3600)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use shopcart_core::Quantity;
use shopcart_store::ShippingPolicy;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_ADD_QUANTITY: u32 = 10;
const DEFAULT_SESSION_EXPIRY_SECONDS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_CART_SWEEP_SECONDS: u64 = 60 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    /// Product catalog file; `None` serves the demo catalog
    pub catalog_path: Option<PathBuf>,
    /// Shipping charged on carts with a positive subtotal
    pub shipping: ShippingPolicy,
    /// Upper bound for the quantity of a single add
    pub max_add_quantity: Quantity,
    /// Whether the session cookie requires HTTPS
    pub secure_cookies: bool,
    /// Inactivity after which a session expires and its cart is swept
    pub session_expiry: Duration,
    /// Period of the idle cart sweep
    pub cart_sweep_interval: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            catalog_path: None,
            shipping: ShippingPolicy::default(),
            max_add_quantity: Quantity::new(DEFAULT_MAX_ADD_QUANTITY).unwrap_or(Quantity::ONE),
            secure_cookies: false,
            session_expiry: Duration::from_secs(DEFAULT_SESSION_EXPIRY_SECONDS),
            cart_sweep_interval: Duration::from_secs(DEFAULT_CART_SWEEP_SECONDS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);
        let defaults = Self::default();

        let host = vars.parse_or("SHOPCART_HOST", defaults.host)?;
        let port = vars.parse_or("SHOPCART_PORT", defaults.port)?;
        let catalog_path = vars.get("SHOPCART_CATALOG_PATH").map(PathBuf::from);

        let flat_rate: Decimal =
            vars.parse_or("SHOPCART_SHIPPING_FLAT_RATE", defaults.shipping.flat_rate)?;
        if flat_rate.is_sign_negative() {
            return Err(invalid("SHOPCART_SHIPPING_FLAT_RATE", "must not be negative"));
        }

        let max_add_quantity = vars
            .parse_or("SHOPCART_MAX_ADD_QUANTITY", defaults.max_add_quantity.get())
            .and_then(|max| {
                Quantity::new(max)
                    .ok_or_else(|| invalid("SHOPCART_MAX_ADD_QUANTITY", "must be at least 1"))
            })?;

        let secure_cookies = match vars.get("SHOPCART_SECURE_COOKIES") {
            Some(value) => parse_bool("SHOPCART_SECURE_COOKIES", &value)?,
            None => defaults.secure_cookies,
        };

        let session_expiry =
            vars.seconds_or("SHOPCART_SESSION_EXPIRY_SECONDS", defaults.session_expiry)?;
        let cart_sweep_interval =
            vars.seconds_or("SHOPCART_CART_SWEEP_SECONDS", defaults.cart_sweep_interval)?;

        Ok(Self {
            host,
            port,
            catalog_path,
            shipping: ShippingPolicy::flat(flat_rate),
            max_add_quantity,
            secure_cookies,
            session_expiry,
            cart_sweep_interval,
            sentry_dsn: vars.get("SENTRY_DSN"),
            sentry_environment: vars.get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Get a variable, treating blank values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable, falling back to a default when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key).map_or(Ok(default), |value| {
            value.trim().parse().map_err(|e: T::Err| invalid(key, e))
        })
    }

    /// Parse a whole number of seconds, which must be at least 1.
    fn seconds_or(&self, key: &str, default: Duration) -> Result<Duration, ConfigError> {
        match self.parse_or(key, default.as_secs())? {
            0 => Err(invalid(key, "must be at least 1 second")),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(invalid(key, format!("expected a boolean, got {other:?}"))),
    }
}
