//! Application configuration loaded from environment variables.
//!
//! # Configuration Hierarchy
//!
//! All configuration is loaded from environment variables with defaults
//! suitable for running behind a local Envoy. A `.env` file in the working
//! directory is honored if present.
//!
//! - `HOST`: Bind host (default: `0.0.0.0`)
//! - `PORT`: Bind port (default: 8080)
//! - `IDENTITY_HEADER`: Header carrying the authenticated user (default: `x-current-user`)
//! - `MISSING_IDENTITY_POLICY`: `reject` (HTTP 500) or `empty` (default: `reject`)
//! - `METRICS_PORT`: Prometheus exporter port (default: 0, disabled)
//! - `RUST_LOG`: Log filter (default: `info`)

use std::env;
use std::net::SocketAddr;

use crate::error::{AppError, AppResult};
use crate::identity::{DEFAULT_IDENTITY_HEADER, IdentityHeader, MissingIdentityPolicy};
use crate::validation::{validate_header_name, validate_host};

/// Application configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 8080)
    pub port: u16,

    // =========================================================================
    // Identity Configuration
    // =========================================================================
    /// Header the authorization proxy uses to forward the authenticated user
    pub identity_header: IdentityHeader,

    /// Behavior of `/service` when the identity header is absent
    pub missing_identity_policy: MissingIdentityPolicy,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Port for Prometheus metrics endpoint (default: 0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if any value is invalid
    /// (e.g., non-numeric PORT, malformed IDENTITY_HEADER).
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 8080)?,

            // Identity
            identity_header: Self::parse_identity_header("IDENTITY_HEADER")?,
            missing_identity_policy: Self::parse_env(
                "MISSING_IDENTITY_POLICY",
                MissingIdentityPolicy::Reject,
            )?,

            // Observability
            metrics_port: Self::parse_env("METRICS_PORT", 0)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency and correctness.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if validation fails.
    pub fn validate(&self) -> AppResult<()> {
        validate_host(&self.host)?;

        if self.metrics_enabled() && self.metrics_port == self.port {
            return Err(AppError::ConfigError(format!(
                "METRICS_PORT ({}) must differ from PORT ({})",
                self.metrics_port, self.port
            )));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    ///
    /// IPv6 literals are bracketed so the result stays parseable.
    pub fn server_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address.
    ///
    /// Returns `None` if metrics are disabled (port = 0).
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        if self.metrics_enabled() {
            Some(SocketAddr::from(([0, 0, 0, 0], self.metrics_port)))
        } else {
            None
        }
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .trim()
                .parse()
                .map_err(|e| AppError::ConfigError(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }

    /// Parse and validate the identity header name held in environment variable `name`.
    fn parse_identity_header(name: &str) -> AppResult<IdentityHeader> {
        let value = env::var(name).unwrap_or_else(|_| DEFAULT_IDENTITY_HEADER.to_string());
        validate_header_name(value.trim(), name).map(IdentityHeader::new)
    }
}

/// Default configuration for testing and development.
///
/// Deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            identity_header: IdentityHeader::default(),
            missing_identity_policy: MissingIdentityPolicy::Reject,
            metrics_port: 0,
        }
    }
}
