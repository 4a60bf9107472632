//! Validation of operator-supplied configuration values.
//!
//! Request data is never validated here: the identity header is trusted
//! input from the authorization proxy and is echoed verbatim. These checks
//! only guard the values that shape how the service reads requests.

use axum::http::HeaderName;

use crate::error::{AppError, AppResult};

// =============================================================================
// Validation Constants
// =============================================================================

/// Maximum length for a configured header name.
///
/// Proxies commonly cap a single header line well below this.
pub const MAX_HEADER_NAME_LENGTH: usize = 256;

/// Maximum length for the bind host.
pub const MAX_HOST_LENGTH: usize = 253;

/// Validate a header name and return it in the transport's normalized form.
///
/// Rules:
/// - Must be between 1 and 256 characters
/// - Must be a valid HTTP field name token (no spaces, colons or controls)
///
/// The returned name is lowercased, matching how the transport stores
/// incoming header names.
pub fn validate_header_name(name: &str, purpose: &str) -> AppResult<HeaderName> {
    if name.is_empty() {
        return Err(AppError::ConfigError(format!(
            "{purpose} header name cannot be empty"
        )));
    }

    if name.len() > MAX_HEADER_NAME_LENGTH {
        return Err(AppError::ConfigError(format!(
            "{purpose} header name cannot exceed {MAX_HEADER_NAME_LENGTH} characters"
        )));
    }

    HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
        AppError::ConfigError(format!(
            "{purpose} header name '{}' is not a valid HTTP header name",
            name.escape_debug()
        ))
    })
}

/// Validate the host portion of the bind address.
///
/// Accepts hostnames and IP literals; only rejects values that can never
/// form a `host:port` pair.
pub fn validate_host(host: &str) -> AppResult<()> {
    if host.is_empty() {
        return Err(AppError::ConfigError("HOST cannot be empty".to_string()));
    }

    if host.len() > MAX_HOST_LENGTH {
        return Err(AppError::ConfigError(format!(
            "HOST cannot exceed {MAX_HOST_LENGTH} characters"
        )));
    }

    if let Some(c) = host.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(AppError::ConfigError(format!(
            "HOST contains invalid character {:?}",
            c
        )));
    }

    Ok(())
}
