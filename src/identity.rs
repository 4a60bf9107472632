//! Identity header lookup and the missing-identity policy.
//!
//! The authorization proxy in front of this service injects the
//! authenticated principal into a well-known header (by default
//! `x-current-user`). The value is opaque: it is never parsed or validated,
//! only echoed.
//!
//! # Duplicates
//!
//! If the header was sent more than once, the last received value wins.

use std::fmt;
use std::str::FromStr;

use axum::http::{HeaderMap, HeaderName};

use crate::error::{AppError, AppResult};

/// Default identity header injected by the authorization proxy.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-current-user";

/// What `/service` does when no identity header was forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingIdentityPolicy {
    /// Fail the request with HTTP 500 and a `missing_identity` diagnostic.
    #[default]
    Reject,
    /// Greet the empty string.
    Empty,
}

impl MissingIdentityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingIdentityPolicy::Reject => "reject",
            MissingIdentityPolicy::Empty => "empty",
        }
    }

    /// Produce the identity to greet when `header` was not forwarded.
    pub fn apply(self, header: &IdentityHeader) -> AppResult<String> {
        match self {
            MissingIdentityPolicy::Empty => Ok(String::new()),
            MissingIdentityPolicy::Reject => Err(AppError::MissingIdentity {
                header: header.name().to_string(),
            }),
        }
    }
}

impl fmt::Display for MissingIdentityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingIdentityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(MissingIdentityPolicy::Reject),
            "empty" => Ok(MissingIdentityPolicy::Empty),
            other => Err(format!("expected 'reject' or 'empty', got '{other}'")),
        }
    }
}

/// The configured identity header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeader {
    name: HeaderName,
}

impl IdentityHeader {
    pub fn new(name: HeaderName) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Whether the header was forwarded at all, empty values included.
    pub fn is_present(&self, headers: &HeaderMap) -> bool {
        headers.contains_key(&self.name)
    }

    /// Look up the identity in `headers`.
    ///
    /// Returns `None` only when the header is absent. A present but empty
    /// header yields `Some("")`. Bytes that are not UTF-8 are replaced with
    /// U+FFFD.
    pub fn extract(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(&self.name)
            .iter()
            .next_back()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
    }

    /// Look up the identity and apply `policy` when it is absent.
    pub fn resolve(&self, headers: &HeaderMap, policy: MissingIdentityPolicy) -> AppResult<String> {
        self.extract(headers).map_or_else(|| policy.apply(self), Ok)
    }
}

impl Default for IdentityHeader {
    fn default() -> Self {
        Self::new(HeaderName::from_static(DEFAULT_IDENTITY_HEADER))
    }
}
