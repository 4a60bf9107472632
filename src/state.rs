//! Shared application state for Axum handlers.
//!
//! The state is read-only after startup: configuration behind an `Arc` and
//! the process start time. Handlers never write to it, so concurrent
//! requests need no coordination.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;

/// Shared application state for Axum handlers.
///
/// Cloned for each request; cloning only bumps the `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Timestamp when the application started
    pub started_at: Instant,
}

impl AppState {
    /// Create new application state from configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Seconds elapsed since the state was created.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
