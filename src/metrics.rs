//! Prometheus metrics for application observability.
//!
//! Metrics are exposed via a dedicated HTTP listener when `METRICS_PORT` is
//! non-zero, so the scrape endpoint never shows up in the echoed routes.
//!
//! # Available Metrics
//!
//! ## Counters
//! - `echo_requests_total` - Requests served (labels: route, status)
//! - `echo_missing_identity_total` - `/service` requests without an identity (label: policy)
//!
//! # Usage
//!
//! ```rust,ignore
//! use echo_upstream::metrics::{init_metrics, record_request};
//!
//! // Initialize metrics (call once at startup)
//! init_metrics("0.0.0.0:9090".parse()?)?;
//!
//! record_request("/service", 200);
//! ```

use std::net::SocketAddr;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};

/// Metric names as constants for consistency.
pub mod names {
    pub const REQUESTS_TOTAL: &str = "echo_requests_total";
    pub const MISSING_IDENTITY_TOTAL: &str = "echo_missing_identity_total";
}

/// Initialize the Prometheus metrics exporter.
///
/// Sets up metric descriptions and starts the Prometheus HTTP listener
/// on `metrics_addr`.
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        names::REQUESTS_TOTAL,
        "Total number of requests served by the echo routes"
    );
    describe_counter!(
        names::MISSING_IDENTITY_TOTAL,
        "Total number of /service requests that arrived without an identity header"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Record a served request.
pub fn record_request(route: &'static str, status: u16) {
    counter!(names::REQUESTS_TOTAL, "route" => route, "status" => status.to_string()).increment(1);
}

/// Record a `/service` request that carried no identity.
pub fn record_missing_identity(policy: &'static str) {
    counter!(names::MISSING_IDENTITY_TOTAL, "policy" => policy).increment(1);
}
