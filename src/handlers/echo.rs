//! The two echo routes.
//!
//! # Endpoints
//!
//! - `GET /service` - Greets the identity forwarded by the authorization proxy
//! - `GET /` - Greets anonymously and lists every received header
//!
//! Both respond with `text/plain; charset=utf-8`.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{debug, instrument, warn};

use crate::echo::{headers_greeting, identity_greeting};
use crate::error::AppResult;
use crate::metrics;
use crate::state::AppState;

/// Route path for the identity greeting.
pub const SERVICE_ROUTE: &str = "/service";

/// Route path for the header dump.
pub const ROOT_ROUTE: &str = "/";

/// Identity greeting endpoint.
///
/// # Response Body
///
/// ```text
/// upstream.service: Hello alice from behind Envoy!
/// ```
///
/// # Errors
///
/// Returns `AppError::MissingIdentity` (HTTP 500) when the identity header
/// is absent and the policy is `reject`. With the `empty` policy the
/// greeting is rendered with an empty name instead.
#[instrument(skip_all)]
pub async fn greet_identity(State(state): State<AppState>, headers: HeaderMap) -> AppResult<String> {
    let identity_header = &state.config.identity_header;
    let policy = state.config.missing_identity_policy;

    if !identity_header.is_present(&headers) {
        warn!(
            header = identity_header.name(),
            policy = %policy,
            "Request arrived without an identity header"
        );
        metrics::record_missing_identity(policy.as_str());
    }

    let identity = identity_header.resolve(&headers, policy).inspect_err(|_| {
        metrics::record_request(SERVICE_ROUTE, StatusCode::INTERNAL_SERVER_ERROR.as_u16())
    })?;

    debug!(identity = %identity, "Greeting forwarded identity");
    metrics::record_request(SERVICE_ROUTE, StatusCode::OK.as_u16());
    Ok(identity_greeting(&identity))
}

/// Header echo endpoint. Always succeeds.
///
/// # Response Body
///
/// ```text
/// upstream.service: Hello from behind Envoy!
/// ----
/// host: localhost:8080\r\n
/// user-agent: curl/8.5.0\r\n
/// \r\n
/// ----
/// ```
#[instrument(skip_all, fields(header_count = headers.len()))]
pub async fn echo_headers(headers: HeaderMap) -> String {
    metrics::record_request(ROOT_ROUTE, StatusCode::OK.as_u16());
    headers_greeting(&headers)
}
