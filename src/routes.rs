//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (applied in order)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │   Catch Panic    │ ← 500 internal_error if a handler panics
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │   Request ID     │ ← Adds X-Request-Id to the response
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          │
//!          ▼
//!      Handler
//! ```
//!
//! # Routes
//!
//! - `/service` - Greets the identity forwarded by the authorization proxy
//! - `/` - Echoes every received header
//! - `/health` - Liveness

use std::any::Any;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::error::AppError;
use crate::handlers;
use crate::middleware::{RequestIdExt, RequestIdLayer};
use crate::state::AppState;

/// Build the application router with all routes and middleware configured.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route(handlers::SERVICE_ROUTE, get(handlers::greet_identity))
        .route(handlers::ROOT_ROUTE, get(handlers::echo_headers))
        .route("/health", get(handlers::health_check));

    with_middleware(router).with_state(state)
}

/// Apply the middleware stack (order matters - applied bottom to top).
fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        // 1. Tracing, with the request ID assigned by the layer outside it
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                info_span!(
                    "http_request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = req.request_id().unwrap_or("unknown"),
                )
            }),
        )
        // 2. Request ID
        .layer(RequestIdLayer::new())
        // 3. Panics become a generic 500 - runs first in the request pipeline
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Convert a handler panic into the sanitized internal error response.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(details).into_response()
}
