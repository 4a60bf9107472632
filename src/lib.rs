//! # Echo Upstream
//!
//! A plain-text HTTP upstream for checking that a front proxy (Envoy with
//! `ext_authz`) authorizes requests and forwards the authenticated identity.
//!
//! - `GET /service` answers `upstream.service: Hello <user> from behind Envoy!`
//!   using the identity header injected by the proxy (`x-current-user`)
//! - `GET /` answers with every header the upstream received
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Envoy + external authorization service           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (Catch Panic → Request ID → Trace)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (echo, health)                                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Identity lookup + response rendering                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use echo_upstream::{Config, EchoServer, utils};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = EchoServer::bind(config).await?;
//!     server.serve(utils::shutdown_signal()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Missing Identity
//!
//! By default a `/service` request without the identity header fails with
//! HTTP 500 and a `missing_identity` diagnostic. To greet an empty name
//! instead:
//! ```bash
//! MISSING_IDENTITY_POLICY=empty cargo run
//! ```

pub mod config;
pub mod echo;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use identity::{IdentityHeader, MissingIdentityPolicy};
pub use routes::build_router;
pub use server::EchoServer;
pub use state::AppState;
