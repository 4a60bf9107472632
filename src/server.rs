//! Listener lifecycle.
//!
//! The listening socket is the only process-wide resource. [`EchoServer::bind`]
//! acquires it at startup and [`EchoServer::serve`] consumes the server,
//! releasing the socket once the shutdown future resolves and in-flight
//! requests have drained.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::{TcpListener, lookup_host};
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::routes::build_router;
use crate::state::AppState;

/// Resolve `addr` to the first socket address it names.
///
/// An unparseable or unresolvable address is operator error, not an
/// unavailable socket, so both surface as `ConfigError`.
async fn resolve_addr(addr: &str) -> AppResult<SocketAddr> {
    lookup_host(addr)
        .await
        .map_err(|e| AppError::ConfigError(format!("Invalid server address {addr}: {e}")))?
        .next()
        .ok_or_else(|| {
            AppError::ConfigError(format!("Server address {addr} resolved to no addresses"))
        })
}

/// A bound, not yet serving, echo server.
pub struct EchoServer {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl EchoServer {
    /// Bind the listener described by `config` and build the router.
    ///
    /// Binding port 0 picks an ephemeral port; see [`EchoServer::local_addr`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if the address does not resolve and
    /// `AppError::Bind` if the socket cannot be bound.
    pub async fn bind(config: Config) -> AppResult<Self> {
        let addr = config.server_addr();
        let resolved = resolve_addr(&addr).await?;
        let listener = TcpListener::bind(resolved)
            .await
            .map_err(|source| AppError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let router = build_router(AppState::new(config));

        Ok(Self {
            listener,
            router,
            local_addr,
        })
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve requests until `shutdown` resolves, then drain and release the socket.
    pub async fn serve<F>(self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Server listening on http://{}", self.local_addr);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!(addr = %self.local_addr, "Listener released");
        Ok(())
    }
}
