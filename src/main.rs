use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use echo_upstream::{AppError, Config, EchoServer, metrics, utils};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    info!("Starting Echo Upstream v{}", env!("CARGO_PKG_VERSION"));

    match run().await {
        Ok(()) => ExitCode::from(exitcode::OK as u8),
        Err(exit_code) => ExitCode::from(exit_code as u8),
    }
}

/// Initialize logging. `LOG_FORMAT=json` switches to structured JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Run the application, returning an exit code on error.
async fn run() -> Result<(), exitcode::ExitCode> {
    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {e}");
        exitcode::CONFIG
    })?;
    info!(
        host = %config.host,
        port = %config.port,
        identity_header = config.identity_header.name(),
        missing_identity_policy = %config.missing_identity_policy,
        "Configuration loaded"
    );

    if let Some(metrics_addr) = config.metrics_addr() {
        metrics::try_init_metrics(metrics_addr);
    }

    let server = EchoServer::bind(config).await.map_err(|e| {
        error!("{e}");
        match e {
            AppError::ConfigError(_) => exitcode::CONFIG,
            _ => exitcode::UNAVAILABLE,
        }
    })?;

    info!("API endpoints:");
    info!("  GET  /service - Greet the forwarded identity");
    info!("  GET  /        - Echo request headers");
    info!("  GET  /health  - Health check");

    server.serve(utils::shutdown_signal()).await.map_err(|e| {
        error!("Server error: {e}");
        exitcode::SOFTWARE
    })?;

    info!("Server shutdown complete");
    Ok(())
}
