//! Binary entrypoint for the agentforge HTTP server.
//!
//! Configuration comes from `AGENTFORGE_*` environment variables (see
//! [`ServerConfig`]); log filtering from `RUST_LOG`.

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use agentforge_server::config::ServerConfig;
use agentforge_server::router::build_router;
use agentforge_server::state::AppState;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "agentforge server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let state = AppState::new(&config)?;
    let app = build_router(state.clone());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        store = %config.store_path.display(),
        max_concurrent_runs = config.max_concurrent_runs,
        run_timeout_secs = state.runner.timeout().as_secs(),
        "agentforge server starting"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown(SHUTDOWN_GRACE).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
