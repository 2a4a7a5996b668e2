use bvol_http::{AppState, ServerConfig, router};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = ServerConfig::parse();
    let state = AppState::native(&cfg.plots_dir)?;
    let app = router(state, cfg.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(cfg.bind).await?;
    tracing::info!(
        addr = %cfg.bind,
        plots_dir = %cfg.plots_dir.display(),
        "bvol-http listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
