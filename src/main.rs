use anyhow::Context;
use dotenvy::dotenv;
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use video_splitter::app;
use video_splitter::config::settings::AppConfig;
use video_splitter::state::AppState;
use video_splitter::workers::cleanup::{CleanupScheduler, start_cleanup_worker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::from_env();
    if !config.requires_api_key() {
        warn!("SPLITTER_API_KEY is empty, /split is open to anyone");
    }

    let (cleanup, cleanup_rx) = CleanupScheduler::new(config.cleanup_delay);
    tokio::spawn(start_cleanup_worker(cleanup_rx));

    let state = AppState::new(config, cleanup);
    state
        .storage
        .ensure_dirs()
        .await
        .context("failed to create storage directories")?;

    let surviving = state
        .storage
        .reconcile(state.config.cleanup_delay)
        .await
        .context("failed to reconcile job storage")?;
    for job in surviving {
        state
            .cleanup
            .schedule_at(job.label, job.dir, Instant::now() + job.remaining);
    }

    info!(
        "Using ffmpeg at {} (retention {}s)",
        state.ffmpeg.binary().display(),
        state.cleanup.retention().as_secs()
    );

    let addr = format!("0.0.0.0:{}", state.config.server_port);
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("VideoSplitter listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
