//! Axum API server binary.

use std::net::SocketAddr;

use anyhow::{anyhow, Context};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stroke_api::{create_router, metrics, ApiConfig, AppState};
use stroke_coach::CoachConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    let config = ApiConfig::from_env();
    init_tracing(config.is_production())?;

    info!(environment = %config.environment, "Starting stroke-api");

    let coach = CoachConfig::from_env();
    info!(
        host = %config.host,
        port = config.port,
        model = %coach.model,
        frames = config.frames_per_video,
        "API config loaded"
    );

    if !coach.has_api_key() {
        warn!("ANTHROPIC_API_KEY not set; analyses will fail until it is configured");
    }

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir.display()))?;
    info!(upload_dir = %config.upload_dir.display(), "Upload folder ready");

    let metrics_handle = if config.metrics_enabled {
        info!("Prometheus metrics enabled at /metrics");
        Some(metrics::init_metrics().context("Failed to install Prometheus recorder")?)
    } else {
        None
    };

    let state = AppState::new(config.clone(), coach);
    let app = create_router(state, metrics_handle);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Colored output for dev, JSON in production or when `LOG_FORMAT=json`.
fn init_tracing(production: bool) -> anyhow::Result<()> {
    let use_json = production
        || std::env::var("LOG_FORMAT")
            .map(|v| v.to_lowercase() == "json")
            .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("stroke_api=info,stroke_media=info,stroke_coach=info,tower_http=warn"))?;

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
