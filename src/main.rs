//! Cinematch Engine
//!
//! Movie and series recommendation service.
//!
//! # Architecture
//!
//! - **Snapshot Store**: Catalog and user profiles loaded from a JSON snapshot
//! - **Recommendation Engine**: Content, collaborative, hybrid, smart, trending and by-genre
//! - **API Server**: REST endpoints for the delivery layer
//!
//! # Graceful Shutdown
//!
//! The engine handles SIGTERM and SIGINT signals and lets in-flight requests
//! complete before exiting.

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinematch::api;
use cinematch::catalog::SnapshotStore;
use cinematch::config::Config;
use cinematch::recommendation::RecommendationEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with structured logging
    init_tracing();

    info!("═══════════════════════════════════════════════════════════════");
    info!("  🎬 Cinematch Engine v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════════════════════════");
    info!("  Components:");
    info!("    • Snapshot Store (catalog + profiles)");
    info!("    • Recommendation Engine");
    info!("    • REST API Server");
    info!("═══════════════════════════════════════════════════════════════");

    // Load configuration
    let config = Config::from_env().context("failed to load configuration")?;
    info!("✅ Configuration loaded and validated");

    #[cfg(feature = "prometheus")]
    init_metrics_exporter(config.metrics_port)?;

    // Load snapshot
    info!("📦 Loading snapshot from {}...", config.snapshot.path.display());
    let store = SnapshotStore::load(&config.snapshot.path).with_context(|| {
        format!(
            "failed to load snapshot from {}",
            config.snapshot.path.display()
        )
    })?;
    let snapshot = store.snapshot();
    info!(
        "✅ Snapshot loaded: {} movies, {} series, {} people, {} users",
        snapshot.movies.len(),
        snapshot.series.len(),
        snapshot.people.len(),
        snapshot.users.len()
    );

    let engine = RecommendationEngine::from_store(store, config.recommendation.clone());
    info!("✅ Recommendation engine ready");

    info!("═══════════════════════════════════════════════════════════════");
    info!("  📡 API: http://{}:{}", config.api.host, config.api.port);
    info!(
        "  🔗 Health: http://{}:{}/health",
        config.api.host, config.api.port
    );
    info!("═══════════════════════════════════════════════════════════════");

    // Serve until SIGINT/SIGTERM, then let in-flight requests complete
    api::start_server(engine, &config.api, shutdown_signal())
        .await
        .context("API server error")?;

    info!("👋 Cinematch Engine stopped gracefully");
    Ok(())
}

/// Initialize structured logging with tracing
///
/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Default log levels
        EnvFilter::new("cinematch_engine=debug,cinematch=debug,tower_http=debug,info")
    });

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(std::env::var("NO_COLOR").is_err()),
            )
            .init();
    }
}

/// Install the Prometheus recorder and its scrape listener
#[cfg(feature = "prometheus")]
fn init_metrics_exporter(port: u16) -> Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("failed to install metrics exporter")?;

    info!("📈 Prometheus metrics on port {}", port);
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("📴 Shutdown signal received, draining requests");
}
