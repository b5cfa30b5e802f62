use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use restyle_api::config::ServerConfig;
use restyle_api::router::build_app_router;
use restyle_api::state::AppState;
use restyle_core::styles::{StyleCatalog, StyleRegistry};
use restyle_history::{HistoryStore, HistoryWriter};
use restyle_imagegen::{ImageApiConfig, ImageEditApi};
use restyle_pipeline::{ArtifactStore, GenerationOrchestrator};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "restyle_api=debug,restyle_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Artifact directories ---
    let store = Arc::new(ArtifactStore::new(&config.input_dir, &config.output_dir));
    store
        .ensure_dirs()
        .await
        .expect("Failed to create artifact directories");
    tracing::info!(
        input_dir = %config.input_dir.display(),
        output_dir = %config.output_dir.display(),
        "Artifact directories ready",
    );

    // --- Style catalog ---
    let styles = match StyleRegistry::load(&config.styles_file) {
        Ok(registry) => {
            tracing::info!(count = registry.snapshot().len(), "Style catalog loaded");
            registry
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to load style catalog, starting empty until reloaded",
            );
            StyleRegistry::from_catalog(&config.styles_file, StyleCatalog::default())
        }
    };
    let styles = Arc::new(styles);

    // --- Image API client ---
    let api_config = ImageApiConfig::from_env();
    tracing::info!(api = ?api_config, "Image API client configured");
    let editor = Arc::new(ImageEditApi::new(api_config));

    // --- Orchestrator ---
    let orchestrator = Arc::new(GenerationOrchestrator::new(
        editor,
        Arc::clone(&store),
        Arc::clone(&styles),
        config.max_concurrent_transforms,
    ));
    tracing::info!(
        max_concurrent = orchestrator.max_concurrent(),
        "Generation orchestrator ready",
    );

    // --- History writer ---
    let history = Arc::new(HistoryStore::new(&config.history_file));
    let (recorder, history_handle) = HistoryWriter::spawn(Arc::clone(&history));
    tracing::info!(path = %config.history_file.display(), "History writer started");

    // --- App state ---
    let state = AppState {
        styles,
        orchestrator,
        history,
        recorder,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // The router (and every recorder clone in its state) is gone once the
    // server returns, which closes the history channel.
    if tokio::time::timeout(Duration::from_secs(5), history_handle)
        .await
        .is_err()
    {
        tracing::warn!("History writer did not drain within 5s");
    } else {
        tracing::info!("History writer drained");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
