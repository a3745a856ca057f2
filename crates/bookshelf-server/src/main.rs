//! Entry point for the bookshelf-server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use bookshelf_core::DataStore;
use bookshelf_server::{AppState, LogFormat, ServerConfig, StorageBackend, build_app};
use bookshelf_store::{MemoryStore, Store, StoreConfig};
use http::HeaderValue;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_format);

    tracing::info!("Starting bookshelf-server");
    tracing::info!(
        "Configuration: port={}, log_level={}, storage={}",
        config.port,
        config.log_level,
        config.storage
    );

    // Open the store
    let store: Arc<dyn DataStore> = match config.storage {
        StorageBackend::Postgres => {
            let store_config = StoreConfig::from_env()?;
            Arc::new(Store::connect(store_config).await?)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; books are lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    // Build CORS layer
    let cors = build_cors_layer(&config.cors_allowed_origins)?;

    // Build application state and router
    let addr = config.socket_addr();
    let state = AppState::new(store, config);
    let app = build_app(state).layer(cors);

    // Create listener
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG`, when set, overrides the configured level.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init(),
    }
}

/// Build CORS layer from configuration.
fn build_cors_layer(allowed_origins: &str) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    let allow_origin = if allowed_origins == "*" {
        AllowOrigin::any()
    } else {
        // Parse comma-separated origins
        let origins = allowed_origins
            .split(',')
            .map(|s| HeaderValue::from_str(s.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| format!("invalid CORS origin in {:?}: {}", allowed_origins, err))?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
