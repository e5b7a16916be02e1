//! CoffeeCraft Storefront - catalog and cart service.
//!
//! This binary serves the storefront JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework for the JSON API
//! - Static catalog, built in or loaded from `COFFEECRAFT_CATALOG_PATH`
//! - Cart persisted to a file-backed key-value store after every change

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use coffeecraft_storefront::catalog::Catalog;
use coffeecraft_storefront::config::{LogFormat, StorefrontConfig};
use coffeecraft_storefront::routes;
use coffeecraft_storefront::state::AppState;
use coffeecraft_storefront::storage::FileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with `EnvFilter`.
///
/// Defaults to info level for our crate if `RUST_LOG` is not set.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coffeecraft_storefront=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    init_tracing(config.log_format);

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path).expect("Failed to load catalog"),
        None => Catalog::builtin(),
    };
    tracing::info!(products = catalog.len(), "Catalog ready");

    let store = Arc::new(FileStore::new(config.storage_dir.clone()));
    tracing::info!(dir = %store.dir().display(), "Using file-backed cart storage");

    let state = AppState::new(config.clone(), catalog, store);
    let app = routes::app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
