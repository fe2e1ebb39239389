//! Showcase - persistence core of a portfolio site
//!
//! Serves the admin API over the cached store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showcase::themes::scan_themes;
use showcase::{create_router, AppState, CachedDatabase, Config, RecordCache, Store};

/// Main entry point for the showcase server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the store and start the cache with its sweep task
/// 4. Scan installed themes and bootstrap the store
/// 5. Start HTTP server on configured port
/// 6. On SIGINT/SIGTERM, drain requests, then finalize the cache and close the store
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showcase=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting showcase server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: database={}, themes={}, default_ttl={}s, eviction_interval={}s, port={}",
        config.database_path.display(),
        config.themes_path.display(),
        config.default_ttl,
        config.eviction_interval,
        config.server_port
    );

    let store = Arc::new(
        Store::open(&config.database_path)
            .with_context(|| format!("opening {}", config.database_path.display()))?,
    );
    let cache = RecordCache::start(config.default_ttl(), config.eviction_interval());
    info!("Cache started");

    let db = CachedDatabase::new(store.clone(), cache.clone());

    let themes = scan_themes(&config.themes_path);
    info!("Found {} theme(s)", themes.len());

    let setup_db = db.clone();
    let configuration = tokio::task::spawn_blocking(move || setup_db.setup(&themes))
        .await
        .context("setup task failed")?
        .context("setup failed")?;
    info!(theme = %configuration.current_theme_path, "Store ready");

    let app = create_router(AppState::new(db));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    cache.finalize();
    if let Err(e) = store.close() {
        error!(error = %e, "Failed to close store");
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
