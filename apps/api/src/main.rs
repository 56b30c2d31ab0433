mod analysis;
mod config;
mod documents;
mod errors;
mod history;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, HistoryBackend};
use crate::documents::NativeConverter;
use crate::history::storage::{FileStore, KeyValueStore, MemoryStore, RedisStore};
use crate::history::HistoryStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize history persistence
    let storage = build_storage(&config)?;
    let history = Arc::new(HistoryStore::new(storage));
    info!(
        "History store initialized ({} entries)",
        history.load().await.len()
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        converter: Arc::new(NativeConverter),
        history,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Selects the key-value backend for the history log.
fn build_storage(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let storage: Arc<dyn KeyValueStore> = match config.history_backend {
        HistoryBackend::Memory => {
            info!("History backend: memory (not persisted across restarts)");
            Arc::new(MemoryStore::new())
        }
        HistoryBackend::File => {
            let store = FileStore::new(&config.history_dir);
            info!("History backend: file ({})", store.dir().display());
            Arc::new(store)
        }
        HistoryBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required for the redis history backend")?;
            info!("History backend: redis");
            Arc::new(RedisStore::open(url).context("Invalid REDIS_URL")?)
        }
    };
    Ok(storage)
}
