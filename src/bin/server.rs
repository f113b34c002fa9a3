//! Pricecast Server - price movement prediction service
//!
//! Serves predictions over HTTP and retrains the classifier from the tick
//! store once at startup (in the background) and whenever `/train` is hit.
//!
//! # Usage
//! ```sh
//! DATABASE_URL=sqlite://data/ticks.db PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `DATABASE_URL` - Tick store (default: sqlite://data/ticks.db)
//! - `BIND_ADDRESS` / `PORT` - Listen address (default: 0.0.0.0:8000)
//! - `STARTUP_TRAINING_DELAY_SECS` - Wait before the first training run (default: 15)
//! - `TRAINING_TIMEOUT_SECS` - Abort training runs that take longer (default: unset)
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::{Context, Result};
use pricecast::application::ml::{ModelCache, TrainingService};
use pricecast::config::Config;
use pricecast::infrastructure::{Database, SqliteTickRepository};
use pricecast::interfaces::rest::{AppState, create_router};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Pricecast Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Database={}, Symbol={:?}, LookAhead={}, Trees={}",
        config.database.url,
        config.database.symbol,
        config.training.look_ahead,
        config.training.n_trees
    );

    let db = Database::new(&config.database.url).await?;
    let repository = Arc::new(
        SqliteTickRepository::new(db.pool.clone()).with_symbol(config.database.symbol.clone()),
    );

    let cache = Arc::new(ModelCache::new());
    let training = Arc::new(TrainingService::new(
        repository,
        cache,
        config.training.to_training_config(),
    ));

    // Fire-and-forget: the outcome is only logged.
    training.spawn_startup_training(config.training.startup_delay());

    let state = Arc::new(AppState::new(training));
    let app = create_router(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received. Exiting...");
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}
