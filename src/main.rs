//! Conveyor Belt Predictive Maintenance Server
//!
//! Trains (or reloads) the power consumption model at startup, then serves
//! scoring over HTTP.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use conveyor_scorer::{config, create_router, db, handlers, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "conveyor_scorer=debug,tower_http=debug".into());
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Conveyor scorer starting...");
    for setting in config::rejected_settings() {
        tracing::warn!("Ignoring {}", setting);
    }

    // Database is optional: scoring works from artifacts alone
    let pool = match &config.database_url {
        Some(url) => {
            tracing::info!("Database: {}", url.split('@').last().unwrap_or("***"));
            let pool = db::create_pool(url)?;
            if let Err(e) = db::run_migrations(&pool, &config.collection_name).await {
                tracing::warn!("Database migrations failed, continuing without them: {}", e);
            }
            Some(pool)
        }
        None => {
            tracing::info!("No DATABASE_URL set, record count endpoint disabled");
            None
        }
    };

    let state = AppState::new(config.clone(), pool);
    bootstrap_model(&state).await;

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Train from the configured source, fall back to persisted artifacts.
/// With neither, serve anyway; `/health` reports 503 until a model lands.
async fn bootstrap_model(state: &AppState) {
    tracing::info!("Initializing model...");

    let train_err = match handlers::model::train_from_source(state).await {
        Ok(model) => {
            tracing::info!("✓ Model {} trained and saved", model.id);
            return;
        }
        Err(e) => e,
    };
    tracing::warn!("Training at startup failed: {:?}", train_err);

    match handlers::model::reload_from_disk(state).await {
        Ok(model) => tracing::info!("✓ Model {} loaded from disk", model.id),
        Err(e) => tracing::error!("✗ Failed to initialize model: {:?}", e),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
