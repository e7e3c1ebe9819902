mod config;
mod db;
mod errors;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::matching::engine::MatchingEngine;
use crate::matching::postgres::PgStore;
use crate::matching::profiles::{CachedProfiles, PgProfiles};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&db).await?;

    // Likes and matches share one store; uniqueness is enforced by the schema
    let store = Arc::new(PgStore::new(db.clone()));
    let profiles = Arc::new(CachedProfiles::new(
        PgProfiles::new(db.clone()),
        config.profile_cache_ttl,
    ));
    info!(
        "Profile cache TTL: {}s",
        config.profile_cache_ttl.as_secs()
    );
    let engine = Arc::new(MatchingEngine::new(store.clone(), store, profiles));

    let state = AppState { db, engine };

    let app = build_router(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the swipe UI host once it is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
