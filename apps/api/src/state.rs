use std::sync::Arc;

use sqlx::PgPool;

use crate::matching::engine::MatchingEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Backed by Postgres stores and a cached profile lookup in production.
    pub engine: Arc<MatchingEngine>,
}
