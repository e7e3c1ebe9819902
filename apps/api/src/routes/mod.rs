pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/likes", post(handlers::handle_record_like))
        .route("/api/v1/likes/incoming", get(handlers::handle_pending_likes))
        .route("/api/v1/matches", get(handlers::handle_list_matches))
        .with_state(state)
}
