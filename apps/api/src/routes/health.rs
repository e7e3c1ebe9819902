use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::db::ping;
use crate::state::AppState;

/// GET /health
/// Returns service status, version, and database reachability.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = if ping(&state.db).await { "ok" } else { "unreachable" };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobmatch-api",
        "database": database
    }))
}
