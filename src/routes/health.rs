use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let oldest_session_secs = state
        .sessions
        .iter()
        .map(|entry| entry.value().started_at.elapsed().as_secs())
        .max();

    Json(json!({
        "status": "ok",
        "service": "word-search-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "active_sessions": state.sessions.len(),
        "oldest_session_secs": oldest_session_secs,
    }))
}
