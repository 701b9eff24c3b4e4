use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LevelList {
    pub levels: Vec<String>,
}

/// List the levels a session can be opened on
pub async fn list_levels(State(state): State<Arc<AppState>>) -> Json<LevelList> {
    Json(LevelList {
        levels: state.levels.names().map(str::to_string).collect(),
    })
}
