pub mod config;
pub mod game;
pub mod levels;
pub mod models;
pub mod routes;
pub mod websocket;

use std::time::Instant;

use config::Config;
use dashmap::DashMap;
use levels::LevelLibrary;
use uuid::Uuid;

/// Bookkeeping for a connected puzzle session
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub level: String,
    pub started_at: Instant,
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub levels: LevelLibrary,
    /// Sessions with an open WebSocket, keyed by session id
    pub sessions: DashMap<Uuid, ActiveSession>,
}

impl AppState {
    pub fn new(config: Config, levels: LevelLibrary) -> Self {
        Self {
            config,
            levels,
            sessions: DashMap::new(),
        }
    }
}
