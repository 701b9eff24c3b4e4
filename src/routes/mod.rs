pub mod health;
pub mod levels;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/levels", get(levels::list_levels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, levels::LevelLibrary, ActiveSession};
    use axum::extract::State;
    use std::time::{Duration, Instant};
    use uuid::Uuid;

    fn test_state() -> Arc<AppState> {
        let config = Config {
            server: crate::config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            game: crate::config::GameConfig {
                levels_dir: "./levels".to_string(),
                reveal_interval_ms: 0,
                event_channel_capacity: 16,
                strict_directions: true,
            },
        };
        Arc::new(AppState::new(config, LevelLibrary::empty()))
    }

    #[tokio::test]
    async fn test_health_reports_active_sessions() {
        let state = test_state();
        let body = health::health_check(State(Arc::clone(&state))).await.0;
        assert_eq!(body["active_sessions"], 0);
        assert!(body["oldest_session_secs"].is_null());

        // One session started 90s ago, one just now
        let Some(started_at) = Instant::now().checked_sub(Duration::from_secs(90)) else {
            return;
        };
        state.sessions.insert(
            Uuid::new_v4(),
            ActiveSession {
                level: "intro".to_string(),
                started_at,
            },
        );
        state.sessions.insert(
            Uuid::new_v4(),
            ActiveSession {
                level: "intro".to_string(),
                started_at: Instant::now(),
            },
        );

        let body = health::health_check(State(Arc::clone(&state))).await.0;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 2);
        assert!(body["oldest_session_secs"].as_u64().unwrap() >= 90);
    }

    #[tokio::test]
    async fn test_empty_level_list() {
        let body = levels::list_levels(State(test_state())).await.0;
        assert!(body.levels.is_empty());
    }
}
