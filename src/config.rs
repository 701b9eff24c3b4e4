use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

use crate::game::{LevelParser, RevealPacing, SessionSettings};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub levels_dir: String,
    /// Delay between revealed letters; 0 reveals as fast as the scheduler allows
    pub reveal_interval_ms: u64,
    pub event_channel_capacity: usize,
    /// Reject `WORD` records without a `right`/`down` direction instead of dropping them
    pub strict_directions: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
        };

        let game = GameConfig {
            levels_dir: env::var("LEVELS_DIR")
                .unwrap_or_else(|_| "./levels".to_string()),
            reveal_interval_ms: env::var("REVEAL_INTERVAL_MS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .context("REVEAL_INTERVAL_MS must be a number")?,
            event_channel_capacity: env::var("EVENT_CHANNEL_CAPACITY")
                .unwrap_or_else(|_| "256".to_string())
                .parse()
                .unwrap_or(256),
            strict_directions: env::var("STRICT_DIRECTIONS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("STRICT_DIRECTIONS must be true or false")?,
        };

        Ok(Config { server, game })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl GameConfig {
    pub fn parser(&self) -> LevelParser {
        LevelParser::new(self.strict_directions)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            strict_directions: self.strict_directions,
            pacing: RevealPacing::from_millis(self.reveal_interval_ms),
            event_capacity: self.event_channel_capacity,
        }
    }
}
