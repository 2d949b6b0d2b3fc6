//! Environment-driven configuration.

use crate::error::AppError;

/// Minimum players before a pending game can start.
pub const MIN_PLAYERS: usize = 4;

const DEFAULT_PLAYER_LIMIT: usize = 8;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub redis_url: String,
    /// Maximum players per game; joins beyond this are rejected.
    pub player_limit: usize,
    /// Optional path to a newline-delimited word list. Falls back to the
    /// bundled list when unset.
    pub wordlist_path: Option<String>,
}

impl AppConfig {
    /// Environment variables must be set by the runtime environment
    /// (docker env_file, or sourced manually for local dev).
    pub fn from_env() -> Result<Self, AppError> {
        let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("BACKEND_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::config("BACKEND_PORT must be a valid port number"))?,
            Err(_) => 8080,
        };
        let redis_url =
            std::env::var("REDIS_URL").map_err(|_| AppError::config("REDIS_URL must be set"))?;
        let player_limit = match std::env::var("PLAYER_LIMIT") {
            Ok(raw) => {
                let limit = raw
                    .parse::<usize>()
                    .map_err(|_| AppError::config("PLAYER_LIMIT must be a number"))?;
                if limit < MIN_PLAYERS {
                    return Err(AppError::config(format!(
                        "PLAYER_LIMIT must be at least {MIN_PLAYERS}"
                    )));
                }
                limit
            }
            Err(_) => DEFAULT_PLAYER_LIMIT,
        };
        let wordlist_path = std::env::var("WORDLIST_PATH").ok();

        Ok(Self {
            host,
            port,
            redis_url,
            player_limit,
            wordlist_path,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            redis_url: "redis://localhost:6379".to_string(),
            player_limit: DEFAULT_PLAYER_LIMIT,
            wordlist_path: None,
        }
    }
}
