use std::{env, str::FromStr, time::Duration};

use hypersweeper_common::DIMENSIONS;

use crate::error::GameError;

pub const DEFAULT_BOARD_SIZE: usize = 3;
pub const DEFAULT_MINE_COUNT: usize = 60;

/// Below this the toroidal neighbors of a cell stop being distinct.
pub const MIN_BOARD_SIZE: usize = 3;
pub const MAX_BOARD_SIZE: usize = 16;

const DEFAULT_WIN_SECRET: &str = "CTFZONE{default_flag_for_development}";

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173,http://localhost:8080,http://127.0.0.1:8080";

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Checks a board shape before anything is allocated for it.
pub fn validate_board(board_size: usize, mine_count: usize) -> Result<(), GameError> {
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&board_size) {
        return Err(GameError::InvalidConfiguration(format!(
            "board size {board_size} outside [{MIN_BOARD_SIZE}, {MAX_BOARD_SIZE}]"
        )));
    }

    let total_cells = board_size.pow(DIMENSIONS as u32);
    if mine_count >= total_cells {
        return Err(GameError::InvalidConfiguration(format!(
            "mine count {mine_count} exceeds total cells {total_cells}"
        )));
    }

    Ok(())
}

/// Board shape and the payload handed out on a win.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub board_size: usize,
    pub mine_count: usize,
    pub win_secret: String,
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self {
            board_size: env_or("BOARD_SIZE", DEFAULT_BOARD_SIZE),
            mine_count: env_or("MINE_COUNT", DEFAULT_MINE_COUNT),
            win_secret: env::var("CTF_FLAG").unwrap_or_else(|_| DEFAULT_WIN_SECRET.to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        validate_board(self.board_size, self.mine_count)
    }

    pub fn total_cells(&self) -> usize {
        self.board_size.saturating_pow(DIMENSIONS as u32)
    }

    pub fn mine_density(&self) -> f64 {
        self.mine_count as f64 / self.total_cells() as f64
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            mine_count: DEFAULT_MINE_COUNT,
            win_secret: DEFAULT_WIN_SECRET.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CleanupConfig {
    pub interval: Duration,
    pub max_session_age: Duration,
}

impl CleanupConfig {
    pub fn from_env() -> Self {
        Self {
            interval: Duration::from_secs(env_or("CLEANUP_INTERVAL_SECONDS", 60)),
            max_session_age: Duration::from_secs(env_or("SESSION_MAX_AGE_SECONDS", 86400)),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_session_age: Duration::from_secs(86400),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub game: GameConfig,
    pub cleanup: CleanupConfig,
    pub cors_origins: Vec<String>,
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        let origins =
            env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string());

        Self {
            game: GameConfig::from_env(),
            cleanup: CleanupConfig::from_env(),
            cors_origins: split_origins(&origins),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            cleanup: CleanupConfig::default(),
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
        }
    }
}
