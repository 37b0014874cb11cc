use hypersweeper_common::{Coord, GameState};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Board generation placed {actual} mines, expected {expected}")]
    GenerationInvariantViolation { expected: usize, actual: usize },
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinate(Coord),
    #[error("Cell {0} already revealed")]
    AlreadyRevealed(Coord),
    #[error("Game is over (state: {0}). Please restart to play again.")]
    GameOver(GameState),
}

impl GameError {
    /// Server-side faults, as opposed to requests the caller got wrong.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            GameError::InvalidConfiguration(_) | GameError::GenerationInvariantViolation { .. }
        )
    }
}
