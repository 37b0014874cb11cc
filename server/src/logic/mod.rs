use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use hypersweeper_common::{
    BoardMetadata, Coord, GameState, MAX_NEIGHBORS,
    protocol::{FlagAction, FlagResponse, StatsResponse},
};
use tracing::{debug, info, instrument, warn};

use crate::{config::GameConfig, data::Board, error::GameError};

pub mod cascade;
pub mod generator;
pub mod topology;

use cascade::cascade_from_neighbors;
use topology::neighbor_mine_count;

/// What a successful reveal did.
#[derive(Debug, Clone, PartialEq)]
pub enum RevealOutcome {
    MineHit { coord: Coord, reveals_used: u32 },
    Safe(SafeReveal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SafeReveal {
    pub coord: Coord,
    pub neighbor_mines: u8,
    /// Cells opened by the cascade, excluding `coord` itself.
    pub auto_revealed: Vec<(Coord, u8)>,
    pub state: GameState,
    pub reveals_used: u32,
    /// Present only on the reveal that won the game.
    pub prize: Option<Prize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prize {
    pub total_safe_cells: usize,
    pub secret: String,
}

/// One player's game.
///
/// `reveals_used` counts manual reveals only; cascade cells count toward
/// the win condition through `revealed` but not toward this counter.
pub struct Session {
    config: Arc<GameConfig>,
    board: Board,
    revealed: HashSet<Coord>,
    flagged: HashSet<Coord>,
    state: GameState,
    mine_hit: Option<Coord>,
    reveals_used: u32,
    created_at: Instant,
    metadata: BoardMetadata,
}

impl Session {
    #[instrument(level = "trace", skip(config))]
    pub fn new(config: Arc<GameConfig>, seed: Option<u64>) -> Result<Self, GameError> {
        let (board, metadata) = generator::generate(config.board_size, config.mine_count, seed)?;
        Ok(Self::with_metadata(config, board, metadata))
    }

    /// Starts a game over a prepared board.
    pub fn from_board(config: Arc<GameConfig>, board: Board) -> Self {
        let metadata = BoardMetadata {
            generation_time: 0.0,
            mine_count: board.mine_count(),
            board_size: board.size(),
            total_cells: board.total_cells(),
            mine_density: board.mine_count() as f64 / board.total_cells() as f64,
        };
        Self::with_metadata(config, board, metadata)
    }

    fn with_metadata(config: Arc<GameConfig>, board: Board, metadata: BoardMetadata) -> Self {
        Self {
            config,
            board,
            revealed: HashSet::new(),
            flagged: HashSet::new(),
            state: GameState::Playing,
            mine_hit: None,
            reveals_used: 0,
            created_at: Instant::now(),
            metadata,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn revealed(&self) -> &HashSet<Coord> {
        &self.revealed
    }

    pub fn flagged(&self) -> &HashSet<Coord> {
        &self.flagged
    }

    pub fn mine_hit(&self) -> Option<Coord> {
        self.mine_hit
    }

    pub fn reveals_used(&self) -> u32 {
        self.reveals_used
    }

    pub fn metadata(&self) -> &BoardMetadata {
        &self.metadata
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    fn has_won(&self) -> bool {
        self.revealed.len() >= self.board.safe_cells()
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        if self.state.is_terminal() {
            debug!("Rejecting move on finished game ({})", self.state);
            return Err(GameError::GameOver(self.state));
        }
        Ok(())
    }

    fn ensure_in_bounds(&self, coord: Coord) -> Result<(), GameError> {
        if !coord.in_bounds(self.board.size()) {
            warn!("Invalid position {}", coord);
            return Err(GameError::InvalidCoordinate(coord));
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self), fields(coord = %coord))]
    pub fn reveal(&mut self, coord: Coord) -> Result<RevealOutcome, GameError> {
        self.ensure_playing()?;
        self.ensure_in_bounds(coord)?;
        if self.revealed.contains(&coord) {
            debug!("Cell {} already revealed", coord);
            return Err(GameError::AlreadyRevealed(coord));
        }

        if self.board.is_mine(coord) {
            warn!("Player hit mine at {} - game over!", coord);
            self.state = GameState::Lost;
            self.mine_hit = Some(coord);
            self.revealed.insert(coord);
            self.reveals_used += 1;
            return Ok(RevealOutcome::MineHit {
                coord,
                reveals_used: self.reveals_used,
            });
        }

        let neighbor_mines = neighbor_mine_count(&self.board, coord);
        self.revealed.insert(coord);
        self.reveals_used += 1;

        let auto_revealed = if neighbor_mines == 0 {
            let cascade = cascade_from_neighbors(&self.board, &mut self.revealed, coord);
            debug!("Cascade from {} revealed {} cells", coord, cascade.len());
            cascade
        } else {
            Vec::new()
        };

        let prize = if self.has_won() {
            self.state = GameState::Won;
            info!(
                "Game won after {} reveals! All {} safe cells revealed.",
                self.reveals_used,
                self.revealed.len()
            );
            Some(Prize {
                total_safe_cells: self.revealed.len(),
                secret: self.config.win_secret.clone(),
            })
        } else {
            None
        };

        Ok(RevealOutcome::Safe(SafeReveal {
            coord,
            neighbor_mines,
            auto_revealed,
            state: self.state,
            reveals_used: self.reveals_used,
            prize,
        }))
    }

    #[instrument(level = "trace", skip(self), fields(coord = %coord))]
    pub fn toggle_flag(&mut self, coord: Coord) -> Result<FlagResponse, GameError> {
        self.ensure_playing()?;
        self.ensure_in_bounds(coord)?;

        let is_flagged = if self.flagged.remove(&coord) {
            debug!("Cell {} unflagged", coord);
            false
        } else {
            self.flagged.insert(coord);
            debug!("Cell {} flagged", coord);
            true
        };

        Ok(FlagResponse {
            is_flagged,
            action: if is_flagged {
                FlagAction::Flagged
            } else {
                FlagAction::Unflagged
            },
            coordinates: coord,
            total_flagged: self.flagged.len(),
        })
    }

    pub fn stats(&self) -> StatsResponse {
        StatsResponse {
            revealed_cells: self.revealed.len(),
            flagged_cells: self.flagged.len(),
            total_cells: self.board.total_cells(),
            mine_count: self.board.mine_count(),
            max_neighbors: MAX_NEIGHBORS,
            reveals_used: self.reveals_used,
            game_state: self.state,
            session_age_seconds: self.age().as_secs_f64(),
            board_metadata: self.metadata.clone(),
        }
    }

    pub fn is_mine_at(&self, coord: Coord) -> bool {
        self.board.is_mine(coord)
    }

    pub fn mine_coordinates(&self) -> Vec<Coord> {
        self.board.mine_coordinates()
    }
}
