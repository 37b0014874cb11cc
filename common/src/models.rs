use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of board axes.
pub const DIMENSIONS: usize = 5;

/// Neighbors per cell with cross adjacency on the torus.
pub const MAX_NEIGHBORS: usize = 2 * DIMENSIONS;

/// A cell position on the 5D board.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub w: usize,
    pub v: usize,
}

impl Coord {
    pub const ORIGIN: Coord = Coord::new(0, 0, 0, 0, 0);

    pub const fn new(x: usize, y: usize, z: usize, w: usize, v: usize) -> Self {
        Self { x, y, z, w, v }
    }

    pub const fn from_axes(axes: [usize; DIMENSIONS]) -> Self {
        Self::new(axes[0], axes[1], axes[2], axes[3], axes[4])
    }

    pub const fn axes(&self) -> [usize; DIMENSIONS] {
        [self.x, self.y, self.z, self.w, self.v]
    }

    /// True when every axis lies in `[0, size)`.
    pub fn in_bounds(&self, size: usize) -> bool {
        self.axes().iter().all(|&axis| axis < size)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.x, self.y, self.z, self.w, self.v
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        self != GameState::Playing
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameState::Playing => "PLAYING",
            GameState::Won => "WON",
            GameState::Lost => "LOST",
        })
    }
}

/// Observational data recorded once when a board is generated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BoardMetadata {
    /// Seconds spent generating the board.
    pub generation_time: f64,
    pub mine_count: usize,
    pub board_size: usize,
    pub total_cells: usize,
    pub mine_density: f64,
}
