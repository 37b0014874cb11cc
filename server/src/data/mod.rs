use hypersweeper_common::{Coord, DIMENSIONS};

use crate::{config::validate_board, error::GameError};

/// Mine layout of a 5D board, stored row-major with `v` varying fastest.
///
/// Immutable once built; a restart replaces the whole board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    mines: Vec<bool>,
    mine_count: usize,
}

impl Board {
    pub(crate) fn from_cells(size: usize, mines: Vec<bool>) -> Self {
        let mine_count = mines.iter().filter(|&&mine| mine).count();
        Self {
            size,
            mines,
            mine_count,
        }
    }

    /// Builds a board with mines at exactly the given coordinates.
    pub fn from_mines(size: usize, coords: &[Coord]) -> Result<Self, GameError> {
        validate_board(size, 0)?;

        let mut mines = vec![false; size.pow(DIMENSIONS as u32)];
        for coord in coords {
            if !coord.in_bounds(size) {
                return Err(GameError::InvalidCoordinate(*coord));
            }
            mines[index_in(size, *coord)] = true;
        }

        let board = Self::from_cells(size, mines);
        validate_board(size, board.mine_count)?;
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total_cells(&self) -> usize {
        self.mines.len()
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn safe_cells(&self) -> usize {
        self.total_cells() - self.mine_count
    }

    /// Out-of-range coordinates are never mines.
    pub fn is_mine(&self, coord: Coord) -> bool {
        coord.in_bounds(self.size) && self.mines[index_in(self.size, coord)]
    }

    pub fn coord_at(&self, index: usize) -> Coord {
        let mut axes = [0; DIMENSIONS];
        let mut rest = index;
        for axis in axes.iter_mut().rev() {
            *axis = rest % self.size;
            rest /= self.size;
        }
        Coord::from_axes(axes)
    }

    pub fn mine_coordinates(&self) -> Vec<Coord> {
        self.mines
            .iter()
            .enumerate()
            .filter(|(_, mine)| **mine)
            .map(|(index, _)| self.coord_at(index))
            .collect()
    }
}

fn index_in(size: usize, coord: Coord) -> usize {
    coord
        .axes()
        .iter()
        .fold(0, |index, &axis| index * size + axis)
}
