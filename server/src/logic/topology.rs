//! Cross adjacency on a 5D torus: each cell touches the two cells one step
//! away along every axis, wrapping at the board edge.

use hypersweeper_common::{Coord, DIMENSIONS, MAX_NEIGHBORS};

use crate::data::Board;

/// The `2 * DIMENSIONS` neighbors of `coord`, ordered by axis with the
/// decrement before the increment.
pub fn neighbors(coord: Coord, size: usize) -> [Coord; MAX_NEIGHBORS] {
    let axes = coord.axes();
    let mut result = [coord; MAX_NEIGHBORS];

    for axis in 0..DIMENSIONS {
        let mut down = axes;
        down[axis] = (axes[axis] + size - 1) % size;
        result[2 * axis] = Coord::from_axes(down);

        let mut up = axes;
        up[axis] = (axes[axis] + 1) % size;
        result[2 * axis + 1] = Coord::from_axes(up);
    }

    result
}

pub fn neighbor_mine_count(board: &Board, coord: Coord) -> u8 {
    neighbors(coord, board.size())
        .into_iter()
        .filter(|&neighbor| board.is_mine(neighbor))
        .count() as u8
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn coord_strategy(size: usize) -> impl Strategy<Value = Coord> {
        prop::array::uniform5(0..size).prop_map(Coord::from_axes)
    }

    #[test]
    fn test_neighbors_wrap_around() {
        let neighbors = neighbors(Coord::ORIGIN, 3);

        assert_eq!(neighbors.len(), 10);
        assert!(neighbors.contains(&Coord::new(2, 0, 0, 0, 0))); // x wraps down
        assert!(neighbors.contains(&Coord::new(1, 0, 0, 0, 0)));
        assert!(neighbors.contains(&Coord::new(0, 0, 0, 0, 2))); // v wraps down
        assert!(neighbors.contains(&Coord::new(0, 0, 0, 0, 1)));
        assert!(!neighbors.contains(&Coord::ORIGIN));
    }

    #[test]
    fn test_neighbors_upper_edge() {
        let neighbors = neighbors(Coord::new(2, 2, 2, 2, 2), 3);
        assert_eq!(neighbors[0], Coord::new(1, 2, 2, 2, 2));
        assert_eq!(neighbors[1], Coord::new(0, 2, 2, 2, 2));
    }

    #[test]
    fn test_neighbor_mine_count() {
        let mines = [Coord::new(1, 0, 0, 0, 0), Coord::new(0, 0, 0, 0, 2)];
        let board = Board::from_mines(3, &mines).unwrap();

        assert_eq!(neighbor_mine_count(&board, Coord::ORIGIN), 2);
        assert_eq!(neighbor_mine_count(&board, Coord::new(1, 1, 1, 1, 1)), 0);
        // Diagonal cells are not adjacent.
        assert_eq!(neighbor_mine_count(&board, Coord::new(1, 0, 0, 0, 2)), 2);
        assert_eq!(neighbor_mine_count(&board, Coord::new(1, 1, 0, 0, 0)), 1);
    }

    proptest! {
        #[test]
        fn prop_neighbors_symmetric(size in 3usize..8, seed in prop::array::uniform5(0usize..8)) {
            let coord = Coord::from_axes(seed.map(|axis| axis % size));
            for neighbor in neighbors(coord, size) {
                prop_assert!(neighbors(neighbor, size).contains(&coord));
            }
        }

        #[test]
        fn prop_neighbors_distinct_and_in_bounds(coord in coord_strategy(4)) {
            let neighbors = neighbors(coord, 4);
            let unique: HashSet<Coord> = neighbors.iter().copied().collect();
            prop_assert_eq!(unique.len(), MAX_NEIGHBORS);
            prop_assert!(neighbors.iter().all(|n| n.in_bounds(4)));
        }
    }
}
