use std::collections::{HashSet, VecDeque};

use hypersweeper_common::Coord;

use crate::{
    data::Board,
    logic::topology::{neighbor_mine_count, neighbors},
};

/// Flood-fills outward from `origin`, which the caller has already revealed
/// and found to have no neighboring mines.
///
/// Every cell reached is inserted into `revealed` and returned with its
/// neighbor mine count, in the order it was revealed. Only zero-count cells
/// keep the fill going, so the border of the region is revealed but not
/// crossed. Mines are never enqueued.
pub fn cascade_from_neighbors(
    board: &Board,
    revealed: &mut HashSet<Coord>,
    origin: Coord,
) -> Vec<(Coord, u8)> {
    let size = board.size();
    let mut queue: VecDeque<Coord> = neighbors(origin, size)
        .into_iter()
        .filter(|neighbor| !revealed.contains(neighbor) && !board.is_mine(*neighbor))
        .collect();
    let mut processed = HashSet::new();
    let mut auto_revealed = Vec::new();

    while let Some(current) = queue.pop_front() {
        if revealed.contains(&current) || !processed.insert(current) {
            continue;
        }

        let count = neighbor_mine_count(board, current);
        revealed.insert(current);
        auto_revealed.push((current, count));

        if count == 0 {
            queue.extend(neighbors(current, size).into_iter().filter(|neighbor| {
                !board.is_mine(*neighbor)
                    && !revealed.contains(neighbor)
                    && !processed.contains(neighbor)
            }));
        }
    }

    auto_revealed
}
