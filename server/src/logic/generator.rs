use std::time::Instant;

use hypersweeper_common::{BoardMetadata, DIMENSIONS};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{error, info, instrument};

use crate::{config::validate_board, data::Board, error::GameError};

/// Picks exactly `mine_count` of `total_cells` positions, uniformly and
/// without replacement, in a single pass.
fn place_mines<R: Rng>(rng: &mut R, total_cells: usize, mine_count: usize) -> Vec<bool> {
    let mut mines = Vec::with_capacity(total_cells);

    let mut mines_left = mine_count;
    for cells_left in (1..=total_cells).rev() {
        let value = rng.random_ratio(mines_left as u32, cells_left as u32);
        mines.push(value);
        if value {
            mines_left -= 1;
        }
    }

    mines
}

fn verify_mine_count(board: &Board, expected: usize) -> Result<(), GameError> {
    let actual = board.mine_count();
    if actual != expected {
        error!("Mine count mismatch: {} != {}", actual, expected);
        return Err(GameError::GenerationInvariantViolation { expected, actual });
    }
    Ok(())
}

/// Generates a `board_size`^5 board holding exactly `mine_count` mines.
///
/// The same `seed` always yields the same board; without one the layout is
/// drawn from OS entropy.
#[instrument(level = "trace")]
pub fn generate(
    board_size: usize,
    mine_count: usize,
    seed: Option<u64>,
) -> Result<(Board, BoardMetadata), GameError> {
    validate_board(board_size, mine_count)?;

    let start = Instant::now();
    let total_cells = board_size.pow(DIMENSIONS as u32);

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let board = Board::from_cells(board_size, place_mines(&mut rng, total_cells, mine_count));
    verify_mine_count(&board, mine_count)?;

    let generation_time = start.elapsed().as_secs_f64();
    info!(
        "Generated {}^{} board in {:.6}s: {} mines",
        board_size, DIMENSIONS, generation_time, mine_count
    );

    let metadata = BoardMetadata {
        generation_time,
        mine_count,
        board_size,
        total_cells,
        mine_density: mine_count as f64 / total_cells as f64,
    };

    Ok((board, metadata))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_generate_default_shape() {
        let (board, metadata) = generate(3, 60, Some(7)).unwrap();

        assert_eq!(board.total_cells(), 243);
        assert_eq!(board.mine_count(), 60);
        assert_eq!(metadata.total_cells, 243);
        assert_eq!(metadata.board_size, 3);
        assert!((metadata.mine_density - 60.0 / 243.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_same_seed_same_board() {
        let (first, _) = generate(3, 60, Some(1337)).unwrap();
        let (second, _) = generate(3, 60, Some(1337)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_differ() {
        let (first, _) = generate(3, 60, Some(1)).unwrap();
        let (second, _) = generate(3, 60, Some(2)).unwrap();
        assert_ne!(first.mine_coordinates(), second.mine_coordinates());
    }

    #[test]
    fn test_too_many_mines() {
        assert!(matches!(
            generate(3, 243, None),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_mines() {
        let (board, _) = generate(3, 0, None).unwrap();
        assert_eq!(board.mine_count(), 0);
    }

    #[test]
    fn test_verify_mine_count_mismatch() {
        let board = Board::from_mines(3, &[hypersweeper_common::Coord::ORIGIN]).unwrap();
        assert_eq!(
            verify_mine_count(&board, 2),
            Err(GameError::GenerationInvariantViolation {
                expected: 2,
                actual: 1
            })
        );
    }

    proptest! {
        #[test]
        fn prop_exact_mine_count(
            size in 3usize..6,
            density in 0.0f64..1.0,
            seed in any::<u64>(),
        ) {
            let total = size.pow(DIMENSIONS as u32);
            let mines = ((total - 1) as f64 * density) as usize;
            let (board, metadata) = generate(size, mines, Some(seed)).unwrap();
            prop_assert_eq!(board.mine_count(), mines);
            prop_assert_eq!(metadata.mine_count, mines);
        }
    }
}
