use std::collections::HashSet;

use crate::board::Board;
use crate::Coords;

use rand::seq::SliceRandom;
use rand::Rng;

// Random picks before falling back to listing the free cells.
const MAX_RANDOM_PICKS: usize = 64;

/// Picks a cell on the board that is not in `occupied`, uniformly at random.
/// Returns `None` only when every cell is taken.
pub fn spawn<R: Rng + ?Sized>(board: &Board, occupied: &HashSet<Coords>, rng: &mut R) -> Option<Coords> {
    if occupied.len() < board.cell_count() {
        for _ in 0..MAX_RANDOM_PICKS {
            let cell = board.random_cell(rng);
            if !occupied.contains(&cell) {
                return Some(cell);
            }
        }
    }

    // Crowded board: sample from the free cells directly
    let choices: Vec<Coords> = board.cells().filter(|cell| !occupied.contains(cell)).collect();
    choices.choose(rng).copied()
}
