//! Deadlock recovery.

use rand::Rng;

use crate::board::{Board, generate_board, has_valid_move};

/// A regenerated board.
#[derive(Debug, Clone)]
pub struct Reshuffle {
    /// The new board, identities renumbered from 0.
    pub board: Board,
    /// Boards generated.
    pub attempts: u32,
    /// Whether the new board has a legal move.
    pub playable: bool,
}

/// Regenerate until a board with a legal move appears or `budget` runs out.
///
/// When the budget is exhausted the last board is kept anyway.
pub fn reshuffle(size: usize, budget: u32, rng: &mut impl Rng) -> Reshuffle {
    let budget = budget.max(1);
    let mut attempts = 0;
    let mut board;
    let mut playable;

    loop {
        board = generate_board(size, rng);
        attempts += 1;
        playable = has_valid_move(&board);
        if playable || attempts >= budget {
            break;
        }
    }

    board.renumber();

    if playable {
        tracing::debug!(attempts, "board reshuffled");
    } else {
        tracing::warn!(attempts, "reshuffle budget exhausted, keeping an unplayable board");
    }

    Reshuffle {
        board,
        attempts,
        playable,
    }
}
