//! Legal move enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::grid::{Board, Coord};
use super::matches::{MatchSet, find_matches};

/// A swap of two orthogonally adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// First cell.
    pub from: Coord,
    /// Neighbor it swaps with.
    pub to: Coord,
}

impl Move {
    /// Create a move.
    #[must_use]
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ↔ {}", self.from, self.to)
    }
}

/// Matched set the board would have after applying `mv`.
///
/// The board is left untouched.
#[must_use]
pub fn matches_after(board: &Board, mv: Move) -> MatchSet {
    let mut scratch = board.clone();
    if !scratch.swap(mv.from, mv.to) {
        return MatchSet::new();
    }
    find_matches(&scratch)
}

/// Enumerate every legal swap, checking each cell's right then down neighbor.
///
/// A swap is legal when the board would contain a match after it.
#[must_use]
pub fn find_valid_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    scan_moves(board, |mv| {
        moves.push(mv);
        true
    });
    moves
}

/// Whether at least one legal swap exists.
#[must_use]
pub fn has_valid_move(board: &Board) -> bool {
    let mut found = false;
    scan_moves(board, |_| {
        found = true;
        false
    });
    found
}

/// Visit legal moves in scan order until `visit` returns `false`.
fn scan_moves(board: &Board, mut visit: impl FnMut(Move) -> bool) {
    let size = board.size();
    let mut scratch = board.clone();

    for from in board.coords() {
        for to in [
            Coord::new(from.row, from.col + 1),
            Coord::new(from.row + 1, from.col),
        ] {
            if to.row >= size || to.col >= size {
                continue;
            }
            scratch.swap(from, to);
            let legal = !find_matches(&scratch).is_empty();
            scratch.swap(from, to);
            if legal && !visit(Move::new(from, to)) {
                return;
            }
        }
    }
}
