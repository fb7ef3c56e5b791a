//! Removal, gravity and refill.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Board, Coord, Gem, GemId, GemType};
use super::matches::MatchSet;

/// A surviving gem moved down its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fall {
    /// Gem that moved.
    pub id: GemId,
    /// Column it moved in.
    pub col: usize,
    /// Row before the fall.
    pub from_row: usize,
    /// Row after the fall.
    pub to_row: usize,
}

/// A fresh gem dropped into an emptied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    /// New gem's identity.
    pub id: GemId,
    /// Its type.
    pub kind: GemType,
    /// Where it landed.
    pub at: Coord,
    /// How many fresh gems landed in the same column; presenters start the
    /// drop this many rows above the board.
    pub column_fill: usize,
}

/// Result of one gravity + refill pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collapse {
    /// Existing gems that moved down.
    pub falls: Vec<Fall>,
    /// New gems created at the top of each column.
    pub spawns: Vec<Spawn>,
}

/// Remove every matched gem, returning what was removed.
pub fn clear_cells(board: &mut Board, matched: &MatchSet) -> Vec<(Coord, Gem)> {
    matched
        .iter()
        .filter_map(|coord| board.take(coord).map(|gem| (coord, gem)))
        .collect()
}

/// Compact every column downward, keeping relative order, then fill the
/// emptied top cells with uniformly random gems.
///
/// Refills ignore runs; a refill may create the next cascade level.
pub fn collapse(board: &mut Board, rng: &mut impl Rng) -> Collapse {
    let size = board.size();
    let mut result = Collapse::default();

    for col in 0..size {
        let mut write = size;
        for row in (0..size).rev() {
            let from = Coord::new(row, col);
            let Some(gem) = board.take(from) else {
                continue;
            };
            write -= 1;
            if write != row {
                result.falls.push(Fall {
                    id: gem.id,
                    col,
                    from_row: row,
                    to_row: write,
                });
            }
            board.put(Coord::new(write, col), Some(gem));
        }

        // Rows 0..write are now empty.
        for row in 0..write {
            let at = Coord::new(row, col);
            let kind = GemType::random(rng);
            if let Some(id) = board.place(at, kind) {
                result.spawns.push(Spawn {
                    id,
                    kind,
                    at,
                    column_fill: write,
                });
            }
        }
    }

    result
}
