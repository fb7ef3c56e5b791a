//! Board layer.
//!
//! Everything that only needs the grid of gems:
//! - Board and gem types
//! - Constrained initial generation
//! - Run detection and connected-group sizing
//! - Legal move enumeration
//! - Gravity and refill

mod generate;
mod gravity;
mod grid;
mod matches;
mod moves;

pub use generate::generate_board;
pub use gravity::{Collapse, Fall, Spawn, clear_cells, collapse};
pub use grid::{BOARD_SIZE, Board, Coord, Gem, GemId, GemType};
pub use matches::{GemCounts, MIN_RUN, MatchSet, find_matches, largest_group};
pub use moves::{Move, find_valid_moves, has_valid_move, matches_after};
