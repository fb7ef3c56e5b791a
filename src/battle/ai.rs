//! Move selection for the enemy and the autopilot.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::events::BattleEvent;
use super::state::{Battle, Phase};
use crate::board::{Board, Move, find_matches, find_valid_moves};

/// Whether applying `mv` would match at least one skull.
#[must_use]
pub fn produces_skull(board: &Board, mv: Move) -> bool {
    let mut scratch = board.clone();
    if !scratch.swap(mv.from, mv.to) {
        return false;
    }
    find_matches(&scratch).has_skull(&scratch)
}

/// Pick a legal move, preferring ones that match skulls.
///
/// Chooses uniformly within the skull moves when there are any, otherwise
/// uniformly among all legal moves. `None` means the board is deadlocked.
pub fn choose_move(board: &Board, rng: &mut impl Rng) -> Option<Move> {
    let moves = find_valid_moves(board);
    if moves.is_empty() {
        return None;
    }

    let skull_moves: Vec<Move> = moves
        .iter()
        .copied()
        .filter(|&mv| produces_skull(board, mv))
        .collect();
    let pool = if skull_moves.is_empty() {
        &moves
    } else {
        &skull_moves
    };

    let chosen = pool[rng.gen_range(0..pool.len())];
    tracing::debug!(
        legal = moves.len(),
        skull = skull_moves.len(),
        %chosen,
        "move chosen"
    );
    Some(chosen)
}

/// Plays the player side without input, for headless runs.
///
/// Each turn it casts every ready troop front to back, then makes the same
/// skull-biased choice the enemy makes.
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: ChaCha8Rng,
}

impl Autopilot {
    /// Create an autopilot with its own random stream.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Act once if the battle is waiting for the player.
    ///
    /// Returns the events of the casts and the swap. Empty when it is not the
    /// player's turn or nothing could be done.
    pub fn take_turn(&mut self, battle: &mut Battle) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        if battle.phase() != Phase::PlayerTurn || !battle.is_idle() {
            return events;
        }

        for index in 0..battle.player().len() {
            let ready = battle.player().get(index).is_some_and(|t| t.is_ready());
            if ready && let Ok(cast) = battle.cast(index) {
                events.extend(cast);
            }
            if battle.phase() == Phase::GameOver {
                return events;
            }
        }

        if let Some(mv) = choose_move(battle.board(), &mut self.rng)
            && let Ok(swap) = battle.attempt_swap(mv.from, mv.to)
        {
            events.extend(swap);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::testkit::board;
    use crate::board::Coord;

    /// Three legal moves; only the first matches skulls.
    fn skull_choice() -> Board {
        board(&[
            "SSPRGPRG", "BYSBYNBY", "GPRGPRGP", "YNBYNBYN", "PRGPRGPR", "NBYNBYNB", "RGYRGPRG",
            "YYNBYNBY",
        ])
    }

    #[test]
    fn test_prefers_skull_moves() {
        let board = skull_choice();
        let moves = find_valid_moves(&board);
        assert_eq!(moves.len(), 3);
        let skull = Move::new(Coord::new(0, 2), Coord::new(1, 2));
        assert!(produces_skull(&board, skull));
        assert_eq!(moves.iter().filter(|&&mv| produces_skull(&board, mv)).count(), 1);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(choose_move(&board, &mut rng), Some(skull));
        }
    }

    #[test]
    fn test_uniform_when_no_skull_moves() {
        // Only the two yellow moves remain once the skull setup is gone.
        let board = board(&[
            "RGPRGPRG", "BYNBYNBY", "GPRGPRGP", "YNBYNBYN", "PRGPRGPR", "NBYNBYNB", "RGYRGPRG",
            "YYNBYNBY",
        ]);
        let moves = find_valid_moves(&board);
        assert_eq!(moves.len(), 2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(choose_move(&board, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_deadlock_yields_none() {
        let board = board(&[
            "RGPRGPRG", "BYNBYNBY", "GPRGPRGP", "YNBYNBYN", "PRGPRGPR", "NBYNBYNB", "RGPRGPRG",
            "BYNBYNBY",
        ]);
        assert_eq!(choose_move(&board, &mut ChaCha8Rng::seed_from_u64(0)), None);
    }
}
