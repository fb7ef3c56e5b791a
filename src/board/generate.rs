//! Initial board generation.
//!
//! Cells are filled in row-major order. A cell never takes a type that would
//! complete a run with the two cells above it or the two cells to its left.
//! Refills after a cascade do not go through here; they are unconstrained.

use rand::Rng;

use super::grid::{Board, Coord, GemType};

/// Generate a `size`×`size` board with no run of three at creation time.
///
/// Every gem gets a fresh identity, 0 first, in row-major order.
pub fn generate_board(size: usize, rng: &mut impl Rng) -> Board {
    let mut board = Board::empty(size);

    for row in 0..size {
        for col in 0..size {
            let kind = pick_allowed(&board, Coord::new(row, col), rng);
            board.place(Coord::new(row, col), kind);
        }
    }

    board
}

/// Choose uniformly among the types that do not complete a run at `coord`.
fn pick_allowed(board: &Board, coord: Coord, rng: &mut impl Rng) -> GemType {
    let mut excluded = [false; GemType::COUNT];

    if coord.row >= 2 {
        let a = board.kind_at(Coord::new(coord.row - 1, coord.col));
        let b = board.kind_at(Coord::new(coord.row - 2, coord.col));
        if let (Some(a), Some(b)) = (a, b)
            && a == b
        {
            excluded[a.index()] = true;
        }
    }
    if coord.col >= 2 {
        let a = board.kind_at(Coord::new(coord.row, coord.col - 1));
        let b = board.kind_at(Coord::new(coord.row, coord.col - 2));
        if let (Some(a), Some(b)) = (a, b)
            && a == b
        {
            excluded[a.index()] = true;
        }
    }

    let mut allowed = [GemType::Red; GemType::COUNT];
    let mut count = 0;
    for kind in GemType::ALL {
        if !excluded[kind.index()] {
            allowed[count] = kind;
            count += 1;
        }
    }

    if count == 0 {
        return GemType::random(rng);
    }
    allowed[rng.gen_range(0..count)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_SIZE, GemId, find_matches};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generated_board_has_no_runs() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let board = generate_board(BOARD_SIZE, &mut rng);
            assert!(board.is_full());
            assert!(
                find_matches(&board).is_empty(),
                "seed {seed} produced a run:\n{board}"
            );
        }
    }

    #[test]
    fn test_generated_ids_are_sequential() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let board = generate_board(4, &mut rng);
        let ids: Vec<GemId> = board.iter().map(|(_, gem)| gem.id).collect();
        let expected: Vec<GemId> = (0..16).map(GemId).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_board(BOARD_SIZE, &mut ChaCha8Rng::seed_from_u64(42));
        let b = generate_board(BOARD_SIZE, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_pick_allowed_avoids_completing_runs() {
        // Two skulls above and two reds to the left of (2,2).
        let mut board = Board::empty(5);
        board.place(Coord::new(0, 2), GemType::Skull);
        board.place(Coord::new(1, 2), GemType::Skull);
        board.place(Coord::new(2, 0), GemType::Red);
        board.place(Coord::new(2, 1), GemType::Red);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let kind = pick_allowed(&board, Coord::new(2, 2), &mut rng);
            assert_ne!(kind, GemType::Skull);
            assert_ne!(kind, GemType::Red);
        }
    }
}
