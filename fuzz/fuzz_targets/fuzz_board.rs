#![no_main]

//! Board mechanics fuzzer.
//!
//! Builds arbitrary (possibly run-filled) boards and checks that match
//! detection, the legal-move scan and gravity agree with each other.

use arbitrary::Arbitrary;
use gemclash::board::{
    Board, Coord, GemType, clear_cells, collapse, find_matches, find_valid_moves, has_valid_move,
    largest_group, matches_after,
};
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Structured input for board fuzzing.
#[derive(Arbitrary, Debug)]
struct BoardInput {
    /// Edge length before clamping to 3..=8.
    size: u8,
    /// Gem kinds, row-major, taken modulo the number of kinds.
    cells: Vec<u8>,
    /// Seed for refills.
    seed: u64,
}

fuzz_target!(|input: BoardInput| {
    let size = usize::from(input.size % 6) + 3;
    if input.cells.len() < size * size {
        return;
    }

    let symbols: Vec<char> = GemType::ALL.iter().map(|kind| kind.symbol()).collect();
    let rows: Vec<String> = input.cells[..size * size]
        .chunks(size)
        .map(|row| {
            row.iter()
                .map(|&b| symbols[usize::from(b) % symbols.len()])
                .collect()
        })
        .collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let Some(mut board) = Board::from_rows(&row_refs) else {
        return;
    };

    // Legal-move scan agrees with single-move checks.
    let moves = find_valid_moves(&board);
    assert_eq!(!moves.is_empty(), has_valid_move(&board));
    for mv in &moves {
        assert!(!matches_after(&board, *mv).is_empty());
    }

    // Groups never exceed the matched set.
    let matched = find_matches(&board);
    let largest = largest_group(&board, &matched);
    assert!(largest <= matched.len());
    if !matched.is_empty() {
        assert!(largest >= 3);
    }

    // Clearing and collapsing always leaves a full board.
    let mut rng = ChaCha8Rng::seed_from_u64(input.seed);
    let removed = clear_cells(&mut board, &matched);
    assert_eq!(removed.len(), matched.len());
    let refill = collapse(&mut board, &mut rng);
    assert_eq!(refill.spawns.len(), matched.len());
    assert!(board.is_full());
    assert!(board.in_bounds(Coord::new(size - 1, size - 1)));
});
