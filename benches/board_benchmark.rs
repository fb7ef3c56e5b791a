//! Benchmarks for board generation, match detection and the legal-move scan.

#![allow(missing_docs)] // Benchmark macros generate undocumented functions

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use gemclash::board::{
    clear_cells, collapse, find_matches, find_valid_moves, generate_board, has_valid_move,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_generate(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("generate_8x8", |b| {
        b.iter(|| black_box(generate_board(black_box(8), &mut rng)));
    });
}

fn bench_move_scan(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let board = generate_board(8, &mut rng);

    c.bench_function("find_valid_moves_8x8", |b| {
        b.iter(|| black_box(find_valid_moves(black_box(&board))));
    });

    c.bench_function("has_valid_move_8x8", |b| {
        b.iter(|| black_box(has_valid_move(black_box(&board))));
    });
}

fn bench_clear_and_refill(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let board = generate_board(8, &mut rng);
    // A legal move guarantees something to clear.
    let mv = find_valid_moves(&board).first().copied();

    c.bench_function("clear_collapse_8x8", |b| {
        b.iter(|| {
            let mut scratch = board.clone();
            if let Some(mv) = mv {
                scratch.swap(mv.from, mv.to);
            }
            let matched = find_matches(&scratch);
            clear_cells(&mut scratch, &matched);
            black_box(collapse(&mut scratch, &mut rng))
        });
    });
}

criterion_group!(benches, bench_generate, bench_move_scan, bench_clear_and_refill);
criterion_main!(benches);
