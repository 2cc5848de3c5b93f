use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use duel_common::games::tictactoe::{Board, Cell, Position};

// Fills a board in a pattern that never lines up `win_length` marks, so every
// evaluation has to scan the whole grid.
fn create_crowded_board(width: usize, height: usize, win_length: usize) -> Board {
    let mut board = Board::new(width, height, win_length);
    for row in 0..height {
        for col in 0..width {
            if (row + col) % 7 == 0 {
                continue;
            }
            let mark = if (col / 2 + row) % 2 == 0 {
                Cell::First
            } else {
                Cell::Second
            };
            if board.apply_move(Position::new(row, col), mark).is_err() {
                return board;
            }
        }
    }
    board
}

fn bench_evaluate_outcome(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_outcome");

    let small = create_crowded_board(8, 8, 5);
    group.bench_function("8x8_win5", |b| {
        b.iter(|| black_box(&small).evaluate_outcome())
    });

    let large = create_crowded_board(64, 64, 5);
    group.bench_function("64x64_win5", |b| {
        b.iter(|| black_box(&large).evaluate_outcome())
    });

    group.finish();
}

fn bench_fill_board(c: &mut Criterion) {
    c.bench_function("fill_19x19_win5", |b| {
        b.iter(|| create_crowded_board(black_box(19), black_box(19), 5))
    });
}

criterion_group!(benches, bench_evaluate_outcome, bench_fill_board);
criterion_main!(benches);
