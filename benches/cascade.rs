use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_match3::core::{find_all_matches_into, has_any_match, Board, GridStore, NoopObserver};
use tui_match3::types::{BoardConfig, Position};

fn bench_match_scan(c: &mut Criterion) {
    let config = BoardConfig::default();
    let store = GridStore::new(&config, 12345).unwrap();
    let mut out = Vec::with_capacity(64);

    c.bench_function("find_all_matches_8x8", |b| {
        b.iter(|| {
            find_all_matches_into(black_box(store.visible()), &mut out);
            black_box(out.len())
        })
    });

    c.bench_function("has_any_match_8x8", |b| {
        b.iter(|| has_any_match(black_box(store.visible())))
    });
}

fn bench_initialize(c: &mut Criterion) {
    let mut seed = 1u32;
    c.bench_function("board_new_8x8x6", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            Board::new(BoardConfig::default(), black_box(seed)).unwrap()
        })
    });
}

fn bench_swap_sweep(c: &mut Criterion) {
    let template = Board::new(BoardConfig::default(), 4242).unwrap();

    // Every horizontal swap on a fresh board: mixes rollbacks and cascades.
    c.bench_function("swap_sweep_8x8", |b| {
        b.iter(|| {
            let mut board = template.clone();
            for row in 0..8 {
                for col in 0..7 {
                    let _ = board.attempt_swap(
                        Position::new(row, col),
                        Position::new(row, col + 1),
                        &mut NoopObserver,
                    );
                }
            }
            black_box(board.swaps())
        })
    });
}

criterion_group!(benches, bench_match_scan, bench_initialize, bench_swap_sweep);
criterion_main!(benches);
