//! Criterion benchmarks for board generation.
//! Sizes: the three difficulty presets plus a 20×30 stress grid.
//! Results land under target/criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jigsnap::rng::SeededRng;
use jigsnap::shape::{generate, Difficulty};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let mut grids: Vec<(String, u32, u32)> = Difficulty::ALL
        .iter()
        .map(|d| (d.key().to_string(), d.rows(), d.cols()))
        .collect();
    grids.push(("stress".to_string(), 20, 30));

    for (name, rows, cols) in grids {
        group.bench_with_input(BenchmarkId::new("board", &name), &(rows, cols), |b, &(rows, cols)| {
            b.iter(|| {
                let mut rng = SeededRng::new(42);
                let board = generate(rows, cols, 1200.0, 800.0, &mut rng);
                black_box(board)
            })
        });
    }

    let board = generate(9, 14, 1200.0, 800.0, &mut SeededRng::new(7)).ok();
    if let Some(board) = board {
        group.bench_function("svg_paths_hard", |b| {
            b.iter(|| {
                let total: usize = board.pieces.iter().map(|p| p.outline.to_svg_path().len()).sum();
                black_box(total)
            })
        });
        group.bench_function("flatten_hard_16", |b| {
            b.iter(|| {
                let n: usize = board.pieces.iter().map(|p| p.outline.flatten(16).len()).sum();
                black_box(n)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
