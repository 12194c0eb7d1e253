use criterion::{black_box, criterion_group, criterion_main, Criterion};
use profile_dp::problems::plug::{Coverage, LoopCover, LoopMode};
use profile_dp::{CellFacts, Count, Grid, Maximize, ProfileEngine};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn weighted_board(rng: &mut StdRng, rows: usize, cols: usize) -> Grid {
    Grid::from_fn(rows, cols, |_, _| {
        if rng.gen_bool(0.1) {
            CellFacts::OBSTACLE
        } else {
            CellFacts {
                weight: rng.gen_range(-5..=9),
                ..CellFacts::FREE
            }
        }
    })
}

fn bench_hamiltonian(c: &mut Criterion) {
    let mut group = c.benchmark_group("plug_hamiltonian");
    group.sample_size(10);
    for &n in &[6usize, 8, 10] {
        let engine =
            ProfileEngine::new(LoopCover::hamiltonian(Grid::open(n, n)).unwrap(), Count::default())
                .unwrap();
        group.bench_function(format!("open_{n}x{n}"), |b| b.iter(|| black_box(engine.run())));
    }
    group.finish();
}

fn bench_weighted_loops(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut group = c.benchmark_group("plug_weighted");
    group.sample_size(10);
    for mode in [LoopMode::Single, LoopMode::Many] {
        let grid = weighted_board(&mut rng, 10, 8);
        let problem = LoopCover::new(grid, mode, Coverage::Optional).unwrap();
        let engine = ProfileEngine::new(problem, Maximize).unwrap();
        group.bench_function(format!("{mode:?}_10x8"), |b| b.iter(|| black_box(engine.run())));
    }
    group.finish();
}

criterion_group!(benches, bench_hamiltonian, bench_weighted_loops);
criterion_main!(benches);
