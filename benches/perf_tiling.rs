use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use profile_dp::{problems::tiling::DominoTiling, CellFacts, Count, Grid, ProfileEngine};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

fn random_board(rng: &mut StdRng, rows: usize, cols: usize) -> Grid {
    Grid::from_fn(rows, cols, |_, _| {
        if rng.gen_bool(0.05) {
            CellFacts::OBSTACLE
        } else {
            CellFacts::FREE
        }
    })
}

fn rss_kib() -> u64 {
    let mut sys = System::new();
    sys.refresh_processes_specifics(ProcessRefreshKind::new().with_memory());
    get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or(0, |p| p.memory() / 1024)
}

fn bench_tiling_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling_width");
    group.sample_size(10);
    for &cols in &[8usize, 12, 16] {
        group.bench_function(format!("rows_64_cols_{cols}"), |b| {
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(42);
                    random_board(&mut rng, 64, cols)
                },
                |grid| {
                    let before = rss_kib();
                    let engine =
                        ProfileEngine::new(DominoTiling::new(grid).unwrap(), Count::default())
                            .unwrap();
                    let count = engine.run();
                    let after = rss_kib();
                    criterion::black_box(count);
                    eprintln!(
                        "RSS KiB delta (tiling cols {cols}): {}",
                        after.saturating_sub(before)
                    );
                },
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

fn bench_tiling_height(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling_height");
    for &rows in &[16usize, 64, 256] {
        let engine =
            ProfileEngine::new(DominoTiling::new(Grid::open(rows, 10)).unwrap(), Count::default())
                .unwrap();
        group.bench_function(format!("rows_{rows}_cols_10"), |b| {
            b.iter(|| criterion::black_box(engine.run()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tiling_width, bench_tiling_height);
criterion_main!(benches);
