use std::env;
use std::time::Instant;

use profile_dp::problems::{
    coloring::GridColoring, kings::KingPlacement, placement::CrossPlacement, plug::LoopCover,
    tiling::DominoTiling,
};
use profile_dp::{CellFacts, Count, EngineError, Grid, MaybeSync, ProfileEngine, ProfileProblem};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

/// Hamiltonian cycles on the open `n × n` board.
const HAMILTONIAN_REFERENCE: &[(usize, u64)] = &[(2, 1), (4, 6), (6, 1_072), (8, 4_638_576)];

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("profile_probe: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    #[cfg(feature = "tracing")]
    init_tracing();

    eprintln!("\n{}", "=".repeat(80));
    eprintln!("Profile DP Probe: Performance and Correctness Testing");
    eprintln!("{}", "=".repeat(80));
    eprintln!();
    eprintln!("Each problem family is swept over growing boards to check:");
    eprintln!(
        "  • Correctness: counts match exhaustive search (boards up to {} cells)",
        options.verify_limit
    );
    eprintln!("  • Performance: wall-clock time and memory as the profile widens");
    eprintln!();
    eprintln!("Metrics explained:");
    eprintln!("  • wall_s: Wall-clock time in seconds (lower is better)");
    eprintln!("  • rss_delta_kib: Resident memory delta in KiB");
    eprintln!("  • status: 'passed' = matches baseline, 'not_checked' = too large to verify");
    eprintln!();
    eprintln!("{}", "=".repeat(80));
    eprintln!();

    let mut sys = System::new();
    let mut measurements = Vec::new();

    eprintln!("[1/6] Domino tilings...");
    measurements.extend(run_tiling(&options, &mut sys));
    eprintln!();

    eprintln!("[2/6] Corn field placements (reach 1, scattered obstacles)...");
    measurements.extend(run_placement(&options, &mut sys, "corn_field", 1, &[4, 6, 8, 10, 12]));
    eprintln!();

    eprintln!("[3/6] Artillery placements (reach 2, scattered obstacles)...");
    measurements.extend(run_placement(&options, &mut sys, "artillery", 2, &[4, 6, 8, 10]));
    eprintln!();

    eprintln!("[4/6] Non-attacking kings (n kings on n × n)...");
    measurements.extend(run_kings(&options, &mut sys));
    eprintln!();

    eprintln!("[5/6] Proper 3-colorings...");
    measurements.extend(run_coloring(&options, &mut sys));
    eprintln!();

    eprintln!("[6/6] Hamiltonian cycles (plug DP)...");
    measurements.extend(run_loops(&mut sys));
    eprintln!();

    print_summary(&measurements, &options);

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("profile_probe output error: {err}");
        std::process::exit(1);
    }
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

struct Options {
    format: OutputFormat,
    verify_limit: usize,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut format = OutputFormat::Csv;
        let mut verify_limit = 36usize;

        while let Some(arg) = args.next() {
            let arg = arg.into();
            if arg == "--help" || arg == "-h" {
                Options::print_help();
                std::process::exit(0);
            } else if let Some(value) = arg.strip_prefix("--format=") {
                format = OutputFormat::from_str(value)?;
            } else if arg == "--format" {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value after --format".to_string())?
                    .into();
                format = OutputFormat::from_str(&value)?;
            } else if let Some(value) = arg.strip_prefix("--verify-limit=") {
                verify_limit = parse_limit(value)?;
            } else if arg == "--verify-limit" {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value after --verify-limit".to_string())?
                    .into();
                verify_limit = parse_limit(&value)?;
            } else {
                return Err(format!("unrecognized argument '{arg}'"));
            }
        }

        Ok(Self {
            format,
            verify_limit,
        })
    }

    fn print_help() {
        println!(
            "\
Usage: cargo run --release --bin profile_probe [-- <options>]

Options:
  --format <csv|table|json>     Output format (default: csv)
  --verify-limit <N>            Largest board (in cells) checked by exhaustive search (default: 36)
  -h, --help                    Print this help message

Set RUST_LOG=profile_dp=trace with --features tracing to see per-row events.

Examples:
  cargo run --release --bin profile_probe
  cargo run --release --bin profile_probe -- --format table --verify-limit 25
"
        );
    }
}

fn parse_limit(value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| "verify limit must be a non-negative integer".to_string())
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
            OutputFormat::Json => write_json(measurements),
        }
    }
}

#[derive(Clone)]
struct Measurement {
    scenario: &'static str,
    size_desc: String,
    wall_s: f64,
    rss_delta_kib: u64,
    verification_status: VerificationStatus,
    verification_detail: Option<String>,
}

#[derive(Clone, Copy)]
enum VerificationStatus {
    NotChecked,
    Passed,
    Failed,
}

impl VerificationStatus {
    fn label(&self) -> &'static str {
        match self {
            VerificationStatus::NotChecked => "not_checked",
            VerificationStatus::Passed => "passed",
            VerificationStatus::Failed => "failed",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            VerificationStatus::Passed => "✓",
            VerificationStatus::Failed => "✗",
            VerificationStatus::NotChecked => "○",
        }
    }
}

/// Run one board: sweep it, then compare against `baseline` when given.
fn probe<P, B>(
    scenario: &'static str,
    size_desc: String,
    sys: &mut System,
    problem: Result<P, EngineError>,
    baseline: Option<B>,
) -> Measurement
where
    P: ProfileProblem + MaybeSync,
    B: FnOnce() -> u64,
{
    eprint!("      {size_desc}... ");
    let mut answer = None;
    let m = measure(scenario, size_desc, sys, || {
        let count = problem.and_then(|p| Ok(ProfileEngine::new(p, Count::default())?.run()));
        let count = match count {
            Ok(count) => count,
            Err(err) => return (VerificationStatus::Failed, Some(err.to_string())),
        };
        answer = Some(count);
        match baseline {
            Some(baseline) => {
                let expected = baseline() % Count::DEFAULT_MODULUS;
                if expected == count {
                    (VerificationStatus::Passed, None)
                } else {
                    (
                        VerificationStatus::Failed,
                        Some(format!("expected {expected}, got {count}")),
                    )
                }
            }
            None => (VerificationStatus::NotChecked, None),
        }
    });
    eprintln!(
        "{} count={}, time={:.3}s, status={}",
        m.verification_status.icon(),
        answer.map_or_else(|| "-".to_string(), |c| c.to_string()),
        m.wall_s,
        m.verification_status.label()
    );
    m
}

fn run_tiling(options: &Options, sys: &mut System) -> Vec<Measurement> {
    const SIZES: &[usize] = &[4, 6, 8, 10, 12, 16];
    SIZES
        .iter()
        .map(|&n| {
            let grid = Grid::open(n, n);
            let baseline = (n * n <= options.verify_limit).then(|| {
                let g = grid.clone();
                move || tilings_baseline(&g)
            });
            probe("tiling", format!("{n}x{n}"), sys, DominoTiling::new(grid), baseline)
        })
        .collect()
}

fn run_placement(
    options: &Options,
    sys: &mut System,
    scenario: &'static str,
    reach: usize,
    sizes: &[usize],
) -> Vec<Measurement> {
    sizes
        .iter()
        .map(|&n| {
            let grid = scattered_obstacles(n, n);
            let baseline = (n * n <= options.verify_limit).then(|| {
                let g = grid.clone();
                move || placements_baseline(&g, reach)
            });
            probe(scenario, format!("{n}x{n}"), sys, CrossPlacement::new(grid, reach), baseline)
        })
        .collect()
}

fn run_kings(options: &Options, sys: &mut System) -> Vec<Measurement> {
    const SIZES: &[usize] = &[4, 5, 6, 8, 10];
    SIZES
        .iter()
        .map(|&n| {
            let baseline =
                (n * n <= options.verify_limit).then(|| move || kings_baseline(n, n, n));
            probe("kings", format!("{n}x{n} k={n}"), sys, KingPlacement::board(n, n, n), baseline)
        })
        .collect()
}

fn run_coloring(options: &Options, sys: &mut System) -> Vec<Measurement> {
    const SIZES: &[usize] = &[3, 4, 5, 6, 8, 10];
    SIZES
        .iter()
        .map(|&n| {
            let baseline =
                (n * n <= options.verify_limit).then(|| move || colorings_baseline(n, n, 3));
            probe("coloring", format!("{n}x{n} k=3"), sys, GridColoring::new(Grid::open(n, n), 3), baseline)
        })
        .collect()
}

fn run_loops(sys: &mut System) -> Vec<Measurement> {
    const SIZES: &[usize] = &[2, 4, 6, 8, 10];
    SIZES
        .iter()
        .map(|&n| {
            let reference = HAMILTONIAN_REFERENCE
                .iter()
                .find(|&&(size, _)| size == n)
                .map(|&(_, cycles)| move || cycles);
            probe("loops", format!("{n}x{n}"), sys, LoopCover::hamiltonian(Grid::open(n, n)), reference)
        })
        .collect()
}

fn print_summary(measurements: &[Measurement], options: &Options) {
    eprintln!("\n{}", "=".repeat(80));
    eprintln!("Test Summary");
    eprintln!("{}", "=".repeat(80));
    eprintln!();

    let mut passed = 0;
    let mut failed = 0;
    let mut not_checked = 0;
    for m in measurements {
        match m.verification_status {
            VerificationStatus::Passed => passed += 1,
            VerificationStatus::Failed => failed += 1,
            VerificationStatus::NotChecked => not_checked += 1,
        }
    }

    let total = measurements.len().max(1);
    let pct = |n: usize| 100.0 * n as f64 / total as f64;
    eprintln!("Verification Results:");
    eprintln!("  Total boards: {}", measurements.len());
    eprintln!("  ✓ Passed: {} ({:.1}%)", passed, pct(passed));
    eprintln!("  ✗ Failed: {} ({:.1}%)", failed, pct(failed));
    eprintln!(
        "  ○ Not checked (cells > {}): {} ({:.1}%)",
        options.verify_limit,
        not_checked,
        pct(not_checked)
    );
    eprintln!();

    if failed > 0 {
        eprintln!("Failed Boards:");
        for m in measurements {
            if matches!(m.verification_status, VerificationStatus::Failed) {
                eprintln!("  ✗ {} ({})", m.scenario, m.size_desc);
                if let Some(ref detail) = m.verification_detail {
                    eprintln!("     Error: {}", detail);
                }
            }
        }
        eprintln!();
    }

    eprintln!("Performance Statistics by Scenario:");
    eprintln!();

    let mut scenarios: Vec<&str> = measurements.iter().map(|m| m.scenario).collect();
    scenarios.dedup();
    for scenario in scenarios {
        let ms: Vec<&Measurement> = measurements.iter().filter(|m| m.scenario == scenario).collect();
        let min_time = ms.iter().map(|m| m.wall_s).fold(f64::INFINITY, f64::min);
        let max_time = ms.iter().map(|m| m.wall_s).fold(0.0, f64::max);
        let avg_time = ms.iter().map(|m| m.wall_s).sum::<f64>() / ms.len() as f64;
        let max_mem = ms.iter().map(|m| m.rss_delta_kib).max().unwrap_or(0);

        eprintln!("  {}:", scenario);
        eprintln!("    Boards: {}", ms.len());
        eprintln!("    Time: min={:.3}s, max={:.3}s, avg={:.3}s", min_time, max_time, avg_time);
        eprintln!("    Memory: max_delta={} KiB", max_mem);
        eprintln!();
    }

    eprintln!("{}", "=".repeat(80));
    if failed == 0 {
        eprintln!("✓ All verified boards passed.");
    } else {
        eprintln!("✗ {} board(s) failed. Please review the errors above.", failed);
    }
    eprintln!();
    eprintln!("Interpretation:");
    eprintln!("  • time grows linearly in rows and with radix^width in columns");
    eprintln!("  • memory is two tables of radix^width × aux slots, independent of rows");
    eprintln!("{}", "=".repeat(80));
    eprintln!();
}

fn measure<F>(scenario: &'static str, size_desc: String, sys: &mut System, compute: F) -> Measurement
where
    F: FnOnce() -> (VerificationStatus, Option<String>),
{
    let before = rss_kib(sys);
    let start = Instant::now();
    let (status, detail) = compute();
    let duration = start.elapsed();
    let after = rss_kib(sys);

    Measurement {
        scenario,
        size_desc,
        wall_s: duration.as_secs_f64(),
        rss_delta_kib: after.saturating_sub(before),
        verification_status: status,
        verification_detail: detail,
    }
}

fn write_csv(measurements: &[Measurement]) -> Result<(), String> {
    println!("scenario,size_desc,wall_s,rss_delta_kib,verification_status,verification_detail");
    for m in measurements {
        let detail = m
            .verification_detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{:.3},{},{},\"{}\"",
            m.scenario,
            m.size_desc,
            m.wall_s,
            m.rss_delta_kib,
            m.verification_status.label(),
            detail
        );
    }
    Ok(())
}

fn write_table(measurements: &[Measurement]) -> Result<(), String> {
    let col1 = measurements
        .iter()
        .map(|m| m.scenario.len())
        .fold("scenario".len(), usize::max);
    let col2 = measurements
        .iter()
        .map(|m| m.size_desc.len())
        .fold("size".len(), usize::max);

    println!(
        "{:<col1$}  {:<col2$}  {:>12}  {:>14}  {:>12}  {}",
        "scenario", "size", "wall_s", "rss_delta_kib", "status", "detail",
    );
    println!(
        "{:-<col1$}  {:-<col2$}  {:-<12}  {:-<14}  {:-<12}  {:-<12}",
        "", "", "", "", "", "",
    );
    for m in measurements {
        println!(
            "{:<col1$}  {:<col2$}  {:>12.3}  {:>14}  {:>12}  {}",
            m.scenario,
            m.size_desc,
            m.wall_s,
            m.rss_delta_kib,
            m.verification_status.label(),
            m.verification_detail.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

fn write_json(measurements: &[Measurement]) -> Result<(), String> {
    println!("[");
    for (idx, m) in measurements.iter().enumerate() {
        let detail = m.verification_detail.as_ref().map(|s| s.replace('"', "'"));
        println!(
            "  {{\"scenario\":\"{}\",\"size\":\"{}\",\"wall_s\":{:.3},\"rss_delta_kib\":{},\"verification\":{{\"status\":\"{}\",\"detail\":{}}}}}{}",
            m.scenario,
            m.size_desc,
            m.wall_s,
            m.rss_delta_kib,
            m.verification_status.label(),
            match detail {
                Some(ref d) => format!("\"{d}\""),
                None => "null".to_string(),
            },
            if idx + 1 == measurements.len() { "" } else { "," }
        );
    }
    println!("]");
    Ok(())
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new().with_memory());
    get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or(0, |process| process.memory() / 1024)
}

/// Deterministic sprinkling of obstacles, roughly one cell in five.
fn scattered_obstacles(rows: usize, cols: usize) -> Grid {
    Grid::from_fn(rows, cols, |r, c| {
        if (r * 7 + c * 3) % 5 == 0 {
            CellFacts::OBSTACLE
        } else {
            CellFacts::FREE
        }
    })
}

/// Domino tilings by always covering the first uncovered free cell.
fn tilings_baseline(grid: &Grid) -> u64 {
    fn go(grid: &Grid, covered: &mut [bool], from: usize) -> u64 {
        let cols = grid.cols();
        let Some(at) = (from..covered.len()).find(|&i| !covered[i] && grid.is_free(i / cols, i % cols))
        else {
            return 1;
        };
        let (r, c) = (at / cols, at % cols);
        let mut total = 0;
        covered[at] = true;
        if grid.is_free(r, c + 1) && !covered[at + 1] {
            covered[at + 1] = true;
            total += go(grid, covered, at + 1);
            covered[at + 1] = false;
        }
        if grid.is_free(r + 1, c) {
            covered[at + cols] = true;
            total += go(grid, covered, at + 1);
            covered[at + cols] = false;
        }
        covered[at] = false;
        total
    }
    let mut covered = vec![false; grid.rows() * grid.cols()];
    go(grid, &mut covered, 0)
}

/// Marked subsets with no two marks within `reach` along a row or column.
fn placements_baseline(grid: &Grid, reach: usize) -> u64 {
    fn go(grid: &Grid, reach: usize, marks: &mut [bool], at: usize) -> u64 {
        if at == marks.len() {
            return 1;
        }
        let cols = grid.cols();
        let (r, c) = (at / cols, at % cols);
        let mut total = go(grid, reach, marks, at + 1);
        let clear = grid.is_free(r, c)
            && (1..=reach).all(|d| (d > c || !marks[at - d]) && (d > r || !marks[at - d * cols]));
        if clear {
            marks[at] = true;
            total += go(grid, reach, marks, at + 1);
            marks[at] = false;
        }
        total
    }
    let mut marks = vec![false; grid.rows() * grid.cols()];
    go(grid, reach, &mut marks, 0)
}

/// Sets of exactly `kings` pairwise non-touching cells.
fn kings_baseline(rows: usize, cols: usize, kings: usize) -> u64 {
    fn go(rows: usize, cols: usize, left: usize, marks: &mut [bool], at: usize) -> u64 {
        if left == 0 {
            return 1;
        }
        if marks.len() - at < left {
            return 0;
        }
        let (r, c) = (at / cols, at % cols);
        let mut total = go(rows, cols, left, marks, at + 1);
        let touches = (c > 0 && marks[at - 1])
            || (r > 0 && marks[at - cols])
            || (r > 0 && c > 0 && marks[at - cols - 1])
            || (r > 0 && c + 1 < cols && marks[at - cols + 1]);
        if !touches {
            marks[at] = true;
            total += go(rows, cols, left - 1, marks, at + 1);
            marks[at] = false;
        }
        total
    }
    let mut marks = vec![false; rows * cols];
    go(rows, cols, kings, &mut marks, 0)
}

/// Proper colorings of an open board, assigning cells in row-major order.
fn colorings_baseline(rows: usize, cols: usize, colors: u32) -> u64 {
    fn go(cols: usize, colors: u32, assigned: &mut [u32], at: usize) -> u64 {
        if at == assigned.len() {
            return 1;
        }
        let (r, c) = (at / cols, at % cols);
        let mut total = 0;
        for k in 0..colors {
            let clashes = (c > 0 && assigned[at - 1] == k) || (r > 0 && assigned[at - cols] == k);
            if !clashes {
                assigned[at] = k;
                total += go(cols, colors, assigned, at + 1);
            }
        }
        total
    }
    let mut assigned = vec![0; rows * cols];
    go(cols, colors, &mut assigned, 0)
}
