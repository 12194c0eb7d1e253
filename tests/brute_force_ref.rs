use profile_dp::problems::{
    coloring::GridColoring,
    kings::KingPlacement,
    placement::{CrossPlacement, Payoff},
    plug::{Coverage, LoopCover, LoopMode},
    tiling::DominoTiling,
};
use profile_dp::{solve, CellFacts, Count, Grid, Maximize, Minimize};
use proptest::prelude::*;

/// Small grids with roughly one obstacle in five and weights in `-3..=5`.
fn small_grid(max_rows: usize, max_cols: usize) -> impl Strategy<Value = Grid> {
    (1..=max_rows, 1..=max_cols).prop_flat_map(|(rows, cols)| {
        prop::collection::vec((prop::bool::weighted(0.8), -3i64..=5), rows * cols).prop_map(
            move |cells| {
                Grid::from_fn(rows, cols, |r, c| {
                    let (free, weight) = cells[r * cols + c];
                    if free {
                        CellFacts {
                            weight,
                            ..CellFacts::FREE
                        }
                    } else {
                        CellFacts::OBSTACLE
                    }
                })
            },
        )
    })
}

fn free_cells(grid: &Grid) -> Vec<(usize, usize)> {
    grid.cells()
        .filter(|(_, _, f)| !f.obstacle)
        .map(|(r, c, _)| (r, c))
        .collect()
}

/// Number of tilings and fewest monominoes, by covering the first open cell.
fn full_tilings(grid: &Grid, monominoes: bool) -> (u64, Option<i64>) {
    fn go(grid: &Grid, mono: bool, covered: &mut [bool], used: i64, out: &mut (u64, Option<i64>)) {
        let cols = grid.cols();
        let open = (0..covered.len()).find(|&i| !covered[i] && grid.is_free(i / cols, i % cols));
        let Some(at) = open else {
            out.0 += 1;
            out.1 = Some(out.1.map_or(used, |best| best.min(used)));
            return;
        };
        let (r, c) = (at / cols, at % cols);
        covered[at] = true;
        if grid.is_free(r, c + 1) && !covered[at + 1] {
            covered[at + 1] = true;
            go(grid, mono, covered, used, out);
            covered[at + 1] = false;
        }
        if grid.is_free(r + 1, c) {
            covered[at + cols] = true;
            go(grid, mono, covered, used, out);
            covered[at + cols] = false;
        }
        if mono {
            go(grid, mono, covered, used + 1, out);
        }
        covered[at] = false;
    }
    let mut out = (0, None);
    let mut covered = vec![false; grid.rows() * grid.cols()];
    go(grid, monominoes, &mut covered, 0, &mut out);
    out
}

/// Every subset of free cells, kept when `ok` accepts it.
fn subsets<F>(cells: &[(usize, usize)], mut ok: F) -> Vec<Vec<(usize, usize)>>
where
    F: FnMut(&[(usize, usize)]) -> bool,
{
    (0u32..1 << cells.len())
        .map(|mask| {
            cells
                .iter()
                .enumerate()
                .filter(|&(k, _)| mask >> k & 1 == 1)
                .map(|(_, &cell)| cell)
                .collect::<Vec<_>>()
        })
        .filter(|set| ok(set))
        .collect()
}

fn cross_ok(set: &[(usize, usize)], reach: usize) -> bool {
    set.iter().enumerate().all(|(i, &(r1, c1))| {
        set[i + 1..].iter().all(|&(r2, c2)| {
            !((r1 == r2 && c1.abs_diff(c2) <= reach) || (c1 == c2 && r1.abs_diff(r2) <= reach))
        })
    })
}

fn kings_ok(set: &[(usize, usize)]) -> bool {
    set.iter().enumerate().all(|(i, &(r1, c1))| {
        set[i + 1..]
            .iter()
            .all(|&(r2, c2)| r1.abs_diff(r2).max(c1.abs_diff(c2)) > 1)
    })
}

/// Proper colorings of the free cells, with optional border rows.
fn full_colorings(grid: &Grid, colors: u32, top: Option<&[u32]>, bottom: Option<&[u32]>) -> u64 {
    let cells = free_cells(grid);
    let last = grid.rows() - 1;
    let mut assigned = vec![None; grid.rows() * grid.cols()];
    let mut total = 0;
    let mut odometer = vec![0u32; cells.len()];
    loop {
        for (&(r, c), &k) in cells.iter().zip(&odometer) {
            assigned[r * grid.cols() + c] = Some(k);
        }
        let color = |r: usize, c: usize| assigned[r * grid.cols() + c];
        let proper = cells.iter().all(|&(r, c)| {
            let k = color(r, c);
            (c + 1 >= grid.cols() || color(r, c + 1) != k)
                && (r + 1 >= grid.rows() || color(r + 1, c) != k)
        });
        let top_ok = top.map_or(true, |t| {
            cells.iter().filter(|&&(r, _)| r == 0).all(|&(r, c)| color(r, c) == Some(t[c]))
        });
        let bottom_ok = bottom.map_or(true, |b| {
            cells.iter().filter(|&&(r, _)| r == last).all(|&(r, c)| color(r, c) == Some(b[c]))
        });
        if proper && top_ok && bottom_ok {
            total += 1;
        }

        let Some(k) = odometer.iter().position(|&d| d + 1 < colors) else {
            return total;
        };
        odometer[k] += 1;
        odometer[..k].iter_mut().for_each(|d| *d = 0);
    }
}

/// Loop covers by enumerating edge subsets: `(count, heaviest)`.
fn full_loops(grid: &Grid, mode: LoopMode, coverage: Coverage) -> (u64, Option<i64>) {
    let cells = free_cells(grid);
    let id = |r: usize, c: usize| cells.iter().position(|&x| x == (r, c));
    let mut edges = Vec::new();
    for (i, &(r, c)) in cells.iter().enumerate() {
        if let Some(j) = id(r, c + 1) {
            edges.push((i, j));
        }
        if let Some(j) = id(r + 1, c) {
            edges.push((i, j));
        }
    }

    let (mut count, mut best) = (0u64, None::<i64>);
    for mask in 0u32..1 << edges.len() {
        let mut degree = vec![0; cells.len()];
        let mut adj = vec![Vec::new(); cells.len()];
        for (k, &(a, b)) in edges.iter().enumerate() {
            if mask >> k & 1 == 1 {
                degree[a] += 1;
                degree[b] += 1;
                adj[a].push(b);
                adj[b].push(a);
            }
        }
        let degrees_ok = degree.iter().all(|&d| match coverage {
            Coverage::Every => d == 2,
            Coverage::Optional => d == 0 || d == 2,
        });
        if !degrees_ok {
            continue;
        }
        let used: Vec<usize> = (0..cells.len()).filter(|&i| degree[i] == 2).collect();
        if mode == LoopMode::Single {
            let Some(&start) = used.first() else {
                continue;
            };
            let mut seen = vec![false; cells.len()];
            let mut stack = vec![start];
            seen[start] = true;
            while let Some(x) = stack.pop() {
                for &y in &adj[x] {
                    if !seen[y] {
                        seen[y] = true;
                        stack.push(y);
                    }
                }
            }
            if used.iter().any(|&i| !seen[i]) {
                continue;
            }
        }
        let weight: i64 = used
            .iter()
            .map(|&i| grid.get(cells[i].0, cells[i].1).weight)
            .sum();
        count += 1;
        best = Some(best.map_or(weight, |b| b.max(weight)));
    }
    (count, best)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn tiling_matches_backtracking(grid in small_grid(4, 4)) {
        let (count, _) = full_tilings(&grid, false);
        let dp = solve(DominoTiling::new(grid.clone()).unwrap(), Count::default()).unwrap();
        prop_assert_eq!(dp, count);

        let (count, fewest) = full_tilings(&grid, true);
        let problem = DominoTiling::new(grid.clone()).unwrap().with_monominoes();
        prop_assert_eq!(solve(problem, Count::default()).unwrap(), count);
        let problem = DominoTiling::new(grid).unwrap().with_monominoes();
        prop_assert_eq!(solve(problem, Minimize).unwrap(), fewest);
    }

    #[test]
    fn cross_placement_matches_subsets(grid in small_grid(3, 4), reach in 1usize..=3) {
        let cells = free_cells(&grid);
        let valid = subsets(&cells, |set| cross_ok(set, reach));
        let most = valid.iter().map(Vec::len).max().map(|n| n as i64);
        let heaviest = valid
            .iter()
            .map(|set| set.iter().map(|&(r, c)| grid.get(r, c).weight).sum::<i64>())
            .max();

        let problem = CrossPlacement::new(grid.clone(), reach).unwrap();
        prop_assert_eq!(solve(problem.clone(), Count::default()).unwrap(), valid.len() as u64);
        prop_assert_eq!(solve(problem.clone(), Maximize).unwrap(), most);
        let weighted = problem.with_payoff(Payoff::CellWeight);
        prop_assert_eq!(solve(weighted, Maximize).unwrap(), heaviest);
    }

    #[test]
    fn kings_match_subsets(grid in small_grid(3, 4), kings in 0usize..=4) {
        let cells = free_cells(&grid);
        let expected = subsets(&cells, |set| set.len() == kings && kings_ok(set)).len() as u64;
        let problem = KingPlacement::new(grid, kings).unwrap();
        prop_assert_eq!(solve(problem, Count::default()).unwrap(), expected);
    }

    #[test]
    fn coloring_matches_enumeration(
        grid in small_grid(3, 3),
        colors in 1u32..=3,
        top in prop::option::of(prop::collection::vec(0u32..3, 3)),
        bottom in prop::option::of(prop::collection::vec(0u32..3, 3)),
    ) {
        let cols = grid.cols();
        let fit = |border: Option<Vec<u32>>| {
            border.map(|b| b.into_iter().take(cols).map(|k| k % colors).collect::<Vec<_>>())
        };
        let (top, bottom) = (fit(top), fit(bottom));
        let expected = full_colorings(&grid, colors, top.as_deref(), bottom.as_deref());

        let mut problem = GridColoring::new(grid, colors).unwrap();
        if let Some(top) = top {
            problem = problem.with_top(top);
        }
        if let Some(bottom) = bottom {
            problem = problem.with_bottom(bottom);
        }
        if let Some(shortcut) = problem.two_coloring_count() {
            prop_assert_eq!(shortcut, expected);
        }
        prop_assert_eq!(solve(problem, Count::default()).unwrap(), expected);
    }

    #[test]
    fn loops_match_edge_subsets(grid in small_grid(3, 3)) {
        for mode in [LoopMode::Single, LoopMode::Many] {
            for coverage in [Coverage::Every, Coverage::Optional] {
                let (count, heaviest) = full_loops(&grid, mode, coverage);
                let problem = LoopCover::new(grid.clone(), mode, coverage).unwrap();
                prop_assert_eq!(solve(problem.clone(), Count::default()).unwrap(), count);
                prop_assert_eq!(solve(problem, Maximize).unwrap(), heaviest);
            }
        }
    }
}
