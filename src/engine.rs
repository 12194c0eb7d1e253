//! Row-sweep driver for broken-profile dynamic programs.
//!
//! The sweep is an explicit state machine over
//! `RowStart(r) → InRow{r, 0} → … → InRow{r, cols-1} → RowEnd(r)`:
//! 1. Before the first row the table is seeded from the problem.
//! 2. Each `InRow` phase folds the table through the transition rules of one
//!    cell.
//! 3. Each `RowEnd` phase with a following row applies the row-wrap.
//!
//! After the last phase the table holds every reachable final state and the
//! aggregator reduces it to the answer. There is no recursion; total work is
//! bounded by `rows × cols × live states × choices per cell`.
//!
//! The engine is completely generic over implementations of
//! [`ProfileProblem`] and [`Objective`].

use crate::aggregate::Aggregator;
use crate::error::EngineError;
use crate::objective::Objective;
use crate::table::RollingTable;
use crate::traits::{Cell, ProfileProblem, State, Transition};
use crate::utils::table_states;
#[cfg(feature = "parallel")]
use crate::utils::default_shard_size;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// `Sync` when the `parallel` feature shards columns across threads,
/// otherwise no bound at all.
#[cfg(feature = "parallel")]
pub trait MaybeSync: Sync {}
#[cfg(feature = "parallel")]
impl<T: Sync + ?Sized> MaybeSync for T {}

/// `Sync` when the `parallel` feature shards columns across threads,
/// otherwise no bound at all.
#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}
#[cfg(not(feature = "parallel"))]
impl<T: ?Sized> MaybeSync for T {}

/// Tunables fixed at engine construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on `num_profiles × aux_states`; larger instances are
    /// rejected before any allocation.
    pub max_table_states: usize,
    /// Columns with at least this many live states are sharded across
    /// threads (only with the `parallel` feature).
    pub parallel_threshold: usize,
    /// Fixed shard length; `None` picks one from the live count.
    pub shard_size: Option<usize>,
}

impl EngineConfig {
    pub const DEFAULT_MAX_TABLE_STATES: usize = 1 << 26;
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 14;
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_table_states: Self::DEFAULT_MAX_TABLE_STATES,
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
            shard_size: None,
        }
    }
}

/// Broken-profile DP engine for a problem `P` under objective `O`.
///
/// Typical usage:
/// ```
/// use profile_dp::{Count, Grid, ProfileEngine, problems::tiling::DominoTiling};
///
/// let problem = DominoTiling::new(Grid::open(2, 3)).unwrap();
/// let engine = ProfileEngine::new(problem, Count::default()).unwrap();
/// assert_eq!(engine.run(), 3);
/// ```
pub struct ProfileEngine<P, O> {
    problem: P,
    objective: O,
    config: EngineConfig,
}

impl<P, O> ProfileEngine<P, O>
where
    P: ProfileProblem + MaybeSync,
    O: Objective + MaybeSync,
{
    /// Validate the instance and build an engine with default tunables.
    pub fn new(problem: P, objective: O) -> Result<Self, EngineError> {
        Self::with_config(problem, objective, EngineConfig::default())
    }

    /// Validate the instance against `config` and build an engine.
    ///
    /// Fails fast on invalid objective parameters, invalid problem data,
    /// payoffs that could overflow the objective's value type, or a table
    /// larger than `config.max_table_states`.
    pub fn with_config(problem: P, objective: O, config: EngineConfig) -> Result<Self, EngineError> {
        objective.validate()?;
        problem.validate()?;
        objective.check_payoff(problem.payoff_bound())?;
        let needed = table_states(problem.codec().num_profiles(), problem.aux_states());
        if needed > config.max_table_states as u128 {
            return Err(EngineError::TableTooLarge {
                needed,
                limit: config.max_table_states,
            });
        }
        Ok(Self {
            problem,
            objective,
            config,
        })
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a fresh sweep positioned before the first cell.
    pub fn sweep(&self) -> Sweep<'_, P, O> {
        Sweep::new(&self.problem, &self.objective, &self.config)
    }

    /// Sweep the whole grid and return the final table.
    pub fn final_table(&self) -> RollingTable<O::Value> {
        let mut sweep = self.sweep();
        sweep.run_to_end();
        sweep.into_table()
    }

    /// Sweep the whole grid and reduce accepted states to the answer.
    pub fn run(&self) -> O::Answer {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!(
            "sweep",
            rows = self.problem.rows(),
            cols = self.problem.cols(),
            aux = self.problem.aux_states()
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut sweep = self.sweep();
        sweep.run_to_end();
        let best = sweep.aggregate();

        #[cfg(feature = "tracing")]
        tracing::debug!(final_live = sweep.table().live_len(), found = best.is_some(), "sweep finished");

        self.objective.answer(best)
    }
}

/// Validate and run `problem` under `objective` with default tunables.
pub fn solve<P, O>(problem: P, objective: O) -> Result<O::Answer, EngineError>
where
    P: ProfileProblem + MaybeSync,
    O: Objective + MaybeSync,
{
    Ok(ProfileEngine::new(problem, objective)?.run())
}

/// Position of a [`Sweep`] in the row-major traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepPhase {
    /// About to enter row `r`.
    RowStart(usize),
    /// About to decide cell `(row, col)`.
    InRow { row: usize, col: usize },
    /// Row `r` is complete; wraps into `r + 1` if it exists.
    RowEnd(usize),
    /// Every cell has been decided.
    Done,
}

/// An in-progress sweep owning its rolling table and scratch buffers.
pub struct Sweep<'a, P, O: Objective> {
    problem: &'a P,
    objective: &'a O,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    config: &'a EngineConfig,
    aux_states: usize,
    table: RollingTable<O::Value>,
    phase: SweepPhase,
    scratch: Vec<Transition>,
}

impl<'a, P, O> Sweep<'a, P, O>
where
    P: ProfileProblem + MaybeSync,
    O: Objective + MaybeSync,
{
    fn new(problem: &'a P, objective: &'a O, config: &'a EngineConfig) -> Self {
        let aux_states = problem.aux_states().max(1);
        let len = table_states(problem.codec().num_profiles(), aux_states) as usize;
        let mut table = RollingTable::new(len);
        let mut scratch = Vec::new();

        problem.seed(&mut scratch);
        for t in &scratch {
            table.stage(t.state.index(aux_states), objective.unit(t.delta), |a, b| {
                objective.combine(a, b)
            });
        }
        table.commit();

        let phase = if problem.rows() == 0 || problem.cols() == 0 {
            SweepPhase::Done
        } else {
            SweepPhase::RowStart(0)
        };

        Self {
            problem,
            objective,
            config,
            aux_states,
            table,
            phase,
            scratch,
        }
    }

    /// The phase the next [`step`](Self::step) will execute.
    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    pub fn table(&self) -> &RollingTable<O::Value> {
        &self.table
    }

    pub fn into_table(self) -> RollingTable<O::Value> {
        self.table
    }

    /// Decode a table slot back into its state.
    pub fn state_at(&self, index: usize) -> State {
        State::from_index(index, self.aux_states)
    }

    /// Reachable states of the current table with their values, by slot.
    pub fn states(&self) -> Vec<(State, O::Value)> {
        self.table
            .snapshot()
            .into_iter()
            .map(|(idx, v)| (self.state_at(idx), v))
            .collect()
    }

    /// Execute the current phase and return it.
    pub fn step(&mut self) -> SweepPhase {
        let phase = self.phase;
        self.phase = match phase {
            SweepPhase::RowStart(row) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(row, live = self.table.live_len(), "row start");
                SweepPhase::InRow { row, col: 0 }
            }
            SweepPhase::InRow { row, col } => {
                self.expand(Cell { row, col });
                if col + 1 < self.problem.cols() {
                    SweepPhase::InRow { row, col: col + 1 }
                } else {
                    SweepPhase::RowEnd(row)
                }
            }
            SweepPhase::RowEnd(row) => {
                if row + 1 < self.problem.rows() {
                    self.wrap(row);
                    SweepPhase::RowStart(row + 1)
                } else {
                    SweepPhase::Done
                }
            }
            SweepPhase::Done => SweepPhase::Done,
        };
        phase
    }

    /// Step until the sweep reaches `target` (or finishes).
    pub fn run_until(&mut self, target: SweepPhase) {
        while self.phase != target && self.phase != SweepPhase::Done {
            self.step();
        }
    }

    pub fn run_to_end(&mut self) {
        self.run_until(SweepPhase::Done);
    }

    /// Combined value of accepted states in the current table.
    pub fn aggregate(&self) -> Option<O::Value> {
        Aggregator::new(self.objective, self.aux_states).accepted(self.problem, &self.table)
    }

    fn wrap(&mut self, row: usize) {
        let problem = self.problem;
        let objective = self.objective;
        let aux_states = self.aux_states;
        self.table.fold_column(|idx, value, next| {
            let state = State::from_index(idx, aux_states);
            if let Some(wrapped) = problem.wrap_row(row, state) {
                next.stage(wrapped.index(aux_states), value, |a, b| objective.combine(a, b));
            }
        });

        #[cfg(feature = "tracing")]
        tracing::trace!(row, live = self.table.live_len(), "row wrapped");
    }

    fn expand(&mut self, cell: Cell) {
        #[cfg(feature = "parallel")]
        {
            if self.table.live_len() >= self.config.parallel_threshold {
                self.expand_sharded(cell);
                return;
            }
        }
        self.expand_serial(cell);
    }

    fn expand_serial(&mut self, cell: Cell) {
        let problem = self.problem;
        let objective = self.objective;
        let aux_states = self.aux_states;
        let scratch = &mut self.scratch;
        self.table.fold_column(|idx, value, next| {
            scratch.clear();
            problem.transitions(cell, State::from_index(idx, aux_states), scratch);
            for t in scratch.iter() {
                next.stage(
                    t.state.index(aux_states),
                    objective.extend(value, t.delta),
                    |a, b| objective.combine(a, b),
                );
            }
        });

        #[cfg(feature = "tracing")]
        tracing::trace!(row = cell.row, col = cell.col, live = self.table.live_len(), "cell expanded");
    }

    /// Shard the live states across rayon workers; each shard collects its
    /// successors privately and the shards are merged in order.
    #[cfg(feature = "parallel")]
    fn expand_sharded(&mut self, cell: Cell) {
        let problem = self.problem;
        let objective = self.objective;
        let aux_states = self.aux_states;
        let live = self.table.live_len();
        let shard = self
            .config
            .shard_size
            .unwrap_or_else(|| default_shard_size(live, rayon::current_num_threads()))
            .max(1);

        let table = &self.table;
        let shards: Vec<Vec<(usize, O::Value)>> = table
            .live()
            .par_chunks(shard)
            .map(|chunk| {
                let mut scratch = Vec::new();
                let mut out = Vec::with_capacity(chunk.len() * 2);
                for &idx in chunk {
                    let Some(value) = table.get(idx) else {
                        continue;
                    };
                    scratch.clear();
                    problem.transitions(cell, State::from_index(idx, aux_states), &mut scratch);
                    out.extend(
                        scratch
                            .iter()
                            .map(|t| (t.state.index(aux_states), objective.extend(value, t.delta))),
                    );
                }
                out
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::trace!(row = cell.row, col = cell.col, live, shards = shards.len(), "sharded expand");

        for (idx, value) in shards.into_iter().flatten() {
            self.table.stage(idx, value, |a, b| objective.combine(a, b));
        }
        self.table.commit();
    }
}
