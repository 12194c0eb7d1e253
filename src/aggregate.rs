//! Reduction of a final table to a single value.
//!
//! The aggregator folds table entries with the objective's `combine`, keeping
//! only entries whose state passes a predicate. With the problem's acceptance
//! predicate this yields the answer; with `|_| true` it yields the table total,
//! which is useful as a cross-check.

use crate::objective::Objective;
use crate::table::RollingTable;
use crate::traits::{ProfileProblem, State};

/// Folds table entries under an objective.
pub struct Aggregator<'a, O> {
    objective: &'a O,
    aux_states: usize,
}

impl<'a, O: Objective> Aggregator<'a, O> {
    pub fn new(objective: &'a O, aux_states: usize) -> Self {
        Self {
            objective,
            aux_states: aux_states.max(1),
        }
    }

    /// Combine entries accepted by `problem`.
    pub fn accepted<P: ProfileProblem>(
        &self,
        problem: &P,
        table: &RollingTable<O::Value>,
    ) -> Option<O::Value> {
        self.aggregate_with(table, |state| problem.accept(state))
    }

    /// Combine entries whose state satisfies `pred`.
    pub fn aggregate_with<F>(&self, table: &RollingTable<O::Value>, pred: F) -> Option<O::Value>
    where
        F: Fn(State) -> bool,
    {
        table
            .iter()
            .filter(|&(idx, _)| pred(State::from_index(idx, self.aux_states)))
            .map(|(_, v)| v)
            .reduce(|acc, v| self.objective.combine(acc, v))
    }

    /// Combine every reachable entry.
    pub fn total(&self, table: &RollingTable<O::Value>) -> Option<O::Value> {
        self.aggregate_with(table, |_| true)
    }
}
