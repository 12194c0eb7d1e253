//! Core trait definitions for broken-profile dynamic programs.
//!
//! To run a grid problem through the engine, implement [`ProfileProblem`] for
//! a struct holding the instance (grid facts, budgets, border rows).
//!
//! The trait encodes the contour-line sweep:
//! - Cells are visited in row-major order; the table between two cells is
//!   indexed by a profile word (see [`DigitCodec`]) plus a small auxiliary
//!   axis.
//! - Transition rules: given the state before cell `(i,j)`, enumerate every
//!   legal decision for that cell as a successor state and payoff delta.
//! - Row-wrap: reinterpret the end-of-row profile as the start of the next row.
//! - Acceptance: decide which final states count as complete configurations.
//!
//! The engine owns all tables; implementations never see more than the single
//! state being transformed.

use crate::codec::DigitCodec;
use crate::error::EngineError;

/// Coordinates of the cell being decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// A profile word plus its auxiliary coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct State {
    pub profile: u64,
    pub aux: usize,
}

impl State {
    #[inline]
    pub fn new(profile: u64, aux: usize) -> Self {
        Self { profile, aux }
    }

    #[inline]
    pub fn with_profile(self, profile: u64) -> Self {
        Self { profile, ..self }
    }

    /// Dense table slot for this state, profile-major.
    #[inline]
    pub fn index(self, aux_states: usize) -> usize {
        debug_assert!(self.aux < aux_states, "aux {} >= {aux_states}", self.aux);
        self.profile as usize * aux_states + self.aux
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn from_index(index: usize, aux_states: usize) -> Self {
        Self {
            profile: (index / aux_states) as u64,
            aux: index % aux_states,
        }
    }
}

/// One legal successor emitted by a transition rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: State,
    /// Payoff added by this decision. Counting objectives ignore it.
    pub delta: i64,
}

impl Transition {
    #[inline]
    pub fn new(state: State, delta: i64) -> Self {
        Self { state, delta }
    }
}

/// A grid problem solvable by a row-major profile sweep.
///
/// Semantics:
/// - The engine seeds the table with [`seed`](Self::seed) before cell `(0,0)`.
/// - For every cell it calls [`transitions`](Self::transitions) once per
///   reachable state.
/// - After the last column of row `r < rows-1` it maps every state through
///   [`wrap_row`](Self::wrap_row).
/// - After the last cell, states passing [`accept`](Self::accept) are reduced
///   to the answer.
pub trait ProfileProblem {
    /// Number of grid rows swept.
    fn rows(&self) -> usize;

    /// Number of grid columns per row.
    fn cols(&self) -> usize;

    /// Codec describing the profile word.
    ///
    /// Its `num_profiles()` sizes the dense table, so it should be as narrow
    /// as the problem allows.
    fn codec(&self) -> &DigitCodec;

    /// Size of the auxiliary axis (budgets, flags). Defaults to 1.
    fn aux_states(&self) -> usize {
        1
    }

    /// Check instance invariants before any table is allocated.
    fn validate(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Upper bound on `|total payoff|` of any configuration.
    ///
    /// Optimizing objectives refuse instances whose bound exceeds `i64::MAX`.
    /// The default assumes every cell contributes a delta in `-1..=1`.
    fn payoff_bound(&self) -> u128 {
        (self.rows() as u128) * (self.cols() as u128)
    }

    /// States present before the first cell, with their initial payoff.
    fn seed(&self, out: &mut Vec<Transition>) {
        out.push(Transition::new(State::default(), 0));
    }

    /// Transition rule set: push every legal successor of `state` at `cell`.
    ///
    /// Requirements:
    /// - Must be a pure function of `cell`, `state` and the instance data.
    /// - Emitted `aux` values must be `< aux_states()`; emitted profiles must
    ///   be valid for [`codec`](Self::codec).
    /// - Emitting nothing means `state` cannot be extended; that is not an
    ///   error.
    fn transitions(&self, cell: Cell, state: State, out: &mut Vec<Transition>);

    /// Row-wrap: turn an end-of-row state into a start-of-row state for
    /// `row + 1`, or `None` when it cannot continue.
    fn wrap_row(&self, row: usize, state: State) -> Option<State>;

    /// Acceptance predicate for a state after the last cell.
    fn accept(&self, state: State) -> bool;
}
