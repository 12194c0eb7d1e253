//! Loop covers via plug (connectivity) profiles.
//!
//! Each free cell used by a loop has exactly two of its four sides cut by the
//! loop. The profile tracks the `cols + 1` edges crossing the frontier: before
//! cell `(i,j)`, digit `j` is the edge entering from the left and digit
//! `j + 1` the edge entering from above; the other digits are the downward
//! edges of already decided cells (`k < j`) and the downward edges of row
//! `i - 1` still pending (`k > j + 1`).
//!
//! Digits are bracket labels in radix 3: `0` no plug, `1` the left end of an
//! open path, `2` its right end. Open paths never cross, so the labels form a
//! well-nested bracket sequence and the partner of any plug is found by depth
//! counting.
//!
//! After the last column digit `cols` is a rightward edge leaving the grid,
//! which must be empty; the row-wrap shifts every digit up one place so that
//! the downward edges line up with the next row.
//!
//! In [`LoopMode::Single`] the aux axis is a "loop closed" flag. Closing is
//! only legal when no other plug is open, and once closed every remaining
//! cell must stay empty.

use crate::codec::DigitCodec;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::traits::{Cell, ProfileProblem, State, Transition};

const NONE: u32 = 0;
const OPEN: u32 = 1;
const CLOSE: u32 = 2;

/// How many loops a cover may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopMode {
    /// Exactly one closed loop.
    Single,
    /// Any number of vertex-disjoint loops, including none when coverage is
    /// optional.
    Many,
}

/// Whether every free cell must lie on a loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coverage {
    Every,
    Optional,
}

/// Loop covers of the free cells of a grid.
///
/// Each used cell contributes its weight, so `Maximize`/`Minimize` find the
/// heaviest or lightest cover.
#[derive(Clone, Debug)]
pub struct LoopCover {
    grid: Grid,
    mode: LoopMode,
    coverage: Coverage,
    codec: DigitCodec,
}

impl LoopCover {
    pub fn new(grid: Grid, mode: LoopMode, coverage: Coverage) -> Result<Self, EngineError> {
        let codec = DigitCodec::new(3, grid.cols() + 1)?;
        Ok(Self {
            grid,
            mode,
            coverage,
            codec,
        })
    }

    /// One loop through every free cell.
    pub fn hamiltonian(grid: Grid) -> Result<Self, EngineError> {
        Self::new(grid, LoopMode::Single, Coverage::Every)
    }

    /// Disjoint loops that together cover every free cell.
    pub fn cycle_cover(grid: Grid) -> Result<Self, EngineError> {
        Self::new(grid, LoopMode::Many, Coverage::Every)
    }

    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    /// Column of the `)` paired with the `(` at `from`.
    fn matching_close(&self, profile: u64, from: usize) -> Option<usize> {
        let mut depth = 0usize;
        for k in from..self.codec.width() {
            match self.codec.get(profile, k) {
                OPEN => depth += 1,
                CLOSE => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(k);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Column of the `(` paired with the `)` at `from`.
    fn matching_open(&self, profile: u64, from: usize) -> Option<usize> {
        let mut depth = 0usize;
        for k in (0..=from).rev() {
            match self.codec.get(profile, k) {
                CLOSE => depth += 1,
                OPEN => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(k);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn may_skip(&self, row: usize, col: usize) -> bool {
        !self.grid.is_free(row, col) || self.coverage == Coverage::Optional
    }
}

impl ProfileProblem for LoopCover {
    fn rows(&self) -> usize {
        self.grid.rows()
    }

    fn cols(&self) -> usize {
        self.grid.cols()
    }

    fn codec(&self) -> &DigitCodec {
        &self.codec
    }

    fn aux_states(&self) -> usize {
        match self.mode {
            LoopMode::Single => 2,
            LoopMode::Many => 1,
        }
    }

    fn payoff_bound(&self) -> u128 {
        self.grid.weight_bound()
    }

    fn transitions(&self, cell: Cell, state: State, out: &mut Vec<Transition>) {
        let Cell { row, col } = cell;
        let c = &self.codec;
        let p = state.profile;
        let left = c.get(p, col);
        let up = c.get(p, col + 1);
        let empty = left == NONE && up == NONE;

        if state.aux == 1 {
            if empty && self.may_skip(row, col) {
                out.push(Transition::new(state, 0));
            }
            return;
        }
        if !self.grid.is_free(row, col) {
            if empty {
                out.push(Transition::new(state, 0));
            }
            return;
        }

        let weight = self.grid.get(row, col).weight;
        let down = self.grid.is_free(row + 1, col);
        let right = self.grid.is_free(row, col + 1);
        let place = |l: u32, u: u32| state.with_profile(c.set_pair(p, col, l, col + 1, u));

        match (left, up) {
            (NONE, NONE) => {
                if self.coverage == Coverage::Optional {
                    out.push(Transition::new(state, 0));
                }
                if down && right {
                    out.push(Transition::new(place(OPEN, CLOSE), weight));
                }
            }
            (plug, NONE) | (NONE, plug) => {
                if down {
                    out.push(Transition::new(place(plug, NONE), weight));
                }
                if right {
                    out.push(Transition::new(place(NONE, plug), weight));
                }
            }
            (OPEN, OPEN) => {
                // the `)` of the upper path becomes the new `(`
                if let Some(k) = self.matching_close(p, col + 1) {
                    let joined = c.set(c.set_pair(p, col, NONE, col + 1, NONE), k, OPEN);
                    out.push(Transition::new(state.with_profile(joined), weight));
                }
            }
            (CLOSE, CLOSE) => {
                if let Some(k) = self.matching_open(p, col) {
                    let joined = c.set(c.set_pair(p, col, NONE, col + 1, NONE), k, CLOSE);
                    out.push(Transition::new(state.with_profile(joined), weight));
                }
            }
            (CLOSE, OPEN) => {
                out.push(Transition::new(place(NONE, NONE), weight));
            }
            _ => {
                // `(` meets its own `)`: a loop closes here
                match self.mode {
                    LoopMode::Many => {
                        let rest = c.set_pair(p, col, NONE, col + 1, NONE);
                        out.push(Transition::new(state.with_profile(rest), weight));
                    }
                    LoopMode::Single if c.is_zero_outside(p, &[col, col + 1]) => {
                        out.push(Transition::new(State::new(0, 1), weight));
                    }
                    LoopMode::Single => {}
                }
            }
        }
    }

    fn wrap_row(&self, _row: usize, state: State) -> Option<State> {
        self.codec
            .shift_up(state.profile)
            .map(|profile| state.with_profile(profile))
    }

    fn accept(&self, state: State) -> bool {
        match self.mode {
            LoopMode::Single => state.aux == 1 && state.profile == 0,
            LoopMode::Many => state.profile == 0,
        }
    }
}
