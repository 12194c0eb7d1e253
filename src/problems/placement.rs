//! Non-attacking placements along rows and columns.
//!
//! A cell may be marked when no other marked cell lies within `reach` steps
//! along its row or its column. `reach = 1` is the classic "corn field"
//! independent-set problem (no two planted cells share an edge); `reach = 2`
//! is the "artillery" problem where each piece covers two cells in each
//! direction.
//!
//! Each digit (radix `reach + 1`) stores the *age* of the most recent mark in
//! its column: 0 when nothing was marked within the last `reach` rows, else
//! the number of rows since the mark as seen from the row about to use the
//! digit. Before cell `(i,j)`, digit `j` still describes column `j` above
//! the cell, while digits `j-1`, `j-2`, … already describe the current row,
//! so a left neighbour `d` steps away is marked exactly when digit `j-d` is 1.
//! The row-wrap is the identity.

use crate::codec::DigitCodec;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::traits::{Cell, ProfileProblem, State, Transition};

/// What a mark is worth to an optimizing objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Payoff {
    /// Every mark is worth 1.
    Unit,
    /// A mark is worth its cell's weight.
    CellWeight,
}

/// Placements on free cells with a row/column exclusion radius.
#[derive(Clone, Debug)]
pub struct CrossPlacement {
    grid: Grid,
    reach: usize,
    payoff: Payoff,
    codec: DigitCodec,
}

impl CrossPlacement {
    pub fn new(grid: Grid, reach: usize) -> Result<Self, EngineError> {
        if reach == 0 {
            return Err(EngineError::ZeroReach);
        }
        let radix = u32::try_from(reach + 1).map_err(|_| EngineError::ProfileTooWide {
            radix: u32::MAX,
            width: grid.cols(),
        })?;
        let codec = DigitCodec::new(radix, grid.cols())?;
        Ok(Self {
            grid,
            reach,
            payoff: Payoff::Unit,
            codec,
        })
    }

    /// Independent sets of free cells under 4-neighbour adjacency.
    pub fn corn_field(grid: Grid) -> Result<Self, EngineError> {
        Self::new(grid, 1)
    }

    /// Pieces that attack two cells in each orthogonal direction.
    pub fn artillery(grid: Grid) -> Result<Self, EngineError> {
        Self::new(grid, 2)
    }

    pub fn with_payoff(mut self, payoff: Payoff) -> Self {
        self.payoff = payoff;
        self
    }

    pub fn reach(&self) -> usize {
        self.reach
    }

    fn blocked(&self, profile: u64, col: usize, age: u32) -> bool {
        age != 0
            || (1..=self.reach.min(col)).any(|d| self.codec.get(profile, col - d) == 1)
    }
}

impl ProfileProblem for CrossPlacement {
    fn rows(&self) -> usize {
        self.grid.rows()
    }

    fn cols(&self) -> usize {
        self.grid.cols()
    }

    fn codec(&self) -> &DigitCodec {
        &self.codec
    }

    fn payoff_bound(&self) -> u128 {
        match self.payoff {
            Payoff::Unit => self.grid.free_cells() as u128,
            Payoff::CellWeight => self.grid.weight_bound(),
        }
    }

    fn transitions(&self, cell: Cell, state: State, out: &mut Vec<Transition>) {
        let Cell { row, col } = cell;
        let p = state.profile;
        let age = self.codec.get(p, col);
        let aged = if age == 0 || age as usize == self.reach {
            0
        } else {
            age + 1
        };
        out.push(Transition::new(state.with_profile(self.codec.set(p, col, aged)), 0));

        if self.grid.is_free(row, col) && !self.blocked(p, col, age) {
            let delta = match self.payoff {
                Payoff::Unit => 1,
                Payoff::CellWeight => self.grid.get(row, col).weight,
            };
            out.push(Transition::new(state.with_profile(self.codec.set(p, col, 1)), delta));
        }
    }

    fn wrap_row(&self, _row: usize, state: State) -> Option<State> {
        Some(state)
    }

    fn accept(&self, _state: State) -> bool {
        true
    }
}
