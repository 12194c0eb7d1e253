//! Domino tiling (optionally with monominoes) as a profile DP.
//!
//! One bit per column. Before cell `(i,j)`, bit `k ≥ j` is set when cell
//! `(i,k)` is already covered (by a vertical domino hanging from row `i-1`,
//! or by a horizontal domino started at `(i,k-1)`), and bit `k < j` is set
//! when `(i+1,k)` is already covered by a vertical domino from row `i`.
//! After the last column every bit describes row `i+1`, so the row-wrap is
//! the identity. A tiling is complete when the final profile is all zero.
//!
//! With monominoes enabled an uncovered free cell may also take a 1×1 piece,
//! which carries payoff 1 so `Minimize`/`Maximize` report the fewest/most
//! monominoes used.

use crate::codec::DigitCodec;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::traits::{Cell, ProfileProblem, State, Transition};

/// Tilings of the free cells of a grid.
#[derive(Clone, Debug)]
pub struct DominoTiling {
    grid: Grid,
    codec: DigitCodec,
    monominoes: bool,
}

impl DominoTiling {
    pub fn new(grid: Grid) -> Result<Self, EngineError> {
        let codec = DigitCodec::binary(grid.cols())?;
        Ok(Self {
            grid,
            codec,
            monominoes: false,
        })
    }

    /// Also allow 1×1 pieces.
    pub fn with_monominoes(mut self) -> Self {
        self.monominoes = true;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl ProfileProblem for DominoTiling {
    fn rows(&self) -> usize {
        self.grid.rows()
    }

    fn cols(&self) -> usize {
        self.grid.cols()
    }

    fn codec(&self) -> &DigitCodec {
        &self.codec
    }

    fn transitions(&self, cell: Cell, state: State, out: &mut Vec<Transition>) {
        let Cell { row, col } = cell;
        let c = &self.codec;
        let p = state.profile;
        let free = self.grid.is_free(row, col);

        if c.get(p, col) == 1 {
            // already covered; a piece reaching into an obstacle is dead
            if free {
                out.push(Transition::new(state.with_profile(c.set(p, col, 0)), 0));
            }
            return;
        }
        if !free {
            out.push(Transition::new(state, 0));
            return;
        }

        if self.grid.is_free(row + 1, col) {
            out.push(Transition::new(state.with_profile(c.set(p, col, 1)), 0));
        }
        if self.grid.is_free(row, col + 1) && c.get(p, col + 1) == 0 {
            let next = c.set(p, col + 1, 1);
            out.push(Transition::new(state.with_profile(next), 0));
        }
        if self.monominoes {
            out.push(Transition::new(state, 1));
        }
    }

    fn wrap_row(&self, _row: usize, state: State) -> Option<State> {
        Some(state)
    }

    fn accept(&self, state: State) -> bool {
        state.profile == 0
    }
}
