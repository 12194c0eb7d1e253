//! Exactly `k` mutually non-attacking kings.
//!
//! Two kings attack each other when their cells touch, diagonals included.
//! Digits `0..cols` follow the usual occupancy frontier: before `(i,j)`,
//! digit `j` is `(i-1,j)`, `j+1` is the upper-right `(i-1,j+1)` and `j-1` is
//! the left neighbour `(i,j-1)`. The upper-left `(i-1,j-1)` was overwritten
//! when `(i,j-1)` was decided, so one extra digit at position `cols` carries
//! it forward: deciding `(i,j)` copies the old digit `j` there. The row-wrap
//! clears that witness because column 0 has no upper-left neighbour.
//!
//! The number of kings placed so far is the auxiliary axis; a configuration
//! is accepted when it placed exactly `k`.

use crate::codec::DigitCodec;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::traits::{Cell, ProfileProblem, State, Transition};

/// Placements of exactly `kings` kings on the free cells of a grid.
#[derive(Clone, Debug)]
pub struct KingPlacement {
    grid: Grid,
    kings: usize,
    codec: DigitCodec,
}

impl KingPlacement {
    pub fn new(grid: Grid, kings: usize) -> Result<Self, EngineError> {
        let codec = DigitCodec::binary(grid.cols() + 1)?;
        Ok(Self { grid, kings, codec })
    }

    /// Open `rows × cols` board.
    pub fn board(rows: usize, cols: usize, kings: usize) -> Result<Self, EngineError> {
        Self::new(Grid::open(rows, cols), kings)
    }

    pub fn kings(&self) -> usize {
        self.kings
    }

    fn witness(&self) -> usize {
        self.grid.cols()
    }
}

impl ProfileProblem for KingPlacement {
    fn rows(&self) -> usize {
        self.grid.rows()
    }

    fn cols(&self) -> usize {
        self.grid.cols()
    }

    fn codec(&self) -> &DigitCodec {
        &self.codec
    }

    /// Never more than one king per free cell, so a budget larger than the
    /// free cells only needs to count that high; `accept` then rejects all.
    fn aux_states(&self) -> usize {
        self.kings.min(self.grid.free_cells()) + 1
    }

    fn transitions(&self, cell: Cell, state: State, out: &mut Vec<Transition>) {
        let Cell { row, col } = cell;
        let c = &self.codec;
        let p = state.profile;
        let cols = self.grid.cols();

        let up = c.get(p, col);
        let left = if col > 0 { c.get(p, col - 1) } else { 0 };
        let upper_left = if col > 0 { c.get(p, self.witness()) } else { 0 };
        let upper_right = if col + 1 < cols { c.get(p, col + 1) } else { 0 };

        let carried = c.set(p, self.witness(), up);
        out.push(Transition::new(state.with_profile(c.set(carried, col, 0)), 0));

        let attacked = (up | left | upper_left | upper_right) != 0;
        if !attacked && state.aux < self.kings && self.grid.is_free(row, col) {
            out.push(Transition::new(
                State::new(c.set(carried, col, 1), state.aux + 1),
                1,
            ));
        }
    }

    fn wrap_row(&self, _row: usize, state: State) -> Option<State> {
        Some(state.with_profile(self.codec.set(state.profile, self.witness(), 0)))
    }

    fn accept(&self, state: State) -> bool {
        state.aux == self.kings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::solve;
    use crate::objective::{Count, Maximize};

    fn count(rows: usize, cols: usize, kings: usize) -> u64 {
        solve(KingPlacement::board(rows, cols, kings).unwrap(), Count::default()).unwrap()
    }

    #[test]
    fn classic_three_by_three() {
        assert_eq!(count(3, 3, 2), 16);
        assert_eq!(count(3, 3, 4), 1);
        assert_eq!(count(3, 3, 5), 0);
    }

    #[test]
    fn zero_kings_is_one_configuration() {
        assert_eq!(count(4, 4, 0), 1);
        assert_eq!(count(0, 0, 0), 1);
    }

    #[test]
    fn budget_beyond_free_cells_is_infeasible() {
        assert_eq!(count(1, 2, 3), 0);
        let problem = KingPlacement::board(1, 2, 3).unwrap();
        assert_eq!(problem.aux_states(), 3);
    }

    #[test]
    fn obstacles_forbid_kings() {
        // with (0,0) blocked only (1,0)-(0,2) and (1,0)-(1,2) are apart
        let grid = Grid::open(2, 3).with_obstacle(0, 0);
        let problem = KingPlacement::new(grid, 2).unwrap();
        assert_eq!(solve(problem, Count::default()).unwrap(), 2);
    }

    #[test]
    fn exact_budget_under_maximize_counts_kings() {
        let problem = KingPlacement::board(3, 3, 4).unwrap();
        assert_eq!(solve(problem, Maximize).unwrap(), Some(4));
    }
}
