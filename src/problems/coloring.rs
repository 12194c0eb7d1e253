//! Proper grid colorings with fixed border rows.
//!
//! Every free cell takes one of `k` colors and orthogonal neighbours must
//! differ. Digit `j` holds the color of the frontier cell in column `j`:
//! before `(i,j)` it is the cell above, and digit `j-1` is the cell to the
//! left. Obstacles take an extra blank digit `k` that never conflicts; the
//! blank is only added to the radix when the grid has obstacles.
//!
//! Row 0 can be clamped to a supplied top coloring and the last row must
//! match a supplied bottom coloring, which the acceptance predicate checks.
//! Cells may also carry a fixed color from the grid. The row-wrap is the
//! identity.

use crate::codec::DigitCodec;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::traits::{Cell, ProfileProblem, State, Transition};

/// Proper `colors`-colorings of a grid.
#[derive(Clone, Debug)]
pub struct GridColoring {
    grid: Grid,
    colors: u32,
    top: Option<Vec<u32>>,
    bottom: Option<Vec<u32>>,
    codec: DigitCodec,
}

impl GridColoring {
    pub fn new(grid: Grid, colors: u32) -> Result<Self, EngineError> {
        if colors == 0 {
            return Err(EngineError::EmptyPalette);
        }
        let radix = if grid.has_obstacles() { colors + 1 } else { colors };
        // a single color without obstacles still needs a two-symbol digit
        let codec = DigitCodec::new(radix.max(2), grid.cols())?;
        Ok(Self {
            grid,
            colors,
            top: None,
            bottom: None,
            codec,
        })
    }

    /// Clamp row 0 to `colors`, one entry per column.
    pub fn with_top(mut self, colors: Vec<u32>) -> Self {
        self.top = Some(colors);
        self
    }

    /// Require the last row to equal `colors`, one entry per column.
    pub fn with_bottom(mut self, colors: Vec<u32>) -> Self {
        self.bottom = Some(colors);
        self
    }

    pub fn colors(&self) -> u32 {
        self.colors
    }

    fn blank(&self) -> u32 {
        self.colors
    }

    /// Closed form for two colors on an open grid with no fixed cells.
    ///
    /// A connected grid has exactly two proper 2-colorings, the checkerboard
    /// and its complement; the borders just select among them. Returns `None`
    /// when the shortcut does not apply.
    pub fn two_coloring_count(&self) -> Option<u64> {
        let fixed_cells = self.grid.cells().any(|(_, _, f)| f.color.is_some());
        if self.colors != 2 || self.grid.has_obstacles() || fixed_cells {
            return None;
        }
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        if rows == 0 || cols == 0 {
            return Some(1);
        }
        let last = rows - 1;
        let fits = |corner: usize| {
            let color = |r: usize, c: usize| ((corner + r + c) % 2) as u32;
            let top_ok = self
                .top
                .as_ref()
                .map_or(true, |t| t.iter().enumerate().all(|(c, &v)| v == color(0, c)));
            let bottom_ok = self
                .bottom
                .as_ref()
                .map_or(true, |b| b.iter().enumerate().all(|(c, &v)| v == color(last, c)));
            top_ok && bottom_ok
        };
        Some((0..2).filter(|&corner| fits(corner)).count() as u64)
    }

    fn check_border(&self, which: &'static str, border: &Option<Vec<u32>>) -> Result<(), EngineError> {
        let Some(border) = border else {
            return Ok(());
        };
        if border.len() != self.grid.cols() {
            return Err(EngineError::BorderLength {
                which,
                expected: self.grid.cols(),
                found: border.len(),
            });
        }
        match border.iter().position(|&c| c >= self.colors) {
            Some(col) => Err(EngineError::ColorOutOfRange {
                color: border[col],
                colors: self.colors,
                location: format!("{which} border column {col}"),
            }),
            None => Ok(()),
        }
    }
}

impl ProfileProblem for GridColoring {
    fn rows(&self) -> usize {
        self.grid.rows()
    }

    fn cols(&self) -> usize {
        self.grid.cols()
    }

    fn codec(&self) -> &DigitCodec {
        &self.codec
    }

    fn validate(&self) -> Result<(), EngineError> {
        self.check_border("top", &self.top)?;
        self.check_border("bottom", &self.bottom)?;
        for (row, col, facts) in self.grid.cells() {
            if let Some(color) = facts.color {
                if color >= self.colors {
                    return Err(EngineError::ColorOutOfRange {
                        color,
                        colors: self.colors,
                        location: format!("cell ({row},{col})"),
                    });
                }
            }
        }
        Ok(())
    }

    fn transitions(&self, cell: Cell, state: State, out: &mut Vec<Transition>) {
        let Cell { row, col } = cell;
        let c = &self.codec;
        let p = state.profile;

        if !self.grid.is_free(row, col) {
            out.push(Transition::new(state.with_profile(c.set(p, col, self.blank())), 0));
            return;
        }

        // row 0 has nothing above; its digits are seed zeros, not colors
        let up = (row > 0).then(|| c.get(p, col));
        let left = (col > 0).then(|| c.get(p, col - 1));
        let fixed = self.grid.get(row, col).color;
        let clamp = if row == 0 {
            self.top.as_ref().map(|t| t[col])
        } else {
            None
        };

        for color in 0..self.colors {
            if up == Some(color) || left == Some(color) {
                continue;
            }
            if fixed.is_some_and(|f| f != color) || clamp.is_some_and(|t| t != color) {
                continue;
            }
            out.push(Transition::new(state.with_profile(c.set(p, col, color)), 0));
        }
    }

    fn wrap_row(&self, _row: usize, state: State) -> Option<State> {
        Some(state)
    }

    fn accept(&self, state: State) -> bool {
        let Some(bottom) = &self.bottom else {
            return true;
        };
        let last = self.grid.rows().saturating_sub(1);
        bottom.iter().enumerate().all(|(col, &color)| {
            !self.grid.is_free(last, col) || self.codec.get(state.profile, col) == color
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::solve;
    use crate::objective::Count;

    fn count(problem: GridColoring) -> u64 {
        solve(problem, Count::default()).unwrap()
    }

    #[test]
    fn two_by_two_with_two_colors() {
        let open = GridColoring::new(Grid::open(2, 2), 2).unwrap();
        assert_eq!(open.two_coloring_count(), Some(2));
        assert_eq!(count(open), 2);

        let bordered = GridColoring::new(Grid::open(2, 2), 2)
            .unwrap()
            .with_top(vec![0, 1])
            .with_bottom(vec![1, 0]);
        assert_eq!(bordered.two_coloring_count(), Some(1));
        assert_eq!(count(bordered), 1);
    }

    #[test]
    fn parity_decides_two_color_borders() {
        // three rows: the bottom row repeats the top, so opposite borders clash
        let clash = GridColoring::new(Grid::open(3, 2), 2)
            .unwrap()
            .with_top(vec![0, 1])
            .with_bottom(vec![1, 0]);
        assert_eq!(clash.two_coloring_count(), Some(0));
        assert_eq!(count(clash), 0);

        let agree = GridColoring::new(Grid::open(3, 2), 2)
            .unwrap()
            .with_top(vec![0, 1])
            .with_bottom(vec![0, 1]);
        assert_eq!(count(agree), 1);
    }

    #[test]
    fn three_colors_on_two_by_three() {
        let problem = GridColoring::new(Grid::open(2, 3), 3).unwrap();
        assert_eq!(problem.two_coloring_count(), None);
        assert_eq!(count(problem), 54);
    }

    #[test]
    fn obstacles_split_the_grid() {
        // a blocked middle column leaves two independent 2×1 strips
        let grid = Grid::open(2, 3).with_obstacle(0, 1).with_obstacle(1, 1);
        let problem = GridColoring::new(grid, 3).unwrap();
        assert_eq!(count(problem), 36);
    }

    #[test]
    fn fixed_cells_and_single_color() {
        let grid = Grid::open(1, 3).with_color(0, 1, 0);
        let problem = GridColoring::new(grid, 2).unwrap();
        assert_eq!(count(problem), 1);

        let mono = GridColoring::new(Grid::open(1, 1), 1).unwrap();
        assert_eq!(count(mono), 1);
        let mono = GridColoring::new(Grid::open(1, 2), 1).unwrap();
        assert_eq!(count(mono), 0);
    }

    #[test]
    fn invalid_configuration_fails_fast() {
        assert!(matches!(
            GridColoring::new(Grid::open(2, 2), 0),
            Err(EngineError::EmptyPalette)
        ));
        let short = GridColoring::new(Grid::open(2, 3), 2).unwrap().with_top(vec![0, 1]);
        assert_eq!(
            short.validate(),
            Err(EngineError::BorderLength {
                which: "top",
                expected: 3,
                found: 2
            })
        );
        let wide = GridColoring::new(Grid::open(1, 2), 2).unwrap().with_bottom(vec![0, 2]);
        assert!(matches!(
            solve(wide, Count::default()),
            Err(EngineError::ColorOutOfRange { color: 2, .. })
        ));
        let cell = GridColoring::new(Grid::open(1, 1).with_color(0, 0, 5), 3).unwrap();
        assert!(cell.validate().is_err());
    }
}
