//! Immutable grid of per-cell facts.
//!
//! A [`Grid`] is loaded once before a sweep and only read afterwards. Cells
//! carry an obstacle flag, an optional fixed color and an integer weight; each
//! problem reads the facts it cares about and ignores the rest.
//!
//! The text form used by [`Grid::from_str`](std::str::FromStr) is one line per
//! row:
//! - `.` free cell, weight 0
//! - `#` obstacle
//! - `0`..=`9` free cell with that weight
//!
//! Blank lines and surrounding whitespace are ignored.

use crate::error::GridParseError;
use std::str::FromStr;

/// Static facts about one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellFacts {
    pub obstacle: bool,
    pub color: Option<u32>,
    pub weight: i64,
}

impl CellFacts {
    pub const FREE: CellFacts = CellFacts {
        obstacle: false,
        color: None,
        weight: 0,
    };

    pub const OBSTACLE: CellFacts = CellFacts {
        obstacle: true,
        color: None,
        weight: 0,
    };
}

/// Row-major `rows × cols` matrix of [`CellFacts`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellFacts>,
}

impl Grid {
    /// Grid with every cell free and weight 0.
    pub fn open(rows: usize, cols: usize) -> Self {
        Self::from_fn(rows, cols, |_, _| CellFacts::FREE)
    }

    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> CellFacts,
    {
        let mut cells = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                cells.push(f(r, c));
            }
        }
        Self { rows, cols, cells }
    }

    /// Builds a grid from `true = free` rows.
    ///
    /// # Panics
    /// Panics if the rows have differing lengths.
    pub fn from_mask<R: AsRef<[bool]>>(mask: &[R]) -> Self {
        let rows = mask.len();
        let cols = mask.first().map_or(0, |r| r.as_ref().len());
        assert!(
            mask.iter().all(|r| r.as_ref().len() == cols),
            "mask rows must have equal length"
        );
        Self::from_fn(rows, cols, |r, c| {
            if mask[r].as_ref()[c] {
                CellFacts::FREE
            } else {
                CellFacts::OBSTACLE
            }
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Facts for `(row, col)`.
    ///
    /// # Panics
    /// Panics when the coordinates are outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &CellFacts {
        assert!(row < self.rows && col < self.cols, "cell ({row},{col}) outside grid");
        &self.cells[row * self.cols + col]
    }

    /// True for an in-range, non-obstacle cell.
    #[inline]
    pub fn is_free(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && !self.cells[row * self.cols + col].obstacle
    }

    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.obstacle).count()
    }

    /// Sum of `|weight|` over free cells.
    pub fn weight_bound(&self) -> u128 {
        self.cells
            .iter()
            .filter(|c| !c.obstacle)
            .map(|c| u128::from(c.weight.unsigned_abs()))
            .sum()
    }

    pub fn has_obstacles(&self) -> bool {
        self.cells.iter().any(|c| c.obstacle)
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &CellFacts)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, facts)| (idx / cols, idx % cols, facts))
    }

    pub fn with_obstacle(mut self, row: usize, col: usize) -> Self {
        self.cell_mut(row, col).obstacle = true;
        self
    }

    pub fn with_weight(mut self, row: usize, col: usize, weight: i64) -> Self {
        self.cell_mut(row, col).weight = weight;
        self
    }

    pub fn with_color(mut self, row: usize, col: usize, color: u32) -> Self {
        self.cell_mut(row, col).color = Some(color);
        self
    }

    /// Swaps rows and columns.
    ///
    /// Table size is exponential in the column count, so sweeping the
    /// transpose of a tall, narrow grid is far cheaper for problems whose
    /// rules are symmetric under transposition.
    pub fn transposed(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |r, c| *self.get(c, r))
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> &mut CellFacts {
        assert!(row < self.rows && col < self.cols, "cell ({row},{col}) outside grid");
        &mut self.cells[row * self.cols + col]
    }
}

impl FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<CellFacts>> = Vec::new();
        for (line_idx, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let facts = match ch {
                    '.' => CellFacts::FREE,
                    '#' => CellFacts::OBSTACLE,
                    d if d.is_ascii_digit() => CellFacts {
                        weight: i64::from(d as u8 - b'0'),
                        ..CellFacts::FREE
                    },
                    other => {
                        return Err(GridParseError::UnknownCell {
                            line: line_idx + 1,
                            col: col + 1,
                            ch: other,
                        })
                    }
                };
                row.push(facts);
            }
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(GridParseError::Ragged {
                        line: line_idx + 1,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push(row);
        }
        let cols = rows.first().map_or(0, Vec::len);
        Ok(Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }
}
