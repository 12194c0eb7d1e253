//! Broken-profile dynamic programming on grids.
//!
//! This crate provides a generic engine for counting or optimizing
//! configurations on rectangular grids whose validity depends only on
//! neighbouring cells: tilings, non-attacking placements, colorings and
//! loop covers.
//!
//! ## Core idea
//! 1. Cells are decided one at a time in row-major order.
//! 2. The "profile" is a fixed-width word describing the frontier between
//!    decided and undecided cells, one digit per column (plus an optional
//!    extra digit), together with a small auxiliary counter.
//! 3. Implement the [`ProfileProblem`] trait with the transition rule of one
//!    cell, the row-wrap and the acceptance predicate.
//! 4. Let [`ProfileEngine`] sweep the grid with two rolling tables and reduce
//!    the final table under an [`Objective`]: [`Count`] (modular),
//!    [`Maximize`] or [`Minimize`].
//!
//! Memory is `O(radix^width × aux)` regardless of the number of rows.
//!
//! ## Quick start
//! ```
//! use profile_dp::{solve, Count, Grid, problems::tiling::DominoTiling};
//!
//! let problem = DominoTiling::new(Grid::open(8, 8)).unwrap();
//! assert_eq!(solve(problem, Count::default()).unwrap(), 12_988_816);
//! ```
//!
//! ## Built-in problems
//! The `problems` module contains rule sets for:
//! - Domino tilings with obstacles, optionally with monominoes
//! - Independent placements with an exclusion radius (corn field, artillery)
//! - Exactly `k` non-attacking kings
//! - Proper k-colorings with fixed top and bottom rows
//! - Single loops and cycle covers (plug DP), with optional coverage
//!
//! These serve both as ready-to-use solvers and as templates for new rules.

pub mod aggregate;
pub mod builder;
pub mod codec;
pub mod engine;
pub mod error;
pub mod grid;
pub mod objective;
pub mod problems;
pub mod table;
pub mod traits;
pub mod utils;

pub use crate::builder::ProfileEngineBuilder;
pub use crate::codec::DigitCodec;
pub use crate::engine::{solve, EngineConfig, MaybeSync, ProfileEngine, Sweep, SweepPhase};
pub use crate::error::{EngineError, GridParseError};
pub use crate::grid::{CellFacts, Grid};
pub use crate::objective::{Count, Maximize, Minimize, Objective};
pub use crate::table::RollingTable;
pub use crate::traits::{Cell, ProfileProblem, State, Transition};
