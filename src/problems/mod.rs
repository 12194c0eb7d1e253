//! Grid problems expressed as [`ProfileProblem`](crate::traits::ProfileProblem)s.
//!
//! Each module is a usable solver and a template for writing new rules:
//! - [`tiling`]     : domino tilings, optionally with monominoes.
//! - [`placement`]  : row/column exclusion placements (corn field, artillery).
//! - [`kings`]      : exactly `k` non-attacking kings.
//! - [`coloring`]   : proper k-colorings with fixed border rows.
//! - [`plug`]       : single loops and cycle covers via bracket plugs.

pub mod coloring;
pub mod kings;
pub mod placement;
pub mod plug;
pub mod tiling;
