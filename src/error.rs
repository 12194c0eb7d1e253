//! Error types for engine construction and grid loading.
//!
//! Everything here is a *configuration* problem detected before the sweep
//! starts. An instance with no legal configuration is not an error: counting
//! objectives answer `0` and optimizing objectives answer `None`.

use thiserror::Error;

/// Rejected engine, codec or problem configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A digit radix below 2 cannot encode anything.
    #[error("digit radix must be at least 2, got {0}")]
    RadixTooSmall(u32),
    /// `radix^width` does not fit in the 64-bit profile word.
    #[error("{width} digits of radix {radix} do not fit in a 64-bit profile")]
    ProfileTooWide { radix: u32, width: usize },
    /// Dense table would exceed the configured state cap.
    #[error("table needs {needed} states per column, limit is {limit}")]
    TableTooLarge { needed: u128, limit: usize },
    /// Counting modulus outside `1..=2^63`.
    #[error("modulus must be in 1..=2^63, got {0}")]
    InvalidModulus(u64),
    /// A coloring problem without any color.
    #[error("palette must contain at least one color")]
    EmptyPalette,
    /// A fixed color is not in the palette.
    #[error("color {color} at {location} is outside a palette of {colors}")]
    ColorOutOfRange {
        color: u32,
        colors: u32,
        location: String,
    },
    /// A border row whose length differs from the grid width.
    #[error("{which} border has {found} entries, grid has {expected} columns")]
    BorderLength {
        which: &'static str,
        expected: usize,
        found: usize,
    },
    /// A placement reach of zero would make every pair compatible.
    #[error("placement reach must be positive")]
    ZeroReach,
    /// Some configuration could total more than an `i64` payoff can hold.
    #[error("payoffs may total {bound} in magnitude, which overflows i64")]
    PayoffOverflow { bound: u128 },
}

/// Failure while reading a grid from its text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridParseError {
    /// Rows of differing widths.
    #[error("line {line} has {found} cells, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character with no cell meaning.
    #[error("unknown cell '{ch}' at line {line}, column {col}")]
    UnknownCell { line: usize, col: usize, ch: char },
}
