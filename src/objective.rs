//! How table values accumulate: modular counting or payoff optimization.
//!
//! An [`Objective`] fixes the value type stored per profile, how a transition's
//! payoff delta extends a value, and how two values reaching the same state
//! are combined. Unreachable states are never stored as values; the table
//! holds `Option<Value>` and `None` is the only "unreachable" marker.

use crate::error::EngineError;
use std::fmt::Debug;

/// Accumulation semantics for a sweep.
pub trait Objective {
    /// Value stored per reachable state.
    type Value: Copy + PartialEq + Debug + Send + Sync;

    /// What the caller gets back after aggregation.
    type Answer;

    /// Check parameters before the sweep starts.
    fn validate(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Check that payoffs totalling at most `bound` in magnitude fit the
    /// value type.
    fn check_payoff(&self, _bound: u128) -> Result<(), EngineError> {
        Ok(())
    }

    /// Value of a seed state carrying `delta`.
    fn unit(&self, delta: i64) -> Self::Value;

    /// Value after taking a transition with payoff `delta`.
    fn extend(&self, value: Self::Value, delta: i64) -> Self::Value;

    /// Merge two values reaching the same state. Must be associative and
    /// commutative so shard order does not matter.
    fn combine(&self, acc: Self::Value, incoming: Self::Value) -> Self::Value;

    /// Final answer from the combined accepted value, `None` if no state was
    /// accepted.
    fn answer(&self, best: Option<Self::Value>) -> Self::Answer;
}

/// Number of configurations modulo `modulus`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Count {
    modulus: u64,
}

impl Count {
    pub const DEFAULT_MODULUS: u64 = 1_000_000_007;

    /// Largest modulus for which `a + b` of two residues cannot overflow.
    pub const MAX_MODULUS: u64 = 1 << 63;

    pub fn modulo(modulus: u64) -> Self {
        Self { modulus }
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }
}

impl Default for Count {
    fn default() -> Self {
        Self::modulo(Self::DEFAULT_MODULUS)
    }
}

impl Objective for Count {
    type Value = u64;
    type Answer = u64;

    fn validate(&self) -> Result<(), EngineError> {
        if self.modulus == 0 || self.modulus > Self::MAX_MODULUS {
            return Err(EngineError::InvalidModulus(self.modulus));
        }
        Ok(())
    }

    #[inline]
    fn unit(&self, _delta: i64) -> u64 {
        1 % self.modulus
    }

    #[inline]
    fn extend(&self, value: u64, _delta: i64) -> u64 {
        value
    }

    #[inline]
    fn combine(&self, acc: u64, incoming: u64) -> u64 {
        // both operands are residues, so the sum stays below 2^64
        let sum = acc + incoming;
        if sum >= self.modulus {
            sum - self.modulus
        } else {
            sum
        }
    }

    fn answer(&self, best: Option<u64>) -> u64 {
        best.unwrap_or(0)
    }
}

fn check_i64_payoff(bound: u128) -> Result<(), EngineError> {
    if bound > i64::MAX as u128 {
        return Err(EngineError::PayoffOverflow { bound });
    }
    Ok(())
}

/// Largest total payoff over all configurations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Maximize;

impl Objective for Maximize {
    type Value = i64;
    type Answer = Option<i64>;

    fn check_payoff(&self, bound: u128) -> Result<(), EngineError> {
        check_i64_payoff(bound)
    }

    #[inline]
    fn unit(&self, delta: i64) -> i64 {
        delta
    }

    #[inline]
    fn extend(&self, value: i64, delta: i64) -> i64 {
        value + delta
    }

    #[inline]
    fn combine(&self, acc: i64, incoming: i64) -> i64 {
        acc.max(incoming)
    }

    fn answer(&self, best: Option<i64>) -> Option<i64> {
        best
    }
}

/// Smallest total payoff over all configurations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Minimize;

impl Objective for Minimize {
    type Value = i64;
    type Answer = Option<i64>;

    fn check_payoff(&self, bound: u128) -> Result<(), EngineError> {
        check_i64_payoff(bound)
    }

    #[inline]
    fn unit(&self, delta: i64) -> i64 {
        delta
    }

    #[inline]
    fn extend(&self, value: i64, delta: i64) -> i64 {
        value + delta
    }

    #[inline]
    fn combine(&self, acc: i64, incoming: i64) -> i64 {
        acc.min(incoming)
    }

    fn answer(&self, best: Option<i64>) -> Option<i64> {
        best
    }
}
