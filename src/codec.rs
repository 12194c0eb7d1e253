//! Fixed-width digit codec for integer-encoded profiles.
//!
//! A profile is a `u64` holding `width` logical digits in a fixed radix.
//! Digit `j` occupies the `j`-th place value (`radix^j`), so digit 0 is the
//! least significant. Power-of-two radices use shift and mask; any other
//! radix (base 3 plug labels, base k colors) uses multiply and divide with
//! a precomputed table of place values.
//!
//! Codec misuse (a column past `width`, a digit value `>= radix`) indicates an
//! unsound transition rule and panics.

use crate::error::EngineError;

/// Reads and writes digits of a profile word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitCodec {
    radix: u32,
    width: usize,
    /// `Some(bits)` when `radix == 1 << bits`.
    bits: Option<u32>,
    /// `powers[j] = radix^j`, with one extra entry `radix^width`.
    powers: Vec<u64>,
}

impl DigitCodec {
    /// Codec for `width` digits of the given radix.
    ///
    /// Fails when `radix < 2` or `radix^width` overflows a `u64`.
    pub fn new(radix: u32, width: usize) -> Result<Self, EngineError> {
        if radix < 2 {
            return Err(EngineError::RadixTooSmall(radix));
        }
        let mut powers = Vec::with_capacity(width + 1);
        let mut place = 1u64;
        powers.push(place);
        for _ in 0..width {
            place = place
                .checked_mul(u64::from(radix))
                .ok_or(EngineError::ProfileTooWide { radix, width })?;
            powers.push(place);
        }
        let bits = radix.is_power_of_two().then(|| radix.trailing_zeros());
        Ok(Self {
            radix,
            width,
            bits,
            powers,
        })
    }

    /// One bit per column.
    pub fn binary(width: usize) -> Result<Self, EngineError> {
        Self::new(2, width)
    }

    /// `bits` bits per column (radix `2^bits`).
    pub fn bits(bits: u32, width: usize) -> Result<Self, EngineError> {
        let radix = 1u32.checked_shl(bits).ok_or(EngineError::ProfileTooWide {
            radix: u32::MAX,
            width,
        })?;
        Self::new(radix, width)
    }

    #[inline]
    pub fn radix(&self) -> u32 {
        self.radix
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Bits per digit when the radix is a power of two.
    #[inline]
    pub fn bits_per_digit(&self) -> Option<u32> {
        self.bits
    }

    /// Number of distinct profiles, `radix^width`.
    #[inline]
    pub fn num_profiles(&self) -> u64 {
        self.powers[self.width]
    }

    /// Digit at logical column `j`.
    #[inline]
    pub fn get(&self, profile: u64, j: usize) -> u32 {
        assert!(j < self.width, "digit {j} out of range for width {}", self.width);
        match self.bits {
            Some(bits) => ((profile >> (bits as usize * j)) & u64::from(self.radix - 1)) as u32,
            None => ((profile / self.powers[j]) % u64::from(self.radix)) as u32,
        }
    }

    /// Profile with column `j` overwritten by `value`; other digits untouched.
    #[inline]
    pub fn set(&self, profile: u64, j: usize, value: u32) -> u64 {
        assert!(
            value < self.radix,
            "digit value {value} out of range for radix {}",
            self.radix
        );
        let old = self.get(profile, j);
        match self.bits {
            Some(bits) => {
                let shift = bits as usize * j;
                let mask = u64::from(self.radix - 1) << shift;
                (profile & !mask) | (u64::from(value) << shift)
            }
            None => profile - u64::from(old) * self.powers[j] + u64::from(value) * self.powers[j],
        }
    }

    /// Writes columns `j` and `k` in one call.
    #[inline]
    pub fn set_pair(&self, profile: u64, j: usize, a: u32, k: usize, b: u32) -> u64 {
        self.set(self.set(profile, j, a), k, b)
    }

    /// Every digit, least significant first.
    pub fn decode(&self, profile: u64) -> Vec<u32> {
        (0..self.width).map(|j| self.get(profile, j)).collect()
    }

    /// Inverse of [`decode`](Self::decode).
    ///
    /// # Panics
    /// Panics if `digits.len() != width` or a digit is out of range.
    pub fn encode(&self, digits: &[u32]) -> u64 {
        assert_eq!(digits.len(), self.width, "digit count must equal width");
        digits
            .iter()
            .enumerate()
            .fold(0, |profile, (j, &d)| self.set(profile, j, d))
    }

    /// Moves every digit one column up and writes 0 into column 0.
    ///
    /// Returns `None` when the top digit is non-zero, since it would be
    /// shifted out of the word.
    #[inline]
    pub fn shift_up(&self, profile: u64) -> Option<u64> {
        if self.width == 0 {
            return Some(profile);
        }
        if self.get(profile, self.width - 1) != 0 {
            return None;
        }
        Some(match self.bits {
            Some(bits) => profile << bits,
            None => profile * u64::from(self.radix),
        })
    }

    /// True when every digit except those in `skip` is zero.
    pub fn is_zero_outside(&self, profile: u64, skip: &[usize]) -> bool {
        (0..self.width).all(|j| skip.contains(&j) || self.get(profile, j) == 0)
    }
}
