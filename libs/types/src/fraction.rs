//! Exact rational rates
//!
//! Exchange rates are carried as `(numerator, denominator)` pairs of 256-bit
//! integers. The reduction helpers bound a fraction to a given width while
//! preserving its value as closely as possible; the oracle relies on them to
//! keep its blended rates inside 112 bits per side.

use crate::math::{narrow, MathError};
use ethers_core::types::{U256, U512};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative rational number `n / d`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    pub n: U256,
    pub d: U256,
}

impl Fraction {
    pub fn new(n: U256, d: U256) -> Self {
        Self { n, d }
    }

    /// `0 / 1`
    pub fn zero() -> Self {
        Self { n: U256::zero(), d: U256::one() }
    }

    pub fn is_zero(&self) -> bool {
        self.n.is_zero()
    }

    /// `d / n`
    pub fn inverted(self) -> Self {
        Self { n: self.d, d: self.n }
    }

    /// Value equality via cross-multiplication (structural equality via `==`
    /// distinguishes `1/2` from `2/4`; this does not)
    pub fn ratio_eq(&self, other: &Fraction) -> bool {
        self.n.full_mul(other.d) == other.n.full_mul(self.d)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}

/// Bound both sides of `r` to at most `max`, preserving the ratio as closely
/// as possible. Fractions already inside the bound pass through unchanged.
pub fn reduced_ratio(r: Fraction, max: U256) -> Result<Fraction, MathError> {
    if r.n <= max && r.d <= max {
        return Ok(r);
    }
    normalized_ratio(r, max)
}

/// Scale `r` so that its sides sum to `scale`
pub fn normalized_ratio(r: Fraction, scale: U256) -> Result<Fraction, MathError> {
    if r.n <= r.d {
        accurate_ratio(r, scale)
    } else {
        accurate_ratio(r.inverted(), scale).map(Fraction::inverted)
    }
}

/// Requires `r.n <= r.d`; maps `(n, d)` to `(x, scale - x)` with
/// `x = round(scale * n / (n + d))`
fn accurate_ratio(r: Fraction, scale: U256) -> Result<Fraction, MathError> {
    if r.d.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let sum = U512::from(r.n) + U512::from(r.d);
    let x = narrow(round_div_wide(r.n.full_mul(scale), sum)?)?;
    if x.is_zero() && !r.n.is_zero() {
        // a positive rate must not normalize to zero
        return Ok(Fraction::new(U256::one(), scale - 1));
    }
    Ok(Fraction::new(x, scale - x))
}

fn round_div_wide(a: U512, b: U512) -> Result<U512, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (q, r) = a.div_mod(b);
    if r >= b - b / 2 {
        Ok(q + 1)
    } else {
        Ok(q)
    }
}
