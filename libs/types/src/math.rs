//! Fixed-point arithmetic over 256-bit unsigned integers
//!
//! Every multiply-then-divide runs through a 512-bit intermediate so the
//! product of two full-width balances never wraps. Rounding direction is
//! explicit at every call site: the pool floors what it pays out and ceils
//! what it charges, which is what keeps value from leaking out one unit at
//! a time.

use ethers_core::types::{U256, U512};
use thiserror::Error;

/// Errors from fixed-point arithmetic
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Result does not fit in 256 bits
    #[error("arithmetic overflow")]
    Overflow,

    /// Division by zero
    #[error("division by zero")]
    DivisionByZero,
}

/// Narrow a 512-bit intermediate back to 256 bits, failing on overflow
pub(crate) fn narrow(wide: U512) -> Result<U256, MathError> {
    if wide > U512::from(U256::MAX) {
        return Err(MathError::Overflow);
    }
    let mut bytes = [0u8; 64];
    wide.to_big_endian(&mut bytes);
    Ok(U256::from_big_endian(&bytes[32..]))
}

/// `floor(a * b / d)` with a 512-bit intermediate
pub fn mul_div_floor(a: U256, b: U256, d: U256) -> Result<U256, MathError> {
    if d.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    narrow(a.full_mul(b) / U512::from(d))
}

/// `ceil(a * b / d)` with a 512-bit intermediate
pub fn mul_div_ceil(a: U256, b: U256, d: U256) -> Result<U256, MathError> {
    if d.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (q, r) = a.full_mul(b).div_mod(U512::from(d));
    if r.is_zero() {
        narrow(q)
    } else {
        narrow(q + 1)
    }
}

/// `a / b` rounded half-up
pub fn round_div(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (q, r) = a.div_mod(b);
    // remainder >= ceil(b / 2) rounds away from zero
    if r >= b - b / 2 {
        q.checked_add(U256::one()).ok_or(MathError::Overflow)
    } else {
        Ok(q)
    }
}

/// Number of decimal digits of `x` (zero has length zero)
pub fn decimal_length(x: U256) -> u32 {
    let ten = U256::from(10u8);
    let mut len = 0u32;
    let mut y = x;
    while !y.is_zero() {
        len += 1;
        y = y / ten;
    }
    len
}
