//! # Weir Types - Core Numerics and Identifiers
//!
//! ## Purpose
//!
//! Foundational type system for the Weir converter engine: 256-bit unsigned
//! fixed-point arithmetic with explicit rounding direction, exact rational
//! rates, and the identifier newtypes shared by every other crate in the
//! workspace.
//!
//! ## Integration Points
//!
//! - **Input Sources**: reserve balances and trade amounts from the converter,
//!   rate fractions from the oracle
//! - **Output Destinations**: pricing and liquidity math in `weir-amm`,
//!   ledger and oracle state in `weir-converter`
//! - **Precision**: all arithmetic on `U256` with 512-bit intermediates;
//!   rates carried as `(numerator, denominator)` pairs, never floats
//!
//! ## Critical Rules
//!
//! 1. **NO FLOATING POINT**: never use f32/f64 for pool arithmetic
//! 2. **Explicit rounding**: every division picks floor, ceiling, or half-up
//!    deliberately; the direction is part of the contract, not an accident
//! 3. **Checked widths**: results that cannot be narrowed back to 256 bits
//!    are errors, never truncation

pub mod constants;
pub mod fraction;
pub mod ids;
pub mod math;

pub use constants::{max_uint112, Timestamp, DEFAULT_AVERAGE_RATE_WINDOW_SECS, PPM_SCALE};
pub use fraction::Fraction;
pub use ids::{Address, ReserveId};
pub use math::{decimal_length, mul_div_ceil, mul_div_floor, round_div, MathError};

/// 256-bit unsigned integer used for all balances and amounts
pub use ethers_core::types::U256;
/// 512-bit unsigned integer used for multiplication intermediates
pub use ethers_core::types::U512;
